//! Static species catalog backed by a JSON fixture.
//!
//! Serves the same four lookups as a remote catalog, entirely from memory.
//! Random samples draw through [`RandomPort`] so tests can pin them.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use naturieux_domain::{IconicTaxon, Photo, ScientificName, Species, SpeciesId};
use serde::Deserialize;

use crate::infrastructure::ports::{CatalogError, RandomPort, SpeciesCatalog, SpeciesFilter};

const BUNDLED_SPECIES: &str = include_str!("../../../fixtures/species.json");

/// Wire shape of one fixture record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeciesRecord {
    id: u32,
    scientific_name: String,
    #[serde(default)]
    common_name: Option<String>,
    #[serde(default)]
    iconic_taxon: Option<IconicTaxon>,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    ancestor_ids: Vec<u32>,
    /// Places the species is observed in. Empty means everywhere.
    #[serde(default)]
    place_ids: Vec<u32>,
    #[serde(default)]
    photos: Vec<Photo>,
}

impl SpeciesRecord {
    fn into_entry(self) -> Result<CatalogEntry, CatalogError> {
        let id = SpeciesId::new(self.id)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        let name = ScientificName::new(self.scientific_name)
            .map_err(|e| CatalogError::InvalidResponse(format!("species {}: {e}", self.id)))?;

        let mut species = Species::new(id, name).with_ancestor_ids(self.ancestor_ids);
        if let Some(common) = self.common_name {
            species = species.with_common_name(common);
        }
        if let Some(taxon) = self.iconic_taxon {
            species = species.with_iconic_taxon(taxon);
        }
        if let Some(rank) = self.rank {
            species = species.with_rank(rank);
        }
        for photo in self.photos {
            species = species.with_photo(photo);
        }

        Ok(CatalogEntry {
            species,
            place_ids: self.place_ids,
        })
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    species: Species,
    place_ids: Vec<u32>,
}

impl CatalogEntry {
    fn matches(&self, filter: &SpeciesFilter) -> bool {
        let species = &self.species;
        if filter.has_photos && !species.has_photos() {
            return false;
        }
        if let Some(taxon) = filter.iconic_taxon {
            if species.iconic_taxon() != Some(taxon) {
                return false;
            }
        }
        if let Some(place_id) = filter.place_id {
            if !self.place_ids.is_empty() && !self.place_ids.contains(&place_id) {
                return false;
            }
        }
        !filter.exclude_ids.contains(&species.id())
    }
}

/// Number of leading ancestors two lineages share.
fn shared_depth(a: &[u32], b: &[u32]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

pub struct StaticSpeciesCatalog {
    entries: Vec<CatalogEntry>,
    random: Arc<dyn RandomPort>,
}

impl StaticSpeciesCatalog {
    /// Load records from a JSON array.
    pub fn from_json(json: &str, random: Arc<dyn RandomPort>) -> Result<Self, CatalogError> {
        let records: Vec<SpeciesRecord> =
            serde_json::from_str(json).map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        let entries = records
            .into_iter()
            .map(SpeciesRecord::into_entry)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(species = entries.len(), "Loaded species catalog");
        Ok(Self { entries, random })
    }

    /// The species fixture shipped with the crate.
    pub fn bundled(random: Arc<dyn RandomPort>) -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_SPECIES, random)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, id: SpeciesId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.species.id() == id)
    }

    /// Partial Fisher-Yates: the first `limit` slots end up a uniform sample.
    fn sample(&self, mut pool: Vec<Species>, limit: usize) -> Vec<Species> {
        let take = limit.min(pool.len());
        let last = i32::try_from(pool.len()).unwrap_or(i32::MAX) - 1;
        for i in 0..take {
            let lower = i32::try_from(i).unwrap_or(i32::MAX);
            let j = usize::try_from(self.random.gen_range(lower, last))
                .unwrap_or(i)
                .min(pool.len() - 1);
            pool.swap(i, j);
        }
        pool.truncate(take);
        pool
    }
}

#[async_trait]
impl SpeciesCatalog for StaticSpeciesCatalog {
    async fn get(&self, id: SpeciesId) -> Result<Option<Species>, CatalogError> {
        Ok(self.find(id).map(|e| e.species.clone()))
    }

    async fn random(&self, filter: &SpeciesFilter) -> Result<Vec<Species>, CatalogError> {
        if filter.limit == 0 {
            return Ok(Vec::new());
        }
        let pool: Vec<Species> = self
            .entries
            .iter()
            .filter(|e| e.matches(filter))
            .map(|e| e.species.clone())
            .collect();
        Ok(self.sample(pool, filter.limit))
    }

    async fn similar(&self, id: SpeciesId, limit: usize) -> Result<Vec<Species>, CatalogError> {
        let Some(target) = self.find(id) else {
            return Ok(Vec::new());
        };
        let lineage = target.species.ancestor_ids();

        let mut related: Vec<(usize, &Species)> = self
            .entries
            .iter()
            .filter(|e| e.species.id() != id && e.species.has_photos())
            .map(|e| (shared_depth(lineage, e.species.ancestor_ids()), &e.species))
            .filter(|(depth, _)| *depth > 0)
            .collect();
        // nearest common ancestor first, ties by id for stable output
        related.sort_by_key(|(depth, s)| (Reverse(*depth), s.id()));

        Ok(related
            .into_iter()
            .take(limit)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Species>, CatalogError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .iter()
            .map(|e| &e.species)
            .filter(|s| {
                s.scientific_name().as_str().to_lowercase().contains(&needle)
                    || s.common_name()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
