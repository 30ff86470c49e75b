//! Species entity - a taxon supplied by the species catalog.
//!
//! The catalog creates species; the quiz only reads them.

use serde::{Deserialize, Serialize};

use crate::value_objects::{IconicTaxon, ScientificName};
use crate::SpeciesId;

/// One photo record of a species, in the resolutions the catalog offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub url: Option<String>,
    pub square_url: Option<String>,
    pub medium_url: Option<String>,
    pub large_url: Option<String>,
    pub original_url: Option<String>,
    pub attribution: Option<String>,
}

/// A biological species.
///
/// # Invariants
///
/// - `id` is positive (enforced by `SpeciesId`)
/// - `scientific_name` is non-empty (enforced by `ScientificName`)
///
/// # Example
///
/// ```
/// use naturieux_domain::{IconicTaxon, ScientificName, Species, SpeciesId};
///
/// let fox = Species::new(
///     SpeciesId::new(42069).unwrap(),
///     ScientificName::new("Vulpes vulpes").unwrap(),
/// )
/// .with_common_name("Red Fox")
/// .with_iconic_taxon(IconicTaxon::Mammalia);
///
/// assert_eq!(fox.display_name(), "Red Fox");
/// assert!(!fox.has_photos());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    id: SpeciesId,
    scientific_name: ScientificName,
    common_name: Option<String>,
    iconic_taxon: Option<IconicTaxon>,
    photos: Vec<Photo>,
    /// Taxonomic ancestors, root first
    ancestor_ids: Vec<u32>,
    rank: String,
}

impl Species {
    pub fn new(id: SpeciesId, scientific_name: ScientificName) -> Self {
        Self {
            id,
            scientific_name,
            common_name: None,
            iconic_taxon: None,
            photos: Vec::new(),
            ancestor_ids: Vec::new(),
            rank: String::from("species"),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        self.common_name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn with_iconic_taxon(mut self, taxon: IconicTaxon) -> Self {
        self.iconic_taxon = Some(taxon);
        self
    }

    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photos.push(photo);
        self
    }

    pub fn with_ancestor_ids(mut self, ids: Vec<u32>) -> Self {
        self.ancestor_ids = ids;
        self
    }

    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = rank.into();
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    #[inline]
    pub fn scientific_name(&self) -> &ScientificName {
        &self.scientific_name
    }

    #[inline]
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    #[inline]
    pub fn iconic_taxon(&self) -> Option<IconicTaxon> {
        self.iconic_taxon
    }

    #[inline]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    #[inline]
    pub fn ancestor_ids(&self) -> &[u32] {
        &self.ancestor_ids
    }

    #[inline]
    pub fn rank(&self) -> &str {
        &self.rank
    }

    /// Common name when known, otherwise the scientific name.
    pub fn display_name(&self) -> &str {
        self.common_name
            .as_deref()
            .unwrap_or_else(|| self.scientific_name.as_str())
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    /// First photo record, which is the one questions are built from.
    pub fn primary_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(id: u32, name: &str) -> Species {
        Species::new(SpeciesId::new(id).unwrap(), ScientificName::new(name).unwrap())
    }

    #[test]
    fn display_name_prefers_common_name() {
        let robin = species(12716, "Erithacus rubecula").with_common_name("European Robin");
        assert_eq!(robin.display_name(), "European Robin");
    }

    #[test]
    fn display_name_falls_back_to_scientific_name() {
        let robin = species(12716, "Erithacus rubecula");
        assert_eq!(robin.display_name(), "Erithacus rubecula");

        let blank = species(12716, "Erithacus rubecula").with_common_name("   ");
        assert!(blank.common_name().is_none());
        assert_eq!(blank.display_name(), "Erithacus rubecula");
    }

    #[test]
    fn photos_are_kept_in_order() {
        let fox = species(42069, "Vulpes vulpes")
            .with_photo(Photo {
                id: 1,
                medium_url: Some("m1".into()),
                ..Default::default()
            })
            .with_photo(Photo {
                id: 2,
                ..Default::default()
            });

        assert!(fox.has_photos());
        assert_eq!(fox.photos().len(), 2);
        assert_eq!(fox.primary_photo().map(|p| p.id), Some(1));
    }

    #[test]
    fn defaults() {
        let fox = species(42069, "Vulpes vulpes");
        assert_eq!(fox.rank(), "species");
        assert!(fox.ancestor_ids().is_empty());
        assert!(fox.iconic_taxon().is_none());
        assert!(fox.primary_photo().is_none());
    }
}
