//! External service port traits (species catalog, game event sink).

use async_trait::async_trait;
use naturieux_domain::{
    AchievementUnlocked, IconicTaxon, LevelUpEvent, SessionCompleted, Species, SpeciesId,
};

use super::error::{CatalogError, EventSinkError};

// =============================================================================
// Species Catalog
// =============================================================================

/// Filter for random species sampling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesFilter {
    pub iconic_taxon: Option<IconicTaxon>,
    /// Geographic place identifier understood by the catalog
    pub place_id: Option<u32>,
    pub limit: usize,
    pub has_photos: bool,
    pub exclude_ids: Vec<SpeciesId>,
}

impl SpeciesFilter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn with_iconic_taxon(mut self, taxon: Option<IconicTaxon>) -> Self {
        self.iconic_taxon = taxon;
        self
    }

    pub fn with_place_id(mut self, place_id: Option<u32>) -> Self {
        self.place_id = place_id;
        self
    }

    pub fn with_photos(mut self) -> Self {
        self.has_photos = true;
        self
    }

    pub fn excluding(mut self, id: SpeciesId) -> Self {
        self.exclude_ids.push(id);
        self
    }
}

/// Read-only source of species data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeciesCatalog: Send + Sync {
    async fn get(&self, id: SpeciesId) -> Result<Option<Species>, CatalogError>;
    /// Random sample matching `filter`, at most `filter.limit` entries.
    async fn random(&self, filter: &SpeciesFilter) -> Result<Vec<Species>, CatalogError>;
    /// Species close to `id` in the taxonomy (same genus or family).
    async fn similar(&self, id: SpeciesId, limit: usize) -> Result<Vec<Species>, CatalogError>;
    /// Name search over scientific and common names.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Species>, CatalogError>;
}

// =============================================================================
// Game Events
// =============================================================================

/// Outbound notifications for progression changes. Optional.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameEventSink: Send + Sync {
    async fn session_completed(&self, event: &SessionCompleted) -> Result<(), EventSinkError>;
    async fn level_up(&self, event: &LevelUpEvent) -> Result<(), EventSinkError>;
    async fn achievement_unlocked(&self, event: &AchievementUnlocked) -> Result<(), EventSinkError>;
}
