use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Coarse taxonomic group used for filtering and categorising species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconicTaxon {
    Mammalia,
    Aves,
    Reptilia,
    Amphibia,
    Actinopterygii,
    Insecta,
    Arachnida,
    Mollusca,
    Plantae,
    Fungi,
}

impl IconicTaxon {
    pub const ALL: [IconicTaxon; 10] = [
        Self::Mammalia,
        Self::Aves,
        Self::Reptilia,
        Self::Amphibia,
        Self::Actinopterygii,
        Self::Insecta,
        Self::Arachnida,
        Self::Mollusca,
        Self::Plantae,
        Self::Fungi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mammalia => "Mammalia",
            Self::Aves => "Aves",
            Self::Reptilia => "Reptilia",
            Self::Amphibia => "Amphibia",
            Self::Actinopterygii => "Actinopterygii",
            Self::Insecta => "Insecta",
            Self::Arachnida => "Arachnida",
            Self::Mollusca => "Mollusca",
            Self::Plantae => "Plantae",
            Self::Fungi => "Fungi",
        }
    }
}

impl std::fmt::Display for IconicTaxon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IconicTaxon {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|taxon| taxon.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::parse(format!("Unknown iconic taxon: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_taxa_case_insensitively() {
        assert_eq!("Aves".parse::<IconicTaxon>().unwrap(), IconicTaxon::Aves);
        assert_eq!("mammalia".parse::<IconicTaxon>().unwrap(), IconicTaxon::Mammalia);
    }

    #[test]
    fn rejects_unknown_taxa() {
        assert!("Dinosauria".parse::<IconicTaxon>().is_err());
        assert!("".parse::<IconicTaxon>().is_err());
    }
}
