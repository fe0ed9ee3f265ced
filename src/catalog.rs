use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier for a plantable species, as written in scenario files and
/// seed inventories (e.g. `carrot`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropId(String);

impl CropId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CropId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropSpecies {
    pub id: CropId,
    pub display_name: String,
    /// Growth stages from freshly planted (1) up to ripe. At least 1.
    pub total_stages: u32,
    /// Money credited when a ripe crop of this species is harvested.
    pub sale_value: u32,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown crop id '{0}'")]
    UnknownCrop(CropId),
}

/// Immutable registry of plantable species. Built once when the engine is
/// constructed and looked up on every plant, harvest, and growth step.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    species: BTreeMap<CropId, CropSpecies>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = CropSpecies>) -> Self {
        let species = entries
            .into_iter()
            .map(|species| (species.id.clone(), species))
            .collect();
        Self { species }
    }

    pub fn species(&self, id: &CropId) -> Result<&CropSpecies, CatalogError> {
        self.species
            .get(id)
            .ok_or_else(|| CatalogError::UnknownCrop(id.clone()))
    }

    pub fn contains(&self, id: &CropId) -> bool {
        self.species.contains_key(id)
    }

    /// Species in id order, so snapshots list crops deterministically.
    pub fn iter(&self) -> impl Iterator<Item = &CropSpecies> {
        self.species.values()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
