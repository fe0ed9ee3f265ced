use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::catalog::{Catalog, CropId, CropSpecies};
use crate::engine::Engine;

fn default_grid_side() -> u32 {
    8
}

fn default_starting_money() -> u32 {
    50
}

/// A farm setup loaded from YAML: plot size, starting money, and the crop
/// roster with shop prices. The engine itself never reads files; the
/// scenario is the only place disk meets the simulation.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default = "default_starting_money")]
    pub starting_money: u32,
    pub crops: Vec<ScenarioCrop>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_grid_side")]
    pub width: u32,
    #[serde(default = "default_grid_side")]
    pub height: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_side(),
            height: default_grid_side(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCrop {
    pub id: CropId,
    pub name: String,
    /// Growth stages from sown to ripe.
    pub stages: u32,
    pub sale_value: u32,
    /// Shop price for one seed. Consumed by the driver, not the engine;
    /// `Engine::buy_seeds` takes the price as an argument.
    pub seed_cost: u32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            bail!(
                "farm dimensions must be at least 1x1, got {}x{}",
                self.grid.width,
                self.grid.height
            );
        }
        if self.crops.is_empty() {
            bail!("scenario must define at least one crop");
        }
        let mut seen: Vec<&CropId> = Vec::new();
        for crop in &self.crops {
            if seen.contains(&&crop.id) {
                bail!("crop id '{}' defined more than once", crop.id);
            }
            seen.push(&crop.id);
            if crop.stages == 0 {
                bail!("crop '{}' must have at least one growth stage", crop.id);
            }
        }
        Ok(())
    }

    pub fn build_catalog(&self) -> Catalog {
        Catalog::new(self.crops.iter().map(|crop| CropSpecies {
            id: crop.id.clone(),
            display_name: crop.name.clone(),
            total_stages: crop.stages,
            sale_value: crop.sale_value,
        }))
    }

    pub fn build_engine(&self) -> Engine {
        Engine::new(
            self.grid.width,
            self.grid.height,
            self.starting_money,
            self.build_catalog(),
        )
    }

    pub fn seed_cost(&self, id: &CropId) -> Option<u32> {
        self.crops
            .iter()
            .find(|crop| &crop.id == id)
            .map(|crop| crop.seed_cost)
    }
}
