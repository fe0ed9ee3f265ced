use std::collections::HashMap;

use crate::catalog::{Catalog, CatalogError, CropId};
use crate::grid::{FarmGrid, GridError, Rejection, Tile, Tool, ToolOutcome};
use crate::snapshot::{FarmSnapshot, GridView, SeedStock, TileStateView, TileView};

/// The simulation controller. Owns the grid, the economy (day counter,
/// money, seed inventory) and the active tool, and is the only way the
/// outside world mutates any of them. One engine per session; callers hold
/// it directly, there is no global instance.
pub struct Engine {
    grid: FarmGrid,
    catalog: Catalog,
    day: u32,
    money: u32,
    inventory: HashMap<CropId, u32>,
    active_tool: Tool,
}

impl Engine {
    pub fn new(width: u32, height: u32, starting_money: u32, catalog: Catalog) -> Self {
        Self {
            grid: FarmGrid::new(width, height),
            catalog,
            day: 1,
            money: starting_money,
            inventory: HashMap::new(),
            // The hoe is in hand when the session starts.
            active_tool: Tool::Till,
        }
    }

    /// Swap the tool in hand. Fails only when a planting tool names a crop
    /// the catalog has never heard of, which is a caller bug rather than
    /// gameplay feedback.
    pub fn select_tool(&mut self, tool: Tool) -> Result<(), CatalogError> {
        if let Tool::Plant(crop) = &tool {
            self.catalog.species(crop)?;
        }
        self.active_tool = tool;
        Ok(())
    }

    /// Apply the active tool to the tile at (`x`, `y`) and settle the
    /// economy side of whatever happened: planting spends a seed, a
    /// harvest credits its payout. A rejected action changes nothing.
    pub fn use_tool_at(&mut self, x: u32, y: u32) -> Result<ToolOutcome, GridError> {
        let tool = self.active_tool.clone();
        if let Tool::Plant(crop) = &tool {
            // Checked here rather than in the grid: the pouch is economy
            // state and the grid never sees it.
            if self.seed_count(crop) == 0 {
                return Ok(ToolOutcome::Rejected(Rejection::InsufficientSeeds));
            }
        }

        let outcome = self.grid.apply_tool(x, y, &tool, &self.catalog)?;
        if outcome.is_applied() {
            match &tool {
                Tool::Plant(crop) => {
                    if let Some(count) = self.inventory.get_mut(crop) {
                        *count -= 1;
                    }
                }
                Tool::Harvest => {
                    if let Some(payout) = outcome.payout() {
                        self.money += payout;
                    }
                }
                Tool::Till | Tool::Water => {}
            }
        }
        Ok(outcome)
    }

    /// Spend `unit_cost` on one seed of `crop`. On success the bought seed
    /// becomes the active tool, so the next tile click plants it.
    pub fn buy_seeds(&mut self, crop: &CropId, unit_cost: u32) -> Result<ToolOutcome, CatalogError> {
        self.catalog.species(crop)?;
        if self.money < unit_cost {
            return Ok(ToolOutcome::Rejected(Rejection::InsufficientFunds));
        }
        self.money -= unit_cost;
        *self.inventory.entry(crop.clone()).or_insert(0) += 1;
        self.active_tool = Tool::Plant(crop.clone());
        Ok(ToolOutcome::Applied { payout: None })
    }

    /// Let one in-game day pass: bump the day counter and run the growth
    /// sweep. Money and inventory are untouched.
    pub fn advance_day(&mut self) -> Result<(), GridError> {
        self.day += 1;
        self.grid.advance_day(&self.catalog)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn active_tool(&self) -> &Tool {
        &self.active_tool
    }

    pub fn seed_count(&self, crop: &CropId) -> u32 {
        self.inventory.get(crop).copied().unwrap_or(0)
    }

    pub fn tile(&self, x: u32, y: u32) -> Result<&Tile, GridError> {
        self.grid.tile(x, y)
    }

    pub fn grid(&self) -> &FarmGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Flatten the whole session into the serializable read model.
    pub fn snapshot(&self, scenario: &str) -> FarmSnapshot {
        let inventory = self
            .catalog
            .iter()
            .map(|species| SeedStock {
                crop: species.id.clone(),
                display_name: species.display_name.clone(),
                count: self.seed_count(&species.id),
            })
            .collect();

        let tiles = self
            .grid
            .tiles()
            .map(|(x, y, tile)| match tile {
                Tile::Bare => TileView {
                    x,
                    y,
                    state: TileStateView::Bare,
                    watered: false,
                    crop: None,
                    stage: None,
                    total_stages: None,
                    ripe: false,
                },
                Tile::Tilled { watered } => TileView {
                    x,
                    y,
                    state: TileStateView::Tilled,
                    watered: *watered,
                    crop: None,
                    stage: None,
                    total_stages: None,
                    ripe: false,
                },
                Tile::Planted {
                    crop,
                    stage,
                    watered,
                } => {
                    let total_stages = self
                        .catalog
                        .species(crop)
                        .map(|species| species.total_stages)
                        .unwrap_or(*stage);
                    TileView {
                        x,
                        y,
                        state: TileStateView::Planted,
                        watered: *watered,
                        crop: Some(crop.clone()),
                        stage: Some(*stage),
                        total_stages: Some(total_stages),
                        ripe: *stage == total_stages,
                    }
                }
            })
            .collect();

        FarmSnapshot {
            scenario: scenario.to_string(),
            day: self.day,
            money: self.money,
            active_tool: self.active_tool.clone(),
            inventory,
            grid: GridView {
                width: self.grid.width(),
                height: self.grid.height(),
                tiles,
            },
        }
    }
}
