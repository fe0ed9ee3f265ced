use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, CropId};

/// One cell of the farm. The variant carries exactly the fields that are
/// meaningful in that state, so a bare tile can never hold a stale crop
/// or growth stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
    Bare,
    Tilled { watered: bool },
    Planted { crop: CropId, stage: u32, watered: bool },
}

impl Tile {
    pub fn is_watered(&self) -> bool {
        match self {
            Tile::Bare => false,
            Tile::Tilled { watered } | Tile::Planted { watered, .. } => *watered,
        }
    }
}

/// The player's currently selected action mode. Determines what a tile
/// click does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Till,
    Water,
    Harvest,
    Plant(CropId),
}

/// Why a tool use was turned down. These are ordinary gameplay feedback,
/// not faults: clicking the wrong tile is something players do constantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    AlreadyTilled,
    NothingToWater,
    PlotNotTilled,
    NothingToHarvest,
    NotRipe,
    InsufficientSeeds,
    InsufficientFunds,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Rejection::AlreadyTilled => "That ground is already worked",
            Rejection::NothingToWater => "There is no tilled soil to water here",
            Rejection::PlotNotTilled => "Seeds need tilled soil",
            Rejection::NothingToHarvest => "Nothing is growing here",
            Rejection::NotRipe => "That crop is not ready yet",
            Rejection::InsufficientSeeds => "No seeds of that kind left",
            Rejection::InsufficientFunds => "Not enough money",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool changed the world. `payout` is set only by a harvest and
    /// names the sale value the caller should credit.
    Applied { payout: Option<u32> },
    /// Precondition not met; nothing changed.
    Rejected(Rejection),
}

impl ToolOutcome {
    fn applied() -> Self {
        ToolOutcome::Applied { payout: None }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ToolOutcome::Applied { .. })
    }

    pub fn payout(&self) -> Option<u32> {
        match self {
            ToolOutcome::Applied { payout } => *payout,
            ToolOutcome::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("coordinates ({x}, {y}) fall outside the {width}x{height} farm")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixed-size field of tiles. Created once per session, never resized,
/// and mutated only through [`FarmGrid::apply_tool`] and
/// [`FarmGrid::advance_day`].
#[derive(Debug, Clone)]
pub struct FarmGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl FarmGrid {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width >= 1 && height >= 1, "farm must be at least 1x1");
        Self {
            width,
            height,
            tiles: vec![Tile::Bare; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }

    pub fn tile(&self, x: u32, y: u32) -> Result<&Tile, GridError> {
        let idx = self.index(x, y)?;
        Ok(&self.tiles[idx])
    }

    /// All tiles with their coordinates, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, &Tile)> {
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let i = i as u32;
            (i % self.width, i / self.width, tile)
        })
    }

    /// Apply `tool` to the tile at (`x`, `y`). A tile whose state does not
    /// admit the tool yields `Rejected` and stays untouched; only bad
    /// coordinates or an unregistered crop id are actual errors.
    pub fn apply_tool(
        &mut self,
        x: u32,
        y: u32,
        tool: &Tool,
        catalog: &Catalog,
    ) -> Result<ToolOutcome, GridError> {
        let idx = self.index(x, y)?;
        match tool {
            Tool::Till => match self.tiles[idx] {
                Tile::Bare => {
                    self.tiles[idx] = Tile::Tilled { watered: false };
                    Ok(ToolOutcome::applied())
                }
                _ => Ok(ToolOutcome::Rejected(Rejection::AlreadyTilled)),
            },
            Tool::Water => match &mut self.tiles[idx] {
                Tile::Tilled { watered } | Tile::Planted { watered, .. } => {
                    *watered = true;
                    Ok(ToolOutcome::applied())
                }
                Tile::Bare => Ok(ToolOutcome::Rejected(Rejection::NothingToWater)),
            },
            Tool::Plant(crop) => {
                catalog.species(crop)?;
                match self.tiles[idx] {
                    Tile::Tilled { .. } => {
                        // A freshly sown tile counts as watered for its
                        // planting day.
                        self.tiles[idx] = Tile::Planted {
                            crop: crop.clone(),
                            stage: 1,
                            watered: true,
                        };
                        Ok(ToolOutcome::applied())
                    }
                    _ => Ok(ToolOutcome::Rejected(Rejection::PlotNotTilled)),
                }
            }
            Tool::Harvest => match &self.tiles[idx] {
                Tile::Planted { crop, stage, .. } => {
                    let species = catalog.species(crop)?;
                    if *stage == species.total_stages {
                        let payout = species.sale_value;
                        self.tiles[idx] = Tile::Bare;
                        Ok(ToolOutcome::Applied {
                            payout: Some(payout),
                        })
                    } else {
                        Ok(ToolOutcome::Rejected(Rejection::NotRipe))
                    }
                }
                _ => Ok(ToolOutcome::Rejected(Rejection::NothingToHarvest)),
            },
        }
    }

    /// One in-game day passes. Every watered, planted tile gains a growth
    /// stage (clamped at its species' maximum) and dries out. Unwatered
    /// crops neither grow nor die; they wait for water.
    pub fn advance_day(&mut self, catalog: &Catalog) -> Result<(), GridError> {
        for tile in &mut self.tiles {
            if let Tile::Planted {
                crop,
                stage,
                watered,
            } = tile
            {
                if *watered {
                    let max = catalog.species(crop)?.total_stages;
                    *stage = (*stage + 1).min(max);
                    *watered = false;
                }
            }
        }
        Ok(())
    }
}
