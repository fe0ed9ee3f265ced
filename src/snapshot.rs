//! Serializable read model of the engine state. The rendering layer draws
//! from these views and contains no decision logic of its own, so every
//! derived fact it needs (such as ripeness) is computed here.

use serde::Serialize;

use crate::catalog::CropId;
use crate::grid::Tool;

#[derive(Debug, Clone, Serialize)]
pub struct FarmSnapshot {
    pub scenario: String,
    pub day: u32,
    pub money: u32,
    pub active_tool: Tool,
    pub inventory: Vec<SeedStock>,
    pub grid: GridView,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedStock {
    pub crop: CropId,
    pub display_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<TileView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileStateView {
    Bare,
    Tilled,
    Planted,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    pub x: u32,
    pub y: u32,
    pub state: TileStateView,
    pub watered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_stages: Option<u32>,
    pub ripe: bool,
}
