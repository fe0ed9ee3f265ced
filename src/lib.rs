pub mod catalog;
pub mod engine;
pub mod grid;
pub mod scenario;
pub mod snapshot;
pub mod web;

pub use catalog::{Catalog, CatalogError, CropId, CropSpecies};
pub use engine::Engine;
pub use grid::{FarmGrid, GridError, Rejection, Tile, Tool, ToolOutcome};
pub use snapshot::FarmSnapshot;
