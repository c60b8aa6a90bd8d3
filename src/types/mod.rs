//! Core types for the map kernel.
//!
//! Domain records (`Country`, `Alliance`, `Conflict`, `LayerConfig`,
//! `Region`) are immutable once loaded. Geometry types describe the decoded
//! topology in geographic coordinates; screen types describe the rendered
//! viewport.

pub mod country;
pub mod alliance;
pub mod conflict;
pub mod layer;
pub mod region;
pub mod geometry;
pub mod screen;

pub use country::Country;
pub use alliance::Alliance;
pub use conflict::Conflict;
pub use layer::{LayerConfig, LayerKind, LegendItem, ParseLayerError};
pub use region::{GeoBounds, Region};
pub use geometry::{FeatureCollection, GeometryFeature};
pub use screen::{ScreenPoint, ViewportSize};
