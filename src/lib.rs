//! # geolayer-kernel
//!
//! Thematic world map engine: decodes a country topology, colors every
//! country by one of several interchangeable layers, and tracks the
//! viewport and hover state of the rendered scene.
//!
//! ## Core Contract
//!
//! 1. Decode an arc topology into one feature per country, keyed by its
//!    ISO 3166-1 numeric id
//! 2. Resolve features to countries through a single shared ISO table
//! 3. `color_for(feature, layer)` is pure and always lands in a bounded palette
//! 4. Layer switches recolor the existing scene; they never reload or re-project
//!
//! ## Architecture
//!
//! ```text
//! TopologySource → TopologyLoader → FeatureCollection
//!                                         ↓
//!          IdentifierBridge → LayerEncoder → Scene ← ViewportController
//!                                         ↓
//!                               InteractionLayer (tooltip)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same inputs + same layer → identical fill assignment
//! - Alliance precedence follows input order (first alliance wins)
//! - Draw order is topology order; hit testing picks the topmost feature

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod bridge;
pub mod canonical;
pub mod topology;
pub mod color;
pub mod encoder;
pub mod projection;
pub mod scene;
pub mod viewport;
pub mod interaction;
pub mod view;
pub mod dataset;
pub mod page;
pub mod config;

// Re-exports
pub use types::{
    Alliance, Conflict, Country, FeatureCollection, GeoBounds, GeometryFeature, LayerConfig,
    LayerKind, LegendItem, Region, ScreenPoint, ViewportSize,
};
pub use bridge::{CountryLookup, IdentifierBridge};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use topology::{
    decode_topology, LoadReport, LoadState, StaticTopologySource, TopologyError, TopologyLoader,
    TopologySource,
};
#[cfg(feature = "fs")]
pub use topology::FileTopologySource;
pub use color::{FillTransition, Rgb};
pub use encoder::{
    FillEncoder, IndexCache, LayerEncoder, Legend, MembershipEncoder, ALERT_FILL, HIGHLIGHT_FILL,
    NEUTRAL_FILL,
};
pub use projection::{FittedProjection, ProjectionKind};
pub use scene::{Scene, SceneFit, SceneStyle};
pub use viewport::{Gesture, InvalidScaleExtent, ScaleExtent, ViewTransform, ViewportController, WheelMode};
pub use interaction::{tier_label, HoverEvent, InteractionLayer, TooltipContent, TooltipState};
pub use view::{LayerState, RegionMap, WorldLayers, WorldMap};
pub use dataset::{DataDir, DatasetError, DomainDataset};
pub use page::{PageError, RegionPage, WorldPage};
pub use config::MapConfig;
