pub mod engine;
pub mod projection;
pub mod rasterizer;
pub mod types;

pub use engine::Engine;
pub use projection::{ColumnExtent, Projector};
pub use rasterizer::Rasterizer;
pub use types::{ColumnBound, RasterOptions, RenderArea, Screen};
