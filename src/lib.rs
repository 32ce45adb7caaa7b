pub mod cache;
pub mod camera;
pub mod canvas;
pub mod collider;
pub mod error;
pub mod geometry;
pub mod graphic;
pub mod mesh;
pub mod raycast;
pub mod renderer;
pub mod settings;
pub mod surface;

pub use canvas::{CurvedCanvas, CurvedSurface, WidgetFrame};
pub use error::HudError;
pub use settings::CanvasSettings;
pub use surface::SurfaceConfig;
