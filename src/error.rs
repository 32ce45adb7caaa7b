use thiserror::Error;

/// Everything that can go wrong while curving or hit-testing a canvas.
///
/// None of these abort a frame: callers log them and fall back (skip the
/// widget's geometry update, or disable interaction for the canvas). A ray
/// that misses the canvas is a plain `None`, not an error.
#[derive(Error, Debug)]
pub enum HudError {
    #[error("canvas size must be bigger than 0, got {width}x{height}")]
    Configuration { width: f32, height: f32 },
    #[error("canvas has no {0}; raycasting disabled until one is assigned")]
    MissingDependency(&'static str),
    #[error("angle {requested}° would give a degenerate radius, using {clamped}°")]
    GeometryDegenerate { requested: f32, clamped: f32 },
    #[error("triangle stream of {0} vertices is not made of quads")]
    NonQuadStream(usize),
    #[error("malformed canvas settings: {0}")]
    Settings(#[from] serde_json::Error),
}
