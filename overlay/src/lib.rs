use thiserror::Error;

mod surface;
pub use surface::*;

mod primitives;
pub use primitives::*;

mod recording;
pub use recording::*;

mod imgui_surface;
pub use imgui_surface::*;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("failed to create a {width}x{height} texture: {message}")]
    TextureCreation {
        width: u32,
        height: u32,
        message: String,
    },

    #[error("the display surface is not available")]
    SurfaceUnavailable,
}

pub type Result<T> = std::result::Result<T, OverlayError>;
