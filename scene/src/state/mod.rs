mod camera;
pub use camera::*;

mod targets;
pub use targets::*;
