mod camera;
pub use camera::*;

mod transform;
pub use transform::*;

mod target;
pub use target::*;

mod handle;
pub use handle::*;

mod state;
pub use state::*;

mod simulated;
pub use simulated::*;
