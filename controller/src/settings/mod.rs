mod config;
pub use config::*;

mod esp;
pub use esp::*;
