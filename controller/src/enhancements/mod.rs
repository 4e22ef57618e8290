// controller/src/enhancements/mod.rs

use overlay::{
    DisplaySurface,
    PrimitiveRenderer,
};
use utils_state::StateRegistry;

use crate::UpdateContext;

/// Draw phase resources handed to every enhancement.
pub struct FrameContext<'a> {
    pub renderer: &'a PrimitiveRenderer,
    pub surface: &'a mut dyn DisplaySurface,
}

pub trait Enhancement {
    fn update(&mut self, ctx: &UpdateContext) -> anyhow::Result<()>;

    fn render(&mut self, states: &StateRegistry, frame: &mut FrameContext) -> anyhow::Result<()>;
}

mod esp;
pub use esp::*;

mod trigger;
pub use trigger::*;
