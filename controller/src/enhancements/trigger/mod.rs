use scene::{
    StateLocalPlayer,
    StateSceneHandle,
    StateTargetList,
};
use utils_state::StateRegistry;

use super::{
    Enhancement,
    FrameContext,
};
use crate::{
    settings::AppSettings,
    view::ViewController,
    UpdateContext,
};

mod action;
pub use action::*;

mod crosshair;
pub use crosshair::*;

/// Presses the pointer button while a valid target part is under the crosshair.
pub struct TriggerBot {
    action: ActionTrigger,
}

impl TriggerBot {
    pub fn new() -> Self {
        Self {
            action: ActionTrigger::new(),
        }
    }

    pub fn action(&self) -> &ActionTrigger {
        &self.action
    }

    fn is_target_acquired(&self, ctx: &UpdateContext, valid_parts: &[String]) -> anyhow::Result<bool> {
        let Some(pointer) = ctx.pointer.position() else {
            return Ok(false);
        };

        let view = ctx.states.resolve::<ViewController>(())?;
        let Some(ray) = view.screen_ray(pointer) else {
            return Ok(false);
        };

        let scene = ctx.states.resolve::<StateSceneHandle>(())?;
        let targets = ctx.states.resolve::<StateTargetList>(())?;
        let local_player = ctx.states.resolve::<StateLocalPlayer>(())?;

        Ok(is_target_under_crosshair(
            scene.handle(),
            targets.targets(),
            local_player.player.as_deref(),
            &ray,
            valid_parts,
        ))
    }
}

impl Default for TriggerBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Enhancement for TriggerBot {
    fn update(&mut self, ctx: &UpdateContext) -> anyhow::Result<()> {
        let settings = ctx.states.resolve::<AppSettings>(())?;

        if settings.trigger_enabled && !self.action.is_running() {
            let acquired = match self.is_target_acquired(ctx, &settings.trigger.valid_parts) {
                Ok(acquired) => acquired,
                Err(error) => {
                    log::trace!("Crosshair target unavailable: {:#}", error);
                    false
                }
            };

            self.action
                .maybe_fire(acquired, settings.trigger.delay(), ctx.now);
        }

        /* a running sequence always completes, even if the trigger got disabled */
        self.action.tick(ctx.now, ctx.pointer);
        Ok(())
    }

    fn render(&mut self, _states: &StateRegistry, _frame: &mut FrameContext) -> anyhow::Result<()> {
        Ok(())
    }
}
