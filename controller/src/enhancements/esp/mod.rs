use anyhow::Context;
use nalgebra::Vector3;
use overlay::{
    DisplaySurface,
    PrimitiveRenderer,
};
use scene::{
    CameraState,
    StateLocalPlayer,
    StateTargetList,
    Target,
};
use utils_state::StateRegistry;

use super::{
    Enhancement,
    FrameContext,
};
use crate::{
    settings::{
        AppSettings,
        EspSettings,
    },
    view::ViewController,
    UpdateContext,
};

mod composer;
pub use composer::*;

/// Draws a box, a line and a distance label for every known target.
pub struct TargetESP;

impl TargetESP {
    pub fn new() -> Self {
        Self
    }

    fn render_target(
        &self,
        renderer: &PrimitiveRenderer,
        surface: &mut dyn DisplaySurface,
        camera: &CameraState,
        origin: &Vector3<f32>,
        settings: &EspSettings,
        target: &dyn Target,
    ) -> anyhow::Result<()> {
        let pivot = target.pivot_position()?;
        let label = if settings.draw_label {
            let name = target.display_name()?;
            Some(format!("{} [{:.1}m]", name, (pivot - origin).norm()))
        } else {
            None
        };

        let Some(overlay) =
            draw_target_overlay(renderer, surface, camera, &pivot, &settings.overlay_options())?
        else {
            return Ok(());
        };

        if let Some(label) = label {
            let position = [
                overlay.foot_display[0],
                overlay.foot_display[1] + settings.label_offset,
            ];
            renderer.draw_label(surface, position, &label, true)?;
        }

        Ok(())
    }
}

impl Default for TargetESP {
    fn default() -> Self {
        Self::new()
    }
}

impl Enhancement for TargetESP {
    fn update(&mut self, _ctx: &UpdateContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn render(&mut self, states: &StateRegistry, frame: &mut FrameContext) -> anyhow::Result<()> {
        let settings = states.resolve::<AppSettings>(())?;
        if !settings.esp_enabled {
            return Ok(());
        }

        let view = states.resolve::<ViewController>(())?;
        let Some(camera) = view.camera() else {
            return Ok(());
        };

        let targets = states
            .resolve::<StateTargetList>(())
            .context("target list")?;
        let local_player = states
            .resolve::<StateLocalPlayer>(())
            .context("local player")?;

        let local_id = local_player.player.as_ref().map(|player| player.id());
        let origin = local_player
            .player
            .as_ref()
            .and_then(|player| player.pivot_position().ok())
            .unwrap_or(camera.position);

        for target in targets.targets() {
            if Some(target.id()) == local_id {
                continue;
            }

            if let Err(error) = self.render_target(
                frame.renderer,
                &mut *frame.surface,
                camera,
                &origin,
                &settings.esp,
                &**target,
            ) {
                log::debug!("Skipping overlay for target {}: {:#}", target.id().0, error);
            }
        }

        Ok(())
    }
}
