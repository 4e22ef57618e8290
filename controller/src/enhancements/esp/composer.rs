use nalgebra::Vector3;
use overlay::{
    DisplaySurface,
    PrimitiveRenderer,
};
use scene::CameraState;

use crate::view::{
    self,
    ScreenPoint,
};

/// Foot and head anchors are placed this far below and above the pivot.
/// Fixed for every target regardless of its actual extent.
pub const ANCHOR_HALF_HEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions {
    pub draw_box: bool,
    pub draw_line: bool,
    pub width_offset: f32,

    pub box_color: [f32; 4],
    pub box_thickness: f32,

    pub line_color: [f32; 4],
    pub line_thickness: f32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            draw_box: true,
            draw_line: true,
            width_offset: 2.0,

            box_color: [1.0, 1.0, 1.0, 1.0],
            box_thickness: 1.0,

            line_color: [1.0, 1.0, 1.0, 1.0],
            line_thickness: 1.0,
        }
    }
}

/// Screen space layout of one target overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetOverlay {
    pub foot: ScreenPoint,
    pub head: ScreenPoint,

    /// `head.y - foot.y`. Not clamped, a flipped camera yields a negative height.
    pub height: f32,
    pub width: f32,

    /// Top left corner of the box in display coordinates.
    pub box_origin: [f32; 2],
    pub foot_display: [f32; 2],
}

pub fn anchor_positions(pivot: &Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let offset = Vector3::new(0.0, ANCHOR_HALF_HEIGHT, 0.0);
    (pivot - offset, pivot + offset)
}

/// Returns `None` if the foot anchor is not in front of the camera.
pub fn compute_target_overlay(
    camera: &CameraState,
    surface: [f32; 2],
    pivot: &Vector3<f32>,
    width_offset: f32,
) -> Option<TargetOverlay> {
    let (foot_world, head_world) = anchor_positions(pivot);

    let foot = view::world_to_screen(&foot_world, camera, surface);
    if !foot.is_visible() {
        return None;
    }

    let head = view::world_to_screen(&head_world, camera, surface);
    Some(TargetOverlay::from_anchors(foot, head, surface, width_offset))
}

impl TargetOverlay {
    pub fn from_anchors(
        foot: ScreenPoint,
        head: ScreenPoint,
        surface: [f32; 2],
        width_offset: f32,
    ) -> Self {
        let height = head.y - foot.y;
        let width = height / width_offset;

        Self {
            foot,
            head,
            height,
            width,
            box_origin: [foot.x - width / 2.0, surface[1] - foot.y - height],
            foot_display: view::to_display(&foot, surface),
        }
    }

    /// A head anchor on the camera plane projects to infinity.
    /// Negative extents are still a valid box.
    pub fn has_finite_box(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.box_origin.iter().all(|value| value.is_finite())
    }
}

pub fn draw_target_overlay<S: DisplaySurface + ?Sized>(
    renderer: &PrimitiveRenderer,
    surface: &mut S,
    camera: &CameraState,
    pivot: &Vector3<f32>,
    options: &OverlayOptions,
) -> overlay::Result<Option<TargetOverlay>> {
    let resolution = surface.resolution();
    let Some(target) = compute_target_overlay(camera, resolution, pivot, options.width_offset)
    else {
        return Ok(None);
    };

    draw_overlay_primitives(renderer, surface, &target, options)?;
    Ok(Some(target))
}

pub fn draw_overlay_primitives<S: DisplaySurface + ?Sized>(
    renderer: &PrimitiveRenderer,
    surface: &mut S,
    target: &TargetOverlay,
    options: &OverlayOptions,
) -> overlay::Result<()> {
    if options.draw_box && target.has_finite_box() {
        renderer.draw_box(
            surface,
            target.box_origin[0],
            target.box_origin[1],
            target.width,
            target.height,
            options.box_color,
            options.box_thickness,
        )?;
    }

    if options.draw_line {
        let resolution = surface.resolution();
        let center = [resolution[0] / 2.0, resolution[1] / 2.0];
        renderer.draw_line(
            surface,
            center,
            target.foot_display,
            options.line_color,
            options.line_thickness,
        )?;
    }

    Ok(())
}
