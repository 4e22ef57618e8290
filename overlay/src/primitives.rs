use std::cell::OnceCell;

use crate::{
    DisplaySurface,
    Result,
    TextShadow,
    TextStyle,
    TextureId,
    Transform2D,
};

const FILL_TEXTURE_RGBA: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Saves the surface transform and color and restores them when dropped.
struct SurfaceScope<'a, S: DisplaySurface + ?Sized> {
    surface: &'a mut S,
    transform: Transform2D,
    color: [f32; 4],
}

impl<'a, S: DisplaySurface + ?Sized> SurfaceScope<'a, S> {
    fn enter(surface: &'a mut S) -> Self {
        let transform = surface.transform();
        let color = surface.color();
        Self {
            surface,
            transform,
            color,
        }
    }
}

impl<S: DisplaySurface + ?Sized> Drop for SurfaceScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_transform(self.transform);
        self.surface.set_color(self.color);
    }
}

/// Draws lines, boxes and labels in display coordinates.
///
/// Owns the resources shared by all draw calls: a 1x1 white fill texture,
/// created on the first draw, and the label text style.
pub struct PrimitiveRenderer {
    fill_texture: OnceCell<TextureId>,
    text_style: TextStyle,
}

impl PrimitiveRenderer {
    pub fn new(text_style: TextStyle) -> Self {
        Self {
            fill_texture: OnceCell::new(),
            text_style,
        }
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    fn fill_texture<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> Result<TextureId> {
        if let Some(texture) = self.fill_texture.get() {
            return Ok(*texture);
        }

        let texture = surface.create_texture(1, 1, &FILL_TEXTURE_RGBA)?;
        log::debug!("Created overlay fill texture {:?}", texture);
        Ok(*self.fill_texture.get_or_init(|| texture))
    }

    /// Draw a `thickness` wide segment from `a` to `b`.
    /// Zero length segments are skipped.
    pub fn draw_line<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        a: [f32; 2],
        b: [f32; 2],
        color: [f32; 4],
        thickness: f32,
    ) -> Result<()> {
        let delta = [b[0] - a[0], b[1] - a[1]];
        let length = (delta[0] * delta[0] + delta[1] * delta[1]).sqrt();
        if !(length > f32::EPSILON) {
            return Ok(());
        }

        let mut angle = (delta[0] / length).clamp(-1.0, 1.0).acos();
        if a[1] > b[1] {
            angle = -angle;
        }

        let texture = self.fill_texture(surface)?;
        let mut scope = SurfaceScope::enter(surface);
        let line = Transform2D::translation(a[0], a[1])
            * Transform2D::rotation(angle)
            * Transform2D::scaling(length, thickness);

        scope.surface.set_transform(scope.transform * line);
        scope.surface.set_color(color);
        scope.surface.blit(texture);
        Ok(())
    }

    /// Unfilled rectangle with its top left corner at `(x, y)`.
    pub fn draw_box<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: [f32; 4],
        thickness: f32,
    ) -> Result<()> {
        let (left, right) = (x, x + width);
        let (top, bottom) = (y, y + height);

        self.draw_line(surface, [left, top], [right, top], color, thickness)?;
        self.draw_line(surface, [left, top], [left, bottom], color, thickness)?;
        self.draw_line(surface, [right, top], [right, bottom], color, thickness)?;
        self.draw_line(surface, [left, bottom], [right, bottom], color, thickness)?;
        Ok(())
    }

    pub fn draw_label<S: DisplaySurface + ?Sized>(
        &self,
        surface: &mut S,
        position: [f32; 2],
        text: &str,
        centered: bool,
    ) -> Result<()> {
        let position = if centered {
            let [width, height] = surface.measure_text(text, &self.text_style);
            [position[0] - width / 2.0, position[1] - height / 2.0]
        } else {
            position
        };

        if self.text_style.shadow == TextShadow::Drop {
            surface.draw_text(
                [position[0] + 1.0, position[1] + 1.0],
                text,
                &self.text_style.shadow_style(),
            );
        }

        surface.draw_text(position, text, &self.text_style);
        Ok(())
    }
}

impl Default for PrimitiveRenderer {
    fn default() -> Self {
        Self::new(TextStyle::default())
    }
}
