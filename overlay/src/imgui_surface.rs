use imgui::{
    DrawListMut,
    Ui,
};

use crate::{
    DisplaySurface,
    Result,
    TextStyle,
    TextureId,
    Transform2D,
};

const UNIT_QUAD: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// `DisplaySurface` backed by an imgui draw list.
///
/// Solid textures are drawn as filled convex polygons, imgui already
/// samples its white pixel for untextured geometry.
pub struct ImguiSurface<'a> {
    ui: &'a Ui,
    draw: &'a DrawListMut<'a>,
    transform: Transform2D,
    color: [f32; 4],
    texture_count: usize,
}

impl<'a> ImguiSurface<'a> {
    pub fn new(ui: &'a Ui, draw: &'a DrawListMut<'a>) -> Self {
        Self {
            ui,
            draw,
            transform: Transform2D::identity(),
            color: [1.0, 1.0, 1.0, 1.0],
            texture_count: 0,
        }
    }
}

impl DisplaySurface for ImguiSurface<'_> {
    fn resolution(&self) -> [f32; 2] {
        self.ui.io().display_size
    }

    fn create_texture(&mut self, width: u32, height: u32, _rgba: &[u8]) -> Result<TextureId> {
        self.texture_count += 1;
        log::trace!(
            "Registered solid {}x{} texture #{}",
            width,
            height,
            self.texture_count
        );
        Ok(TextureId(self.texture_count))
    }

    fn transform(&self) -> Transform2D {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
    }

    fn color(&self) -> [f32; 4] {
        self.color
    }

    fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    fn blit(&mut self, _texture: TextureId) {
        let corners = UNIT_QUAD
            .iter()
            .map(|corner| self.transform.transform_point(*corner))
            .collect::<Vec<_>>();

        self.draw
            .add_polyline(corners, self.color)
            .filled(true)
            .build();
    }

    /// Text is always drawn at the current font size, `style.scale` is ignored.
    fn measure_text(&self, text: &str, _style: &TextStyle) -> [f32; 2] {
        self.ui.calc_text_size(text)
    }

    fn draw_text(&mut self, position: [f32; 2], text: &str, style: &TextStyle) {
        self.draw.add_text(position, style.color, text);
    }
}
