use crate::{
    DisplaySurface,
    Result,
    TextStyle,
    TextureId,
    Transform2D,
};

const GLYPH_WIDTH: f32 = 7.0;
const GLYPH_HEIGHT: f32 = 13.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Blit {
        texture: TextureId,
        transform: Transform2D,
        color: [f32; 4],
    },
    Text {
        position: [f32; 2],
        text: String,
        color: [f32; 4],
    },
}

impl DrawCommand {
    /// Start and end of the unit quad's leading edge for blit commands.
    /// For lines drawn by the `PrimitiveRenderer` this is the drawn segment.
    pub fn segment(&self) -> Option<([f32; 2], [f32; 2])> {
        match self {
            Self::Blit { transform, .. } => Some((
                transform.transform_point([0.0, 0.0]),
                transform.transform_point([1.0, 0.0]),
            )),
            Self::Text { .. } => None,
        }
    }
}

/// Headless surface which records every draw call.
/// Text is measured with fixed monospace glyph metrics.
pub struct RecordingSurface {
    resolution: [f32; 2],
    transform: Transform2D,
    color: [f32; 4],
    textures: Vec<(u32, u32)>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(resolution: [f32; 2]) -> Self {
        Self {
            resolution,
            transform: Transform2D::identity(),
            color: [1.0, 1.0, 1.0, 1.0],
            textures: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn set_resolution(&mut self, resolution: [f32; 2]) {
        self.resolution = resolution;
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn segments(&self) -> Vec<([f32; 2], [f32; 2])> {
        self.commands
            .iter()
            .filter_map(DrawCommand::segment)
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::Blit { .. } => None,
            })
            .collect()
    }
}

impl DisplaySurface for RecordingSurface {
    fn resolution(&self) -> [f32; 2] {
        self.resolution
    }

    fn create_texture(&mut self, width: u32, height: u32, _rgba: &[u8]) -> Result<TextureId> {
        self.textures.push((width, height));
        Ok(TextureId(self.textures.len()))
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

    fn blit(&mut self, texture: TextureId) {
        self.commands.push(DrawCommand::Blit {
            texture,
            transform: self.transform,
            color: self.color,
        });
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> [f32; 2] {
        [
            text.chars().count() as f32 * GLYPH_WIDTH * style.scale,
            GLYPH_HEIGHT * style.scale,
        ]
    }

    fn draw_text(&mut self, position: [f32; 2], text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color: style.color,
        });
    }
}
