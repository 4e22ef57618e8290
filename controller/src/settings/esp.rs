// controller/src/settings/esp.rs

use overlay::{
    TextShadow,
    TextStyle,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::enhancements::OverlayOptions;

/// RGBA color packed as little endian bytes.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, PartialOrd)]
pub struct Color(u32);

impl Color {
    pub fn as_u8(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub fn as_f32(&self) -> [f32; 4] {
        self.as_u8()
            .map(|channel| (channel as f32) / (u8::MAX as f32))
    }

    pub const fn from_u8(value: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(value))
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    pub fn from_f32(value: [f32; 4]) -> Self {
        Self::from_u8(value.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8))
    }

    pub fn set_alpha_u8(&mut self, alpha: u8) {
        let mut value = self.as_u8();
        value[3] = alpha;
        *self = Self::from_u8(value);
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self::from_u8(value)
    }
}

impl From<[f32; 4]> for Color {
    fn from(value: [f32; 4]) -> Self {
        Self::from_f32(value)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EspSettings {
    pub draw_box: bool,
    pub draw_line: bool,
    pub draw_label: bool,

    /// Box width is the projected height divided by this value.
    pub width_offset: f32,

    pub box_color: Color,
    pub box_thickness: f32,

    pub line_color: Color,
    pub line_thickness: f32,

    pub label_color: Color,
    /// Vertical label distance below the foot anchor in pixels.
    pub label_offset: f32,
    pub label_shadow: bool,
}

impl Default for EspSettings {
    fn default() -> Self {
        Self {
            draw_box: true,
            draw_line: true,
            draw_label: true,
            width_offset: 2.0,

            box_color: Color::from_u8([255, 0, 0, 255]),
            box_thickness: 1.0,

            line_color: Color::from_u8([255, 255, 255, 255]),
            line_thickness: 1.0,

            label_color: Color::from_u8([255, 255, 255, 255]),
            label_offset: 10.0,
            label_shadow: true,
        }
    }
}

impl EspSettings {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            color: self.label_color.as_f32(),
            scale: 1.0,
            shadow: if self.label_shadow {
                TextShadow::Drop
            } else {
                TextShadow::None
            },
        }
    }

    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            draw_box: self.draw_box,
            draw_line: self.draw_line,
            width_offset: self.width_offset,
            box_color: self.box_color.as_f32(),
            box_thickness: self.box_thickness,
            line_color: self.line_color.as_f32(),
            line_thickness: self.line_thickness,
        }
    }
}
