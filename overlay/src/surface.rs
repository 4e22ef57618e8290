use std::ops::Mul;

use nalgebra::{
    Matrix3,
    Point2,
    Vector2,
};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Affine transform of the 2D display plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D(Matrix3<f32>);

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self(Matrix3::new_translation(&Vector2::new(x, y)))
    }

    /// Rotation in radians. With a y-down surface positive angles turn clockwise.
    pub fn rotation(angle: f32) -> Self {
        Self(Matrix3::new_rotation(angle))
    }

    pub fn scaling(x: f32, y: f32) -> Self {
        Self(Matrix3::new_nonuniform_scaling(&Vector2::new(x, y)))
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.0
    }

    pub fn transform_point(&self, point: [f32; 2]) -> [f32; 2] {
        let point = self.0.transform_point(&Point2::new(point[0], point[1]));
        [point.x, point.y]
    }
}

/// `a * b` applies `b` first.
impl Mul for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextShadow {
    #[default]
    None,
    /// Black copy of the text offset by one pixel, drawn underneath.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: [f32; 4],
    pub scale: f32,
    pub shadow: TextShadow,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            scale: 1.0,
            shadow: TextShadow::None,
        }
    }
}

impl TextStyle {
    pub fn shadow_style(&self) -> Self {
        Self {
            color: [0.0, 0.0, 0.0, self.color[3]],
            shadow: TextShadow::None,
            ..*self
        }
    }
}

/// Immediate mode drawing target for one frame.
///
/// Coordinates are in pixels with the origin at the top left corner and y
/// growing downwards. Implementations must only be driven from within the
/// host's draw callback.
pub trait DisplaySurface {
    fn resolution(&self) -> [f32; 2];

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId>;

    fn transform(&self) -> Transform2D;
    fn set_transform(&mut self, transform: Transform2D);

    fn color(&self) -> [f32; 4];
    fn set_color(&mut self, color: [f32; 4]);

    /// Draw the unit quad `[0, 1] x [0, 1]` through the current transform,
    /// tinted with the current color.
    fn blit(&mut self, texture: TextureId);

    fn measure_text(&self, text: &str, style: &TextStyle) -> [f32; 2];
    fn draw_text(&mut self, position: [f32; 2], text: &str, style: &TextStyle);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(actual: [f32; 2], expected: [f32; 2]) {
        assert!(
            (actual[0] - expected[0]).abs() < 1e-4 && (actual[1] - expected[1]).abs() < 1e-4,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn composition_applies_right_hand_side_first() {
        let transform = Transform2D::translation(10.0, 5.0) * Transform2D::scaling(2.0, 3.0);
        assert_point(transform.transform_point([1.0, 1.0]), [12.0, 8.0]);
    }

    #[test]
    fn positive_rotation_turns_towards_positive_y() {
        let transform = Transform2D::rotation(std::f32::consts::FRAC_PI_2);
        assert_point(transform.transform_point([1.0, 0.0]), [0.0, 1.0]);
    }
}
