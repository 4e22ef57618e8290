use nalgebra::{
    UnitQuaternion,
    Vector3,
};

/// Fraction of the render surface covered by a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Viewport {
    /// Viewport size in whole pixels for a surface of the given resolution.
    pub fn pixel_size(&self, surface: [f32; 2]) -> [f32; 2] {
        [
            (surface[0] * self.width).round(),
            (surface[1] * self.height).round(),
        ]
    }

    pub fn aspect_ratio(&self, surface: [f32; 2]) -> f32 {
        let [width, height] = self.pixel_size(surface);
        width / height
    }
}

/// Read-only camera snapshot for one frame.
///
/// The camera looks down its local +z axis with +y up and +x to the right.
/// `fov` is the vertical field of view in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub fov: f32,
    pub viewport: Viewport,
}

impl CameraState {
    pub fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>, fov: f32) -> Self {
        Self {
            position,
            rotation,
            fov,
            viewport: Viewport::default(),
        }
    }

    pub fn looking_at(
        position: Vector3<f32>,
        target: Vector3<f32>,
        up: Vector3<f32>,
        fov: f32,
    ) -> Self {
        let rotation = UnitQuaternion::face_towards(&(target - position), &up);
        Self::new(position, rotation, fov)
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * Vector3::z()
    }

    /// Transform a world space point into camera local space.
    pub fn to_local(&self, world: &Vector3<f32>) -> Vector3<f32> {
        self.rotation.inverse_transform_vector(&(world - self.position))
    }

    /// `1 / tan(fov / 2)`
    pub fn focal_scale(&self) -> f32 {
        let fov_radians = self.fov * std::f32::consts::PI / 180.0;
        1.0 / (fov_radians / 2.0).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_pixels_are_rounded() {
        let viewport = Viewport {
            width: 0.5,
            height: 0.333,
        };
        assert_eq!(viewport.pixel_size([1921.0, 1080.0]), [961.0, 360.0]);
    }

    #[test]
    fn local_space_follows_orientation() {
        let camera = CameraState::looking_at(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::y(),
            90.0,
        );

        let local = camera.to_local(&Vector3::new(5.0, 1.0, 0.0));
        assert!((local.z - 5.0).abs() < 1e-5);
        assert!((local.y - 1.0).abs() < 1e-5);

        let behind = camera.to_local(&Vector3::new(-5.0, 0.0, 0.0));
        assert!(behind.z < 0.0);
    }

    #[test]
    fn focal_scale_of_right_angle_fov_is_one() {
        let camera = CameraState::new(Vector3::zeros(), UnitQuaternion::identity(), 90.0);
        assert!((camera.focal_scale() - 1.0).abs() < 1e-6);
    }
}
