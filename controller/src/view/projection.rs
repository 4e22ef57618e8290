use nalgebra::Vector3;
use scene::{
    CameraState,
    Ray,
};

/// Projected point. `x`/`y` are pixels with the origin in the bottom left
/// corner of the surface, `depth` is the camera local z coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenPoint {
    /// Only points in front of the camera may be drawn.
    pub fn is_visible(&self) -> bool {
        self.depth.is_finite() && self.depth > 0.0
    }
}

pub fn world_to_screen(world: &Vector3<f32>, camera: &CameraState, surface: [f32; 2]) -> ScreenPoint {
    let local = camera.to_local(world);
    let focal = camera.focal_scale();
    let aspect = camera.viewport.aspect_ratio(surface);

    let ndc_x = (local.x / local.z) * focal / aspect;
    let ndc_y = (local.y / local.z) * focal;

    ScreenPoint {
        x: (ndc_x * 0.5 + 0.5) * surface[0],
        y: (ndc_y * 0.5 + 0.5) * surface[1],
        depth: local.z,
    }
}

/// Pixel position (bottom left origin) to normalized device coordinates.
pub fn screen_to_ndc(point: [f32; 2], surface: [f32; 2]) -> [f32; 2] {
    [
        point[0] / surface[0] * 2.0 - 1.0,
        point[1] / surface[1] * 2.0 - 1.0,
    ]
}

/// Flip a projected y coordinate into the top left origin display space.
pub fn to_display(point: &ScreenPoint, surface: [f32; 2]) -> [f32; 2] {
    [point.x, surface[1] - point.y]
}

/// World space ray from the camera through a display (top left origin) pixel.
pub fn screen_ray(camera: &CameraState, surface: [f32; 2], display: [f32; 2]) -> Option<Ray> {
    let [ndc_x, ndc_y] = screen_to_ndc([display[0], surface[1] - display[1]], surface);
    let focal = camera.focal_scale();
    let aspect = camera.viewport.aspect_ratio(surface);

    let direction = Vector3::new(ndc_x * aspect / focal, ndc_y / focal, 1.0);
    Ray::new(camera.position, camera.rotation * direction)
}

#[cfg(test)]
mod tests {
    use nalgebra::UnitQuaternion;
    use scene::Viewport;

    use super::*;

    const SURFACE: [f32; 2] = [1920.0, 1080.0];

    fn cameras() -> Vec<CameraState> {
        vec![
            CameraState::new(Vector3::zeros(), UnitQuaternion::identity(), 60.0),
            CameraState::new(
                Vector3::new(3.0, -2.0, 7.5),
                UnitQuaternion::from_euler_angles(0.2, -1.1, 0.4),
                75.0,
            ),
            CameraState::looking_at(
                Vector3::new(-10.0, 4.0, 2.0),
                Vector3::new(5.0, 0.0, 20.0),
                Vector3::y(),
                90.0,
            )
            .with_viewport(Viewport {
                width: 0.5,
                height: 1.0,
            }),
        ]
    }

    fn world_points() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(1.5, -3.0, 25.0),
            Vector3::new(-40.0, 12.0, 3.0),
            Vector3::new(7.0, 7.0, -7.0),
            Vector3::new(100.0, -50.0, 80.0),
        ]
    }

    #[test]
    fn projection_round_trips_through_ndc() {
        for camera in cameras() {
            let focal = camera.focal_scale();
            let aspect = camera.viewport.aspect_ratio(SURFACE);

            for world in world_points() {
                let local = camera.to_local(&world);
                if local.z <= 0.0 {
                    continue;
                }

                let point = world_to_screen(&world, &camera, SURFACE);
                let [ndc_x, ndc_y] = screen_to_ndc([point.x, point.y], SURFACE);

                let expected_x = local.x / local.z * focal / aspect;
                let expected_y = local.y / local.z * focal;
                assert!((ndc_x - expected_x).abs() < 1e-4, "{} != {}", ndc_x, expected_x);
                assert!((ndc_y - expected_y).abs() < 1e-4, "{} != {}", ndc_y, expected_y);
                assert!((point.depth - local.z).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn points_behind_the_camera_are_not_visible() {
        for camera in cameras() {
            for world in world_points() {
                let local = camera.to_local(&world);
                let point = world_to_screen(&world, &camera, SURFACE);
                assert_eq!(point.is_visible(), local.z > 0.0);
            }

            let behind = camera.position - camera.forward() * 5.0;
            assert!(!world_to_screen(&behind, &camera, SURFACE).is_visible());
        }
    }

    #[test]
    fn point_on_the_view_plane_is_not_visible() {
        let camera = CameraState::new(Vector3::zeros(), UnitQuaternion::identity(), 60.0);
        let point = world_to_screen(&Vector3::new(1.0, 1.0, 0.0), &camera, SURFACE);
        assert!(!point.is_visible());

        let origin = world_to_screen(&Vector3::zeros(), &camera, SURFACE);
        assert!(!origin.is_visible());
    }

    #[test]
    fn non_finite_depth_is_not_visible() {
        let point = ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: f32::NAN,
        };
        assert!(!point.is_visible());

        let point = ScreenPoint {
            depth: f32::INFINITY,
            ..point
        };
        assert!(!point.is_visible());
    }

    #[test]
    fn center_of_view_maps_to_surface_center() {
        let camera = CameraState::new(Vector3::zeros(), UnitQuaternion::identity(), 60.0);
        let point = world_to_screen(&Vector3::new(0.0, 0.0, 10.0), &camera, SURFACE);
        assert!((point.x - 960.0).abs() < 1e-3);
        assert!((point.y - 540.0).abs() < 1e-3);
        assert_eq!(to_display(&point, SURFACE), [point.x, 1080.0 - point.y]);
    }

    #[test]
    fn screen_ray_passes_through_projected_point() {
        for camera in cameras() {
            for world in world_points() {
                let point = world_to_screen(&world, &camera, SURFACE);
                if !point.is_visible() {
                    continue;
                }

                let ray = screen_ray(&camera, SURFACE, to_display(&point, SURFACE)).unwrap();
                let to_point = (world - ray.origin).normalize();
                assert!(
                    ray.direction.dot(&to_point) > 0.9999,
                    "ray misses {:?}",
                    world
                );
            }
        }
    }
}
