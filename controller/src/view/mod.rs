use scene::{
    CameraState,
    Ray,
    StateCamera,
};
use utils_state::{
    State,
    StateCacheType,
    StateRegistry,
};

mod projection;
pub use projection::*;

/// Screen bounds and camera snapshot used to map world positions onto the overlay.
pub struct ViewController {
    pub screen_bounds: mint::Vector2<f32>,
    camera: Option<CameraState>,
}

impl State for ViewController {
    type Parameter = ();

    fn create(states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
        let camera = states.resolve::<StateCamera>(())?;
        Ok(Self {
            screen_bounds: mint::Vector2 { x: 0.0, y: 0.0 },
            camera: camera.camera,
        })
    }

    fn cache_type() -> StateCacheType {
        StateCacheType::Persistent
    }

    fn update(&mut self, states: &StateRegistry) -> anyhow::Result<()> {
        let camera = states.resolve::<StateCamera>(())?;
        self.camera = camera.camera;
        Ok(())
    }
}

impl ViewController {
    pub fn update_screen_bounds(&mut self, bounds: mint::Vector2<f32>) {
        self.screen_bounds = bounds;
    }

    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    fn surface(&self) -> [f32; 2] {
        [self.screen_bounds.x, self.screen_bounds.y]
    }

    /// Projects a world position. Returns `None` without a camera or when the
    /// point lies behind the camera.
    pub fn world_to_screen(&self, world: &nalgebra::Vector3<f32>) -> Option<ScreenPoint> {
        let camera = self.camera.as_ref()?;
        let point = projection::world_to_screen(world, camera, self.surface());
        point.is_visible().then_some(point)
    }

    pub fn to_display(&self, point: &ScreenPoint) -> [f32; 2] {
        projection::to_display(point, self.surface())
    }

    pub fn screen_ray(&self, display: [f32; 2]) -> Option<Ray> {
        let camera = self.camera.as_ref()?;
        projection::screen_ray(camera, self.surface(), display)
    }
}
