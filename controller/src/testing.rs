use std::rc::Rc;

use nalgebra::Vector3;
use scene::{
    CameraState,
    SceneDescription,
    SceneProvider,
    SimulatedScene,
    StateSceneHandle,
};
use utils_state::StateRegistry;

use crate::{
    settings::AppSettings,
    view::{
        self,
        ViewController,
    },
};

pub const SURFACE: [f32; 2] = [1920.0, 1080.0];

/// Camera at the origin looking down +z.
/// The local player's "Head" sits directly in front of the camera.
const SCENE: &str = r#"
camera:
  position: [0, 0, 0]
  look_at: [0, 0, 10]
local_player:
  name: local
  position: [2, 2, 0]
  parts:
    - name: Head
      offset: [-2, -2, 1]
      radius: 0.2
targets:
  - name: alpha
    position: [2, 2, 10]
    velocity: [0, 0, 2]
    parts:
      - name: Torso
        offset: [0, 1, 0]
        radius: 0.5
        children:
          - name: Head
            offset: [0, 0.8, 0]
            radius: 0.25
      - name: Weapon
        offset: [1, 1, 0]
        radius: 0.2
  - name: bravo
    position: [7, 2, 20]
    parts:
      - name: Torso
        offset: [0, 1, 0]
        radius: 0.5
  - name: charlie
    position: [0, 2, -10]
"#;

pub fn test_scene() -> Rc<SimulatedScene> {
    let description: SceneDescription = serde_yaml::from_str(SCENE).unwrap();
    Rc::new(SimulatedScene::from_description(&description))
}

pub fn scene_states<P: SceneProvider + 'static>(
    scene: Rc<P>,
    settings: AppSettings,
) -> StateRegistry {
    let mut states = StateRegistry::new(64);
    states.set(StateSceneHandle::new(scene), ()).unwrap();
    states.set(settings, ()).unwrap();
    begin_frame(&mut states);
    states
}

pub fn begin_frame(states: &mut StateRegistry) {
    states.invalidate_states();
    states
        .resolve_mut::<ViewController>(())
        .unwrap()
        .update_screen_bounds(mint::Vector2::from(SURFACE));
}

/// Display position of a world point.
pub fn pointer_at(camera: &CameraState, world: &Vector3<f32>) -> [f32; 2] {
    let point = view::world_to_screen(world, camera, SURFACE);
    assert!(point.is_visible());
    view::to_display(&point, SURFACE)
}
