use utils_state::{
    State,
    StateCacheType,
    StateRegistry,
};

use crate::{
    CameraState,
    StateSceneHandle,
};

/// Camera snapshot of the current frame.
pub struct StateCamera {
    pub camera: Option<CameraState>,
}

impl State for StateCamera {
    type Parameter = ();

    fn create(states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
        let scene = states.resolve::<StateSceneHandle>(())?;
        Ok(Self {
            camera: scene.handle().camera(),
        })
    }

    fn cache_type() -> StateCacheType {
        StateCacheType::Volatile
    }
}
