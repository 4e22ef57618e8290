use std::sync::Arc;

use utils_state::{
    State,
    StateCacheType,
    StateRegistry,
};

use crate::{
    StateSceneHandle,
    Target,
};

pub struct StateLocalPlayer {
    pub player: Option<Arc<dyn Target>>,
}

impl State for StateLocalPlayer {
    type Parameter = ();

    fn create(states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
        let scene = states.resolve::<StateSceneHandle>(())?;
        Ok(Self {
            player: scene.handle().local_player(),
        })
    }

    fn cache_type() -> StateCacheType {
        StateCacheType::Volatile
    }
}

/// Targets enumerated for the current frame.
pub struct StateTargetList {
    targets: Vec<Arc<dyn Target>>,
}

impl StateTargetList {
    pub fn targets(&self) -> &[Arc<dyn Target>] {
        &self.targets
    }
}

impl State for StateTargetList {
    type Parameter = ();

    fn create(states: &StateRegistry, _param: Self::Parameter) -> anyhow::Result<Self> {
        let scene = states.resolve::<StateSceneHandle>(())?;
        let targets = scene.handle().targets();
        log::trace!("Enumerated {} targets", targets.len());
        Ok(Self { targets })
    }

    fn cache_type() -> StateCacheType {
        StateCacheType::Volatile
    }
}
