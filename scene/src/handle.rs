use std::{
    rc::Rc,
    sync::Arc,
};

use nalgebra::{
    Unit,
    Vector3,
};
use utils_state::{
    State,
    StateCacheType,
};

use crate::{
    CameraState,
    NodeId,
    Target,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Returns `None` for a degenerate direction.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let direction = Unit::try_new(direction, 1e-6)?;
        Some(Self { origin, direction })
    }

    pub fn point_at(&self, distance: f32) -> Vector3<f32> {
        self.origin + self.direction.into_inner() * distance
    }
}

/// Nearest surface hit by a ray cast.
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastHit {
    pub node: NodeId,
    pub part_name: String,
    pub distance: f32,
    pub point: Vector3<f32>,
}

/// Access to the live scene. Implemented by the host engine integration.
pub trait SceneProvider {
    fn camera(&self) -> Option<CameraState>;

    fn local_player(&self) -> Option<Arc<dyn Target>>;

    /// Targets known this frame, in enumeration order.
    fn targets(&self) -> Vec<Arc<dyn Target>>;

    fn raycast(&self, ray: &Ray) -> Option<RaycastHit>;
}

pub struct StateSceneHandle {
    handle: Rc<dyn SceneProvider>,
}

impl StateSceneHandle {
    pub fn new(handle: Rc<dyn SceneProvider>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &dyn SceneProvider {
        &*self.handle
    }
}

impl State for StateSceneHandle {
    type Parameter = ();

    fn cache_type() -> StateCacheType {
        StateCacheType::Persistent
    }
}
