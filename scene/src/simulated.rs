use std::{
    cell::{
        Cell,
        RefCell,
    },
    collections::HashMap,
    sync::Arc,
};

use anyhow::anyhow;
use nalgebra::Vector3;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    CameraState,
    NodeId,
    Ray,
    RaycastHit,
    SceneProvider,
    Target,
    TargetId,
    TransformNode,
    Viewport,
};

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    60.0
}

fn default_viewport() -> [f32; 2] {
    [1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CameraDescription {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
}

impl CameraDescription {
    pub fn to_camera(&self) -> CameraState {
        CameraState::looking_at(
            Vector3::from(self.position),
            Vector3::from(self.look_at),
            Vector3::from(self.up),
            self.fov,
        )
        .with_viewport(Viewport {
            width: self.viewport[0],
            height: self.viewport[1],
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PartDescription {
    pub name: String,
    #[serde(default)]
    pub offset: [f32; 3],
    /// Parts without a radius can not be hit by ray casts.
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub children: Vec<PartDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TargetDescription {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub velocity: [f32; 3],
    #[serde(default)]
    pub destroyed: bool,
    #[serde(default)]
    pub parts: Vec<PartDescription>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: Option<CameraDescription>,
    pub local_player: TargetDescription,
    #[serde(default)]
    pub targets: Vec<TargetDescription>,
}

#[derive(Debug, Clone)]
pub struct SimulatedTarget {
    id: TargetId,
    name: String,
    root: TransformNode,
    velocity: Vector3<f32>,
    part_radius: HashMap<NodeId, f32>,
    destroyed: bool,
}

impl SimulatedTarget {
    /// The root node position is the pivot in world space.
    pub fn new(id: TargetId, name: impl Into<String>, root: TransformNode) -> Self {
        Self {
            id,
            name: name.into(),
            root,
            velocity: Vector3::zeros(),
            part_radius: Default::default(),
            destroyed: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_part_radius(mut self, node: NodeId, radius: f32) -> Self {
        self.part_radius.insert(node, radius);
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_alive(&self) -> anyhow::Result<()> {
        if self.destroyed {
            Err(anyhow!("target {} ({}) has been destroyed", self.id.0, self.name))
        } else {
            Ok(())
        }
    }

    fn advanced(&self, delta_seconds: f32) -> Self {
        let mut target = self.clone();
        target.root.position += self.velocity * delta_seconds;
        target
    }

    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        if self.destroyed {
            return None;
        }

        let mut nearest: Option<RaycastHit> = None;
        for (node, center) in self.root.world_positions(Vector3::zeros()) {
            let Some(radius) = self.part_radius.get(&node.id) else {
                continue;
            };
            let Some(distance) = intersect_sphere(ray, &center, *radius) else {
                continue;
            };

            if nearest.as_ref().map_or(true, |hit| distance < hit.distance) {
                nearest = Some(RaycastHit {
                    node: node.id,
                    part_name: node.name.clone(),
                    distance,
                    point: ray.point_at(distance),
                });
            }
        }
        nearest
    }
}

impl Target for SimulatedTarget {
    fn id(&self) -> TargetId {
        self.id
    }

    fn display_name(&self) -> anyhow::Result<String> {
        self.ensure_alive()?;
        Ok(self.name.clone())
    }

    fn pivot_position(&self) -> anyhow::Result<Vector3<f32>> {
        self.ensure_alive()?;
        Ok(self.root.position)
    }

    fn hierarchy(&self) -> anyhow::Result<&TransformNode> {
        self.ensure_alive()?;
        Ok(&self.root)
    }
}

fn intersect_sphere(ray: &Ray, center: &Vector3<f32>, radius: f32) -> Option<f32> {
    let offset = ray.origin - center;
    let b = ray.direction.dot(&offset);
    let c = offset.norm_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }

    /* ray origin inside the sphere */
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

struct NodeIdAllocator(u64);

impl NodeIdAllocator {
    fn next(&mut self) -> NodeId {
        self.0 += 1;
        NodeId(self.0)
    }
}

/// In-memory scene used for headless runs and tests.
pub struct SimulatedScene {
    camera: Cell<Option<CameraState>>,
    local_player: RefCell<Arc<SimulatedTarget>>,
    targets: RefCell<Vec<Arc<SimulatedTarget>>>,
}

impl SimulatedScene {
    pub fn new(camera: Option<CameraState>, local_player: SimulatedTarget) -> Self {
        Self {
            camera: Cell::new(camera),
            local_player: RefCell::new(Arc::new(local_player)),
            targets: Default::default(),
        }
    }

    pub fn from_description(description: &SceneDescription) -> Self {
        let mut node_ids = NodeIdAllocator(0);
        let local_player = Self::build_target(TargetId(0), &description.local_player, &mut node_ids);
        let scene = Self::new(
            description.camera.as_ref().map(CameraDescription::to_camera),
            local_player,
        );

        for (index, target) in description.targets.iter().enumerate() {
            let target = Self::build_target(TargetId(index as u64 + 1), target, &mut node_ids);
            scene.add_target(target);
        }

        log::debug!(
            "Created simulated scene with {} targets",
            description.targets.len()
        );
        scene
    }

    fn build_target(
        id: TargetId,
        description: &TargetDescription,
        node_ids: &mut NodeIdAllocator,
    ) -> SimulatedTarget {
        fn build_part(
            part: &PartDescription,
            node_ids: &mut NodeIdAllocator,
            radius: &mut HashMap<NodeId, f32>,
        ) -> TransformNode {
            let mut node = TransformNode::new(node_ids.next(), &part.name, Vector3::from(part.offset));
            if let Some(value) = part.radius {
                radius.insert(node.id, value);
            }
            node.children = part
                .children
                .iter()
                .map(|child| build_part(child, node_ids, radius))
                .collect();
            node
        }

        let mut part_radius = HashMap::new();
        let mut root = TransformNode::new(
            node_ids.next(),
            &description.name,
            Vector3::from(description.position),
        );
        root.children = description
            .parts
            .iter()
            .map(|part| build_part(part, node_ids, &mut part_radius))
            .collect();

        SimulatedTarget {
            id,
            name: description.name.clone(),
            root,
            velocity: Vector3::from(description.velocity),
            part_radius,
            destroyed: description.destroyed,
        }
    }

    pub fn add_target(&self, target: SimulatedTarget) {
        self.targets.borrow_mut().push(Arc::new(target));
    }

    pub fn set_camera(&self, camera: Option<CameraState>) {
        self.camera.set(camera);
    }

    pub fn set_destroyed(&self, target: TargetId, destroyed: bool) {
        let mut targets = self.targets.borrow_mut();
        for entry in targets.iter_mut().filter(|entry| entry.id == target) {
            let mut updated = (**entry).clone();
            updated.destroyed = destroyed;
            *entry = Arc::new(updated);
        }
    }

    /// Move every target (and the local player) along its velocity.
    pub fn advance(&self, delta_seconds: f32) {
        let mut targets = self.targets.borrow_mut();
        for target in targets.iter_mut() {
            *target = Arc::new(target.advanced(delta_seconds));
        }

        let mut local_player = self.local_player.borrow_mut();
        *local_player = Arc::new(local_player.advanced(delta_seconds));
    }
}

impl SceneProvider for SimulatedScene {
    fn camera(&self) -> Option<CameraState> {
        self.camera.get()
    }

    fn local_player(&self) -> Option<Arc<dyn Target>> {
        let player: Arc<dyn Target> = self.local_player.borrow().clone();
        Some(player)
    }

    fn targets(&self) -> Vec<Arc<dyn Target>> {
        self.targets
            .borrow()
            .iter()
            .map(|target| target.clone() as Arc<dyn Target>)
            .collect()
    }

    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        let local_player = self.local_player.borrow().clone();
        let targets = self.targets.borrow();

        std::iter::once(&local_player)
            .chain(targets.iter())
            .filter_map(|target| target.raycast(ray))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
