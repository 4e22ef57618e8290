use nalgebra::Vector3;

use crate::TransformNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TargetId(pub u64);

/// Tracked scene object.
///
/// Targets are owned by the scene. Every accessor may fail once the
/// underlying object has been destroyed or its data is incomplete.
pub trait Target {
    fn id(&self) -> TargetId;

    fn display_name(&self) -> anyhow::Result<String>;

    /// Representative world position used to derive overlay anchors.
    fn pivot_position(&self) -> anyhow::Result<Vector3<f32>>;

    /// Root of the named sub-part hierarchy.
    fn hierarchy(&self) -> anyhow::Result<&TransformNode>;
}
