use std::sync::Arc;

use scene::{
    find_child_transform,
    Ray,
    SceneProvider,
    Target,
};

/// Target part hit by the crosshair ray.
pub struct CrosshairHit {
    pub target: Arc<dyn Target>,
    pub part: String,
    pub distance: f32,
}

/// Resolve the target owning the nearest surface hit by `ray`.
///
/// Hits on the local player's own hierarchy never resolve to a target.
pub fn resolve_crosshair_target(
    scene: &dyn SceneProvider,
    candidates: &[Arc<dyn Target>],
    local_player: Option<&dyn Target>,
    ray: &Ray,
) -> Option<CrosshairHit> {
    let hit = scene.raycast(ray)?;

    if let Some(local_player) = local_player {
        match local_player.hierarchy() {
            Ok(hierarchy) if hierarchy.contains(hit.node) => return None,
            Ok(_) => {}
            Err(error) => log::trace!("Local player hierarchy unavailable: {:#}", error),
        }
    }

    let local_id = local_player.map(|player| player.id());
    candidates
        .iter()
        .filter(|target| Some(target.id()) != local_id)
        .find(|target| {
            let Ok(hierarchy) = target.hierarchy() else {
                return false;
            };

            find_child_transform(hierarchy, &hit.part_name).is_some()
                && hierarchy.contains(hit.node)
        })
        .map(|target| CrosshairHit {
            target: target.clone(),
            part: hit.part_name.clone(),
            distance: hit.distance,
        })
}

pub fn is_target_under_crosshair(
    scene: &dyn SceneProvider,
    candidates: &[Arc<dyn Target>],
    local_player: Option<&dyn Target>,
    ray: &Ray,
    valid_part_names: &[String],
) -> bool {
    let Some(hit) = resolve_crosshair_target(scene, candidates, local_player, ray) else {
        return false;
    };

    log::trace!(
        "Crosshair on target {} part {} at {:.2}m",
        hit.target.id().0,
        hit.part,
        hit.distance
    );
    valid_part_names.iter().any(|name| *name == hit.part)
}
