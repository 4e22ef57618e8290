use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u64);

/// Named node of a target hierarchy.
/// `position` is relative to the parent node, the root position is in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformNode {
    pub id: NodeId,
    pub name: String,
    pub position: Vector3<f32>,
    pub children: Vec<TransformNode>,
}

impl TransformNode {
    pub fn new(id: NodeId, name: impl Into<String>, position: Vector3<f32>) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TransformNode) -> Self {
        self.children.push(child);
        self
    }

    /// Pre-order depth first walk over all nodes below (not including) this node.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id == id || self.descendants().any(|node| node.id == id)
    }

    /// World positions of this node and every descendant, in pre-order.
    pub fn world_positions(&self, parent_world: Vector3<f32>) -> Vec<(&TransformNode, Vector3<f32>)> {
        let mut result = Vec::new();
        let mut stack = vec![(self, parent_world)];
        while let Some((node, parent)) = stack.pop() {
            let world = parent + node.position;
            result.push((node, world));
            for child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
        result
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a TransformNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TransformNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Depth first search for the first descendant of `root` named exactly `name`.
pub fn find_child_transform<'a>(root: &'a TransformNode, name: &str) -> Option<&'a TransformNode> {
    root.descendants().find(|node| node.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, name: &str) -> TransformNode {
        TransformNode::new(NodeId(id), name, Vector3::zeros())
    }

    /// `root:[A:[B:[C], D]]`
    fn sample_tree() -> TransformNode {
        node(0, "root").with_child(
            node(1, "A")
                .with_child(node(2, "B").with_child(node(3, "C")))
                .with_child(node(4, "D")),
        )
    }

    #[test]
    fn finds_nested_child() {
        let tree = sample_tree();
        let found = find_child_transform(&tree, "C").map(|node| node.id);
        assert_eq!(found, Some(NodeId(3)));
    }

    #[test]
    fn missing_child_is_not_found() {
        let tree = sample_tree();
        assert!(find_child_transform(&tree, "Z").is_none());
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let tree = sample_tree();
        assert!(find_child_transform(&tree, "c").is_none());
    }

    #[test]
    fn visits_depth_first() {
        let tree = sample_tree();
        let order = tree
            .descendants()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["A", "B", "C", "D"]);
    }

    #[test]
    fn first_match_in_depth_first_order_wins() {
        let tree = node(0, "root")
            .with_child(node(1, "A").with_child(node(2, "Head")))
            .with_child(node(3, "Head"));

        let found = find_child_transform(&tree, "Head").map(|node| node.id);
        assert_eq!(found, Some(NodeId(2)));
    }

    #[test]
    fn world_positions_accumulate_offsets() {
        let tree = TransformNode::new(NodeId(0), "root", Vector3::new(1.0, 0.0, 0.0)).with_child(
            TransformNode::new(NodeId(1), "Torso", Vector3::new(0.0, 1.0, 0.0)).with_child(
                TransformNode::new(NodeId(2), "Head", Vector3::new(0.0, 0.5, 0.0)),
            ),
        );

        let positions = tree.world_positions(Vector3::zeros());
        let (head, head_world) = positions[2];
        assert_eq!(head.name, "Head");
        assert_eq!(head_world, Vector3::new(1.0, 1.5, 0.0));
        assert!(tree.contains(NodeId(2)));
        assert!(!tree.contains(NodeId(7)));
    }
}
