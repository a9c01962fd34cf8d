//! Structural edits. Every operation clones the tree and mutates the clone;
//! the published tree a caller holds is never touched. Invalid preconditions
//! (unknown id, root move, array-key rename, cycle) come back as an unchanged
//! copy of the input.

use super::{NodeContent, NodeId, NodeKind, TreeNode};
use std::collections::HashSet;

/// Depth-first search by identity.
pub(crate) fn find_node(root: &TreeNode, id: NodeId) -> Option<&TreeNode> {
    if root.id == id {
        return Some(root);
    }
    let kids = root.children()?;
    for child in kids {
        if let Some(found) = find_node(child, id) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut(root: &mut TreeNode, id: NodeId) -> Option<&mut TreeNode> {
    if root.id == id {
        return Some(root);
    }
    let kids = root.children_mut()?;
    for child in kids {
        if let Some(found) = find_node_mut(child, id) {
            return Some(found);
        }
    }
    None
}

/// Parent of `id` plus the child's position. `None` for the root or an
/// unknown id. Parents are recomputed, not stored, so the tree stays a pure
/// ownership hierarchy (no back-references to keep consistent).
pub(crate) fn find_parent(root: &TreeNode, id: NodeId) -> Option<(&TreeNode, usize)> {
    let kids = root.children()?;
    if let Some(idx) = kids.iter().position(|c| c.id == id) {
        return Some((root, idx));
    }
    for child in kids {
        if let Some(found) = find_parent(child, id) {
            return Some(found);
        }
    }
    None
}

/// Detach the subtree rooted at `id` from wherever it hangs. Never matches
/// the root itself (the root has no parent to detach from).
fn remove_subtree(root: &mut TreeNode, id: NodeId) -> Option<TreeNode> {
    let kids = root.children_mut()?;
    if let Some(idx) = kids.iter().position(|c| c.id == id) {
        return Some(kids.remove(idx));
    }
    for child in kids {
        if let Some(found) = remove_subtree(child, id) {
            return Some(found);
        }
    }
    None
}

/// Pick a key that does not collide with `parent`'s existing children.
///
/// Array parents return `desired` untouched (renormalization overwrites the
/// key anyway). Object parents probe `desired_2`, `desired_3`, … until free.
/// `exclude` drops one child from the collision set (the node being renamed),
/// so renaming a key to itself is the identity.
pub(crate) fn sanitize_key(parent: &TreeNode, desired: &str, exclude: Option<NodeId>) -> String {
    if parent.kind() != NodeKind::Object {
        return desired.to_string();
    }
    let Some(kids) = parent.children() else {
        return desired.to_string();
    };

    let taken: HashSet<&str> = kids
        .iter()
        .filter(|c| Some(c.id) != exclude)
        .map(|c| c.key.as_str())
        .collect();

    if !taken.contains(desired) {
        return desired.to_string();
    }

    let mut n: u32 = 2;
    loop {
        let candidate = format!("{desired}_{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// Rename the key of `id`. No-op when the new key is empty, `id` is the root,
/// or the parent is an array (array keys are positional).
pub(crate) fn rename_key(root: &TreeNode, id: NodeId, new_key: &str) -> TreeNode {
    let mut next = root.clone();

    if new_key.is_empty() || id == next.id {
        return next;
    }

    let Some((parent, _)) = find_parent(&next, id) else {
        return next;
    };
    if parent.kind() == NodeKind::Array {
        return next;
    }

    let final_key = sanitize_key(parent, new_key, Some(id));
    if let Some(node) = find_node_mut(&mut next, id) {
        node.key = final_key;
    }
    next
}

/// Move the subtree at `id` under `target_parent_id`, immediately before
/// `before` (append when `before` is absent or not a current child there).
///
/// Rejected as a no-op when `id` is the root, the target is missing or a
/// primitive, or the target is `id` itself / a descendant of `id`. On object
/// destinations the moved key is re-sanitized against the new siblings.
/// Array index keys across the whole tree are renormalized afterwards.
pub(crate) fn reparent(
    root: &TreeNode,
    id: NodeId,
    target_parent_id: NodeId,
    before: Option<NodeId>,
) -> TreeNode {
    let mut next = root.clone();

    if id == next.id {
        return next;
    }

    let Some(target) = find_node(&next, target_parent_id) else {
        return next;
    };
    if !target.can_accept_children() {
        return next;
    }

    // Cycle guard: the target must not sit inside the subtree being moved
    // (searching the moved subtree also catches target == id).
    let Some(moved) = find_node(&next, id) else {
        return next;
    };
    if find_node(moved, target_parent_id).is_some() {
        return next;
    }

    let Some(mut node) = remove_subtree(&mut next, id) else {
        return next;
    };

    // The guard above keeps the target outside the removed subtree, so it is
    // still reachable here.
    let Some(target) = find_node_mut(&mut next, target_parent_id) else {
        return root.clone();
    };

    if target.kind() == NodeKind::Object {
        node.key = sanitize_key(target, &node.key, None);
    }

    if let Some(kids) = target.children_mut() {
        let idx = before
            .and_then(|b| kids.iter().position(|c| c.id == b))
            .unwrap_or(kids.len());
        kids.insert(idx, node);
    }

    renormalize_arrays(&mut next);
    next
}

/// Rewrite every array node's child keys to their list positions. Recurses
/// through all nodes; object keys are left exactly as set.
pub(crate) fn renormalize_arrays(node: &mut TreeNode) {
    let is_array = matches!(node.content, NodeContent::Array(_));
    if let Some(kids) = node.children_mut() {
        for (idx, child) in kids.iter_mut().enumerate() {
            if is_array {
                child.key = idx.to_string();
            }
            renormalize_arrays(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{collect_ids, tree_to_value, value_to_tree, ROOT_KEY};
    use serde_json::json;

    fn child_id(root: &TreeNode, key: &str) -> NodeId {
        root.children()
            .unwrap()
            .iter()
            .find(|c| c.key == key)
            .unwrap_or_else(|| panic!("no child {key}"))
            .id
    }

    fn assert_invariants(node: &TreeNode) {
        let mut ids = Vec::new();
        collect_ids(node, &mut ids);
        let unique: HashSet<NodeId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "ids must stay pairwise distinct");
        assert_container_keys(node);
    }

    fn assert_container_keys(node: &TreeNode) {
        match &node.content {
            NodeContent::Array(kids) => {
                for (idx, child) in kids.iter().enumerate() {
                    assert_eq!(child.key, idx.to_string(), "array keys must be contiguous");
                    assert_container_keys(child);
                }
            }
            NodeContent::Object(kids) => {
                let keys: HashSet<&str> = kids.iter().map(|c| c.key.as_str()).collect();
                assert_eq!(keys.len(), kids.len(), "object keys must be unique");
                for child in kids {
                    assert_container_keys(child);
                }
            }
            NodeContent::Primitive(_) => {}
        }
    }

    #[test]
    fn test_find_node_and_parent() {
        let root = value_to_tree(&json!({"a": {"b": [1]}}), ROOT_KEY);
        let a = child_id(&root, "a");
        let b = child_id(root.children().unwrap().iter().find(|c| c.key == "a").unwrap(), "b");

        assert_eq!(find_node(&root, b).unwrap().key, "b");
        let (parent, idx) = find_parent(&root, b).unwrap();
        assert_eq!(parent.id, a);
        assert_eq!(idx, 0);

        // Root has no parent; unknown ids are not found.
        assert!(find_parent(&root, root.id).is_none());
        assert!(find_node(&root, NodeId::parse("999999999").unwrap()).is_none());
    }

    #[test]
    fn test_sanitize_key_probes_suffixes() {
        // Scenario C: sibling "b" exists -> "b_2"; "b" and "b_2" -> "b_3".
        let root = value_to_tree(&json!({"a": 1, "b": 2}), ROOT_KEY);
        assert_eq!(sanitize_key(&root, "b", None), "b_2");
        assert_eq!(sanitize_key(&root, "c", None), "c");

        let root = value_to_tree(&json!({"b": 1, "b_2": 2}), ROOT_KEY);
        assert_eq!(sanitize_key(&root, "b", None), "b_3");
    }

    #[test]
    fn test_sanitize_key_array_parent_passthrough() {
        let root = value_to_tree(&json!([1, 2]), ROOT_KEY);
        assert_eq!(sanitize_key(&root, "0", None), "0");
    }

    #[test]
    fn test_rename_key_collision() {
        let root = value_to_tree(&json!({"a": 1, "b": 2}), ROOT_KEY);
        let a = child_id(&root, "a");

        let next = rename_key(&root, a, "b");
        assert_eq!(tree_to_value(&next), json!({"b_2": 1, "b": 2}));
        assert_invariants(&next);

        // Input tree untouched.
        assert_eq!(tree_to_value(&root), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_rename_key_to_own_key_is_identity() {
        // The node's own key is excluded from the collision set.
        let root = value_to_tree(&json!({"a": 1, "b": 2}), ROOT_KEY);
        let a = child_id(&root, "a");
        let next = rename_key(&root, a, "a");
        assert_eq!(tree_to_value(&next), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_rename_key_no_ops() {
        let root = value_to_tree(&json!({"a": 1, "b": [2]}), ROOT_KEY);
        let a = child_id(&root, "a");
        let b = child_id(&root, "b");
        let b0 = find_node(&root, b).unwrap().children().unwrap()[0].id;

        // Empty key, root rename, array-parent rename: all unchanged.
        assert_eq!(rename_key(&root, a, ""), root);
        assert_eq!(rename_key(&root, root.id, "x"), root);
        assert_eq!(rename_key(&root, b0, "x"), root);
    }

    #[test]
    fn test_scenario_b_move_into_array_head() {
        let root = value_to_tree(&json!({"a": 1, "b": [2, 3]}), ROOT_KEY);
        let a = child_id(&root, "a");
        let b = child_id(&root, "b");
        let b0 = find_node(&root, b).unwrap().children().unwrap()[0].id;

        let next = reparent(&root, a, b, Some(b0));
        assert_eq!(tree_to_value(&next), json!({"b": [1, 2, 3]}));

        let b_node = find_node(&next, b).unwrap();
        let keys: Vec<&str> = b_node
            .children()
            .unwrap()
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, ["0", "1", "2"]);
        assert_invariants(&next);

        // Input tree untouched.
        assert_eq!(tree_to_value(&root), json!({"a": 1, "b": [2, 3]}));
    }

    #[test]
    fn test_reparent_appends_when_before_missing() {
        let root = value_to_tree(&json!({"a": 1, "b": [2, 3]}), ROOT_KEY);
        let a = child_id(&root, "a");
        let b = child_id(&root, "b");

        let next = reparent(&root, a, b, None);
        assert_eq!(tree_to_value(&next), json!({"b": [2, 3, 1]}));

        // A before-id that is not a child of the target also appends.
        let next = reparent(&root, a, b, Some(a));
        assert_eq!(tree_to_value(&next), json!({"b": [2, 3, 1]}));
    }

    #[test]
    fn test_reparent_object_destination_sanitizes_key() {
        let root = value_to_tree(&json!({"a": 1, "inner": {"a": 2}}), ROOT_KEY);
        let a = child_id(&root, "a");
        let inner = child_id(&root, "inner");

        let next = reparent(&root, a, inner, None);
        assert_eq!(tree_to_value(&next), json!({"inner": {"a": 2, "a_2": 1}}));
        assert_invariants(&next);
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let root = value_to_tree(&json!({"a": {"b": {"c": 1}}}), ROOT_KEY);
        let a = child_id(&root, "a");
        let b = find_node(&root, a).unwrap().children().unwrap()[0].id;

        // Into itself and into a descendant: both rejected.
        assert_eq!(reparent(&root, a, a, None), root);
        assert_eq!(reparent(&root, a, b, None), root);
    }

    #[test]
    fn test_reparent_rejects_bad_targets() {
        let root = value_to_tree(&json!({"a": 1, "b": 2}), ROOT_KEY);
        let a = child_id(&root, "a");
        let b = child_id(&root, "b");

        // Primitive target, unknown target, root move: all unchanged.
        assert_eq!(reparent(&root, a, b, None), root);
        assert_eq!(reparent(&root, a, NodeId::parse("999999999").unwrap(), None), root);
        assert_eq!(reparent(&root, root.id, a, None), root);
    }

    #[test]
    fn test_reparent_within_same_array_reorders() {
        let root = value_to_tree(&json!([10, 20, 30]), ROOT_KEY);
        let kids = root.children().unwrap();
        let (first, third) = (kids[0].id, kids[2].id);

        // Move element 0 before element 2: [20, 10, 30].
        let next = reparent(&root, first, root.id, Some(third));
        assert_eq!(tree_to_value(&next), json!([20, 10, 30]));
        assert_invariants(&next);
    }

    #[test]
    fn test_renormalize_nested_arrays() {
        let mut root = value_to_tree(&json!([[1, 2], [3]]), ROOT_KEY);

        // Scramble keys, then renormalize the whole tree.
        if let Some(kids) = root.children_mut() {
            kids[0].key = "9".to_string();
            if let Some(inner) = kids[0].children_mut() {
                inner[1].key = "x".to_string();
            }
        }
        renormalize_arrays(&mut root);
        assert_container_keys(&root);
        assert_eq!(tree_to_value(&root), json!([[1, 2], [3]]));
    }

    #[test]
    fn test_edit_sequence_preserves_invariants() {
        let root = value_to_tree(
            &json!({"a": 1, "b": [2, 3], "c": {"d": 4}}),
            ROOT_KEY,
        );
        let a = child_id(&root, "a");
        let b = child_id(&root, "b");
        let c = child_id(&root, "c");

        let t1 = reparent(&root, a, b, None);
        let t2 = rename_key(&t1, c, "b");
        let d = find_node(&t2, c).unwrap().children().unwrap()[0].id;
        let t3 = reparent(&t2, d, t2.id, None);

        assert_invariants(&t3);
        assert_eq!(
            tree_to_value(&t3),
            json!({"b": [2, 3, 1], "b_2": {}, "d": 4})
        );
    }
}
