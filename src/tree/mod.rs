pub(crate) mod drop;
pub(crate) mod edit;

use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Key of the tree root node.
pub(crate) const ROOT_KEY: &str = "$";

/// Opaque node identity. Stable across rename/move; never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(u64);

impl NodeId {
    /// Inverse of `Display`, for ids carried through the DOM (drag dataTransfer).
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u64>().ok().map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonic id source. Every `value_to_tree` call allocates
/// fresh ids, so ids are unique across all trees built in this session.
fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum NodeKind {
    Object,
    Array,
    Primitive,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Primitive => "value",
        }
    }
}

/// Node payload. A node is exactly one of these, so "value XOR children,
/// consistent with kind" holds by construction.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NodeContent {
    Object(Vec<TreeNode>),
    Array(Vec<TreeNode>),
    /// Always a non-container value (null/bool/number/string).
    Primitive(Value),
}

/// One position in the structural view of a JSON document.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TreeNode {
    pub id: NodeId,
    /// Label under the parent: object key, stringified array index, or `"$"`.
    pub key: String,
    pub content: NodeContent,
}

impl TreeNode {
    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Object(_) => NodeKind::Object,
            NodeContent::Array(_) => NodeKind::Array,
            NodeContent::Primitive(_) => NodeKind::Primitive,
        }
    }

    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.content {
            NodeContent::Object(kids) | NodeContent::Array(kids) => Some(kids),
            NodeContent::Primitive(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<TreeNode>> {
        match &mut self.content {
            NodeContent::Object(kids) | NodeContent::Array(kids) => Some(kids),
            NodeContent::Primitive(_) => None,
        }
    }

    pub fn can_accept_children(&self) -> bool {
        matches!(self.content, NodeContent::Object(_) | NodeContent::Array(_))
    }

    /// Total node count, this node included. Shown in the tree panel header.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|kids| kids.iter().map(TreeNode::node_count).sum())
            .unwrap_or(0)
    }
}

/// Build a tree from a JSON value. Array children get keys `"0".."n-1"`,
/// object children keep their keys in the object's iteration order.
pub(crate) fn value_to_tree(value: &Value, key: impl Into<String>) -> TreeNode {
    let key = key.into();
    let content = match value {
        Value::Array(items) => NodeContent::Array(
            items
                .iter()
                .enumerate()
                .map(|(idx, child)| value_to_tree(child, idx.to_string()))
                .collect(),
        ),
        Value::Object(map) => NodeContent::Object(
            map.iter()
                .map(|(k, child)| value_to_tree(child, k.clone()))
                .collect(),
        ),
        other => NodeContent::Primitive(other.clone()),
    };

    TreeNode {
        id: next_node_id(),
        key,
        content,
    }
}

/// Inverse of `value_to_tree`. Array child keys are ignored (order decides);
/// object entries are inserted in child list order.
pub(crate) fn tree_to_value(node: &TreeNode) -> Value {
    match &node.content {
        NodeContent::Primitive(v) => v.clone(),
        NodeContent::Array(kids) => Value::Array(kids.iter().map(tree_to_value).collect()),
        NodeContent::Object(kids) => {
            let mut map = serde_json::Map::new();
            for child in kids {
                map.insert(child.key.clone(), tree_to_value(child));
            }
            Value::Object(map)
        }
    }
}

#[cfg(test)]
pub(crate) fn collect_ids(node: &TreeNode, out: &mut Vec<NodeId>) {
    out.push(node.id);
    if let Some(kids) = node.children() {
        for child in kids {
            collect_ids(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_a_structure() {
        // {"a":1,"b":[2,3]} -> root(object) with "a" primitive and "b" array("0","1").
        let v = json!({"a": 1, "b": [2, 3]});
        let root = value_to_tree(&v, ROOT_KEY);

        assert_eq!(root.key, "$");
        assert_eq!(root.kind(), NodeKind::Object);

        let kids = root.children().expect("root has children");
        assert_eq!(kids.len(), 2);

        assert_eq!(kids[0].key, "a");
        assert_eq!(kids[0].content, NodeContent::Primitive(json!(1)));

        assert_eq!(kids[1].key, "b");
        assert_eq!(kids[1].kind(), NodeKind::Array);
        let b_kids = kids[1].children().expect("array has children");
        assert_eq!(b_kids[0].key, "0");
        assert_eq!(b_kids[0].content, NodeContent::Primitive(json!(2)));
        assert_eq!(b_kids[1].key, "1");
        assert_eq!(b_kids[1].content, NodeContent::Primitive(json!(3)));
    }

    #[test]
    fn test_round_trip_nested() {
        let v = json!({
            "cars": {"1": {"models": ["Evo VIII", "Evo IX"]}, "2": {"models": ["Evo X"]}},
            "meta": {"source": "demo", "count": 2}
        });
        assert_eq!(tree_to_value(&value_to_tree(&v, ROOT_KEY)), v);
    }

    #[test]
    fn test_round_trip_preserves_object_key_order() {
        let v: Value = serde_json::from_str(r#"{"z": 1, "m": 2, "a": 3}"#).unwrap();
        let back = tree_to_value(&value_to_tree(&v, ROOT_KEY));
        let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "m", "a"]);
    }

    #[test]
    fn test_round_trip_scalar_and_empty_containers() {
        for v in [json!(null), json!(true), json!("x"), json!([]), json!({})] {
            assert_eq!(tree_to_value(&value_to_tree(&v, ROOT_KEY)), v);
        }
    }

    #[test]
    fn test_fresh_ids_per_build() {
        let v = json!({"a": [1, 2]});
        let first = value_to_tree(&v, ROOT_KEY);
        let second = value_to_tree(&v, ROOT_KEY);

        let mut ids = Vec::new();
        collect_ids(&first, &mut ids);
        collect_ids(&second, &mut ids);

        let unique: std::collections::HashSet<NodeId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "ids must be pairwise distinct");
    }

    #[test]
    fn test_node_id_display_parse_round_trip() {
        let node = value_to_tree(&json!(1), ROOT_KEY);
        assert_eq!(NodeId::parse(&node.id.to_string()), Some(node.id));
        assert_eq!(NodeId::parse("not-an-id"), None);
    }

    #[test]
    fn test_node_count() {
        let root = value_to_tree(&json!({"a": 1, "b": [2, 3]}), ROOT_KEY);
        assert_eq!(root.node_count(), 5);
    }
}
