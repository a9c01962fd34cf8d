use crate::json::parse_json_text;
use crate::models::JsonFile;
use crate::storage::{
    load_active_file_id, load_files, save_active_file_id, save_files, SIDEBAR_COLLAPSED_KEY,
};
use crate::tree::drop::DragState;
use crate::tree::{value_to_tree, NodeId, TreeNode, ROOT_KEY};
use crate::util::{now_ms, uid};
use leptos::prelude::*;
use std::collections::HashSet;

/// Seed content for the first launch.
pub(crate) const DEFAULT_JSON: &str = r#"{
  "cars": {
    "1": {
      "models": ["Evo VIII", "Evo IX"]
    },
    "2": {
      "models": ["Evo X"]
    }
  },
  "meta": {
    "source": "demo",
    "count": 2
  }
}"#;

/// Expanded-set default: the root plus its first level, so a fresh tree is
/// readable without being overwhelming.
pub(crate) fn expand_first_level(root: &TreeNode) -> HashSet<NodeId> {
    let mut next = HashSet::new();
    next.insert(root.id);
    if let Some(kids) = root.children() {
        for child in kids {
            next.insert(child.id);
        }
    }
    next
}

fn empty_tree() -> TreeNode {
    value_to_tree(&serde_json::Value::Object(serde_json::Map::new()), ROOT_KEY)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub files: RwSignal<Vec<JsonFile>>,
    pub active_file_id: RwSignal<Option<String>>,

    /// Left editor: snapshot of the active file as it was opened (read only).
    pub original_text: RwSignal<String>,

    /// Right editor: the editable output text, persisted on every change.
    pub updated_text: RwSignal<String>,
    pub updated_error: RwSignal<Option<String>>,

    /// The published tree. Edits replace it wholesale; nothing mutates it in
    /// place, so render code can hold clones freely.
    pub tree_root: RwSignal<TreeNode>,
    pub expanded: RwSignal<HashSet<NodeId>>,

    /// Current drag gesture (middle panel).
    pub drag: RwSignal<DragState>,

    pub sidebar_collapsed: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let mut files = load_files();
        if files.is_empty() {
            files = vec![JsonFile {
                id: uid(),
                name: "demo.json".to_string(),
                json_text: DEFAULT_JSON.to_string(),
                updated_ms: now_ms(),
            }];
            save_files(&files);
        }

        let active_file_id = load_active_file_id()
            .filter(|id| files.iter().any(|f| &f.id == id))
            .or_else(|| files.first().map(|f| f.id.clone()));
        if let Some(id) = &active_file_id {
            save_active_file_id(id);
        }

        let text = active_file_id
            .as_ref()
            .and_then(|id| files.iter().find(|f| &f.id == id))
            .map(|f| f.json_text.clone())
            .unwrap_or_default();

        let (tree_root, updated_error) = match parse_json_text(&text) {
            Ok(v) => (value_to_tree(&v, ROOT_KEY), None),
            Err(e) => (empty_tree(), Some(e)),
        };
        let expanded = expand_first_level(&tree_root);

        let sidebar_collapsed = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(SIDEBAR_COLLAPSED_KEY).ok().flatten())
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        Self {
            files: RwSignal::new(files),
            active_file_id: RwSignal::new(active_file_id),
            original_text: RwSignal::new(text.clone()),
            updated_text: RwSignal::new(text),
            updated_error: RwSignal::new(updated_error),
            tree_root: RwSignal::new(tree_root),
            expanded: RwSignal::new(expanded),
            drag: RwSignal::new(DragState::Idle),
            sidebar_collapsed: RwSignal::new(sidebar_collapsed),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

/// Structural-edit callbacks the tree panel invokes. Provided by the
/// workspace page so commit logic stays next to publication.
#[derive(Clone)]
pub(crate) struct TreeActions {
    /// (node id, new key) -> rename via the mutator and publish.
    pub rename: Callback<(NodeId, String)>,
    /// Dragged node id -> commit the pending drop target, if any.
    pub drop_commit: Callback<NodeId>,
}
