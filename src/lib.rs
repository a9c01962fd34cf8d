mod app;
mod components;
mod editor;
mod json;
mod models;
mod pages;
mod state;
mod storage;
mod tree;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::models::JsonFile;
    use crate::storage::{
        clear_files_storage, load_active_file_id, load_files, save_active_file_id, save_files,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_files_storage_roundtrip() {
        clear_files_storage();
        assert!(load_files().is_empty());

        let files = vec![JsonFile {
            id: "f_1".to_string(),
            name: "demo.json".to_string(),
            json_text: "{\"a\": 1}".to_string(),
            updated_ms: 42,
        }];
        save_files(&files);

        let loaded = load_files();
        assert_eq!(loaded, files);

        clear_files_storage();
        assert!(load_files().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_active_file_id_roundtrip() {
        clear_files_storage();
        assert!(load_active_file_id().is_none());

        save_active_file_id("f_9");
        assert_eq!(load_active_file_id().as_deref(), Some("f_9"));

        clear_files_storage();
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

#[cfg(test)]
mod tests {
    use crate::json::{parse_json_text, pretty_json};
    use crate::state::DEFAULT_JSON;
    use crate::tree::drop::DragState;
    use crate::tree::edit::{rename_key, reparent};
    use crate::tree::{tree_to_value, value_to_tree, TreeNode, ROOT_KEY};
    use serde_json::json;

    fn child<'a>(node: &'a TreeNode, key: &str) -> &'a TreeNode {
        node.children()
            .and_then(|kids| kids.iter().find(|c| c.key == key))
            .unwrap_or_else(|| panic!("missing child {key}"))
    }

    #[test]
    fn test_default_document_round_trip() {
        let value = parse_json_text(DEFAULT_JSON).unwrap();
        let tree = value_to_tree(&value, ROOT_KEY);
        let back = tree_to_value(&tree);

        assert_eq!(back, value);
        // Key order survives the mapping in both directions.
        assert_eq!(pretty_json(&back), pretty_json(&value));
    }

    #[test]
    fn test_drag_gesture_moves_value_into_nested_array() {
        let value = parse_json_text(DEFAULT_JSON).unwrap();
        let tree = value_to_tree(&value, ROOT_KEY);

        let count_id = child(child(&tree, "meta"), "count").id;
        let models_id = child(child(child(&tree, "cars"), "1"), "models").id;

        // Full gesture: pick up meta.count, hover the models array, release.
        let mut drag = DragState::default();
        drag.pick_up(count_id);
        drag.hover(&tree, models_id);
        let (source, target) = drag.release().unwrap();

        let next = reparent(&tree, source, target.parent_id, target.before_id);
        let back = tree_to_value(&next);

        assert_eq!(back["cars"]["1"]["models"], json!(["Evo VIII", "Evo IX", 2]));
        assert_eq!(back["meta"], json!({"source": "demo"}));
    }

    #[test]
    fn test_rename_collision_suffix_in_document() {
        let value = parse_json_text(DEFAULT_JSON).unwrap();
        let tree = value_to_tree(&value, ROOT_KEY);

        let source_id = child(child(&tree, "meta"), "source").id;
        let next = rename_key(&tree, source_id, "count");
        let back = tree_to_value(&next);

        assert_eq!(back["meta"], json!({"count_2": "demo", "count": 2}));
        let meta_keys: Vec<&str> = back["meta"]
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(meta_keys, vec!["count_2", "count"]);
    }
}
