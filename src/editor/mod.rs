use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::{expand_first_level, AppContext, TreeActions};
use crate::tree::{NodeContent, NodeId, NodeKind, TreeNode};
use leptos::html;
use leptos::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use wasm_bindgen::JsCast;

const PREVIEW_MAX_CHARS: usize = 40;

/// Short inline rendering of a primitive for the tree row.
pub(crate) fn primitive_preview(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    };

    if raw.chars().count() <= PREVIEW_MAX_CHARS {
        return raw;
    }
    let head: String = raw.chars().take(PREVIEW_MAX_CHARS - 1).collect();
    format!("{head}…")
}

/// Per-render context handed down the row recursion. Everything in here is
/// cheap to copy into row event closures.
#[derive(Clone)]
struct TreeUi {
    app: AppContext,
    actions: TreeActions,
    editing_id: RwSignal<Option<NodeId>>,
    editing_value: RwSignal<String>,
    editing_ref: NodeRef<html::Input>,
}

#[component]
pub fn TreePanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let actions = expect_context::<TreeActions>();

    let tree = app_state.0.tree_root;
    let expanded = app_state.0.expanded;
    let drag = app_state.0.drag;

    // Inline key editing state, shared by all rows (at most one edit at a time).
    let editing_id: RwSignal<Option<NodeId>> = RwSignal::new(None);
    let editing_value: RwSignal<String> = RwSignal::new(String::new());
    let editing_ref: NodeRef<html::Input> = NodeRef::new();

    // Focus the key input when a row enters edit mode.
    Effect::new(move |_| {
        if editing_id.get().is_none() {
            return;
        }
        if let Some(el) = editing_ref.get() {
            // Focus on next tick so the node is mounted.
            if let Some(win) = web_sys::window() {
                let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                    wasm_bindgen::closure::Closure::once_into_js(move || {
                        let _ = el.focus();
                        let _ = el.select();
                    })
                    .as_ref()
                    .unchecked_ref(),
                    0,
                );
            }
        }
    });

    let ui = TreeUi {
        app: app_state.clone(),
        actions,
        editing_id,
        editing_value,
        editing_ref,
    };

    let on_collapse_all = move |_| {
        expanded.set(HashSet::from([tree.get_untracked().id]));
    };
    let on_expand_one_level = move |_| {
        expanded.set(expand_first_level(&tree.get_untracked()));
    };

    // Background of the list: hovering it targets the root (append as last
    // child); rows closer to the pointer override this via stop_propagation.
    let on_list_dragover = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        let root = tree.get_untracked();
        let root_id = root.id;
        drag.update(|d| d.hover(&root, root_id));
    };
    let drop_commit = ui.actions.drop_commit;
    let on_list_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if let Some(id) = dragged_node_id(&ev, &app_state) {
            drop_commit.run(id);
        }
    };

    view! {
        <section class="flex min-h-0 flex-col rounded-xl border bg-card text-card-foreground shadow-sm">
            <div class="flex items-center justify-between gap-2 border-b px-4 py-3">
                <div>
                    <div class="text-sm font-semibold">"Structure"</div>
                    <div class="text-xs text-muted-foreground">
                        {move || format!("{} nodes. Drag rows, click keys to rename.", tree.get().node_count())}
                    </div>
                </div>

                <div class="flex items-center gap-2">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=on_collapse_all
                        attr:title="Collapse everything"
                    >
                        "Collapse all"
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=on_expand_one_level
                        attr:title="Expand root and first level"
                    >
                        "Expand 1 level"
                    </Button>
                </div>
            </div>

            <div
                class="min-h-0 flex-1 overflow-auto p-2"
                on:dragover=on_list_dragover
                on:drop=on_list_drop
            >
                {move || {
                    let root = tree.get();
                    let expanded_now = expanded.get();

                    match root.children() {
                        Some(kids) if !kids.is_empty() => {
                            subtree_rows(kids, root.kind(), 0, &expanded_now, &ui)
                        }
                        Some(_) => view! {
                            <div class="px-2 py-1 text-xs text-muted-foreground">"Empty container"</div>
                        }
                        .into_any(),
                        None => {
                            // Primitive root: a single non-draggable row.
                            let preview = match &root.content {
                                NodeContent::Primitive(v) => primitive_preview(v),
                                _ => String::new(),
                            };
                            view! {
                                <div class="px-2 py-1 font-mono text-xs">{preview}</div>
                            }
                            .into_any()
                        }
                    }
                }}
            </div>
        </section>
    }
}

/// Dragged node id for a drop event: dataTransfer first, the gesture state
/// as fallback (some engines clear dataTransfer between frames).
fn dragged_node_id(ev: &web_sys::DragEvent, app: &AppContext) -> Option<NodeId> {
    ev.data_transfer()
        .and_then(|dt| dt.get_data("text/plain").ok())
        .and_then(|s| NodeId::parse(&s))
        .or_else(|| app.0.drag.get_untracked().source())
}

fn subtree_rows(
    kids: &[TreeNode],
    parent_kind: NodeKind,
    depth: usize,
    expanded_now: &HashSet<NodeId>,
    ui: &TreeUi,
) -> AnyView {
    kids.iter()
        .map(|node| node_row(node, parent_kind, depth, expanded_now, ui))
        .collect::<Vec<_>>()
        .into_any()
}

fn node_row(
    node: &TreeNode,
    parent_kind: NodeKind,
    depth: usize,
    expanded_now: &HashSet<NodeId>,
    ui: &TreeUi,
) -> AnyView {
    let id = node.id;
    let key = node.key.clone();
    let kind = node.kind();
    let has_kids = node.children().map_or(false, |k| !k.is_empty());
    let is_expanded = expanded_now.contains(&id);

    // Array children have positional keys; only object children rename.
    let key_editable = parent_kind == NodeKind::Object;

    let summary = match &node.content {
        NodeContent::Primitive(v) => primitive_preview(v),
        NodeContent::Object(kids) => format!("{{…}} {}", kids.len()),
        NodeContent::Array(kids) => format!("[…] {}", kids.len()),
    };

    let app = ui.app.clone();
    let drag = app.0.drag;
    let tree = app.0.tree_root;
    let expanded = app.0.expanded;
    let rename = ui.actions.rename;
    let drop_commit = ui.actions.drop_commit;
    let editing_id = ui.editing_id;
    let editing_value = ui.editing_value;
    let editing_ref = ui.editing_ref;

    let row_class = move || {
        let pending = drag.get().pending_target();
        let append_into_me =
            pending.map_or(false, |t| t.parent_id == id && t.before_id.is_none());
        let insert_before_me = pending.map_or(false, |t| t.before_id == Some(id));

        if insert_before_me {
            "flex items-center gap-2 rounded-md px-2 py-1 border-t-2 border-primary"
        } else if append_into_me {
            "flex items-center gap-2 rounded-md px-2 py-1 bg-primary/10 ring-1 ring-primary/30"
        } else {
            "flex items-center gap-2 rounded-md px-2 py-1 hover:bg-accent/50"
        }
    };

    let on_toggle = move |_| {
        if !has_kids {
            return;
        }
        expanded.update(|set| {
            if !set.remove(&id) {
                set.insert(id);
            }
        });
    };

    let on_dragstart = move |ev: web_sys::DragEvent| {
        if let Some(dt) = ev.data_transfer() {
            let _ = dt.set_data("text/plain", &id.to_string());
            dt.set_drop_effect("move");
        }
        drag.update(|d| d.pick_up(id));
    };

    let on_dragover = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        let root = tree.get_untracked();
        drag.update(|d| d.hover(&root, id));
    };

    let app_for_drop = app.clone();
    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        if let Some(dragged) = dragged_node_id(&ev, &app_for_drop) {
            drop_commit.run(dragged);
        }
    };

    // Fires after drop as well; by then the gesture is already Idle.
    let on_dragend = move |_ev: web_sys::DragEvent| {
        drag.update(|d| d.cancel());
    };

    let commit_edit = move || {
        if editing_id.get_untracked() != Some(id) {
            return;
        }
        let new_key = editing_value.get_untracked();
        editing_id.set(None);
        rename.run((id, new_key));
    };

    let commit_for_keydown = commit_edit.clone();
    let on_edit_keydown = move |ev: web_sys::KeyboardEvent| {
        match ev.key().as_str() {
            "Enter" => {
                ev.prevent_default();
                commit_for_keydown();
            }
            "Escape" => {
                editing_id.set(None);
            }
            _ => {}
        }
    };
    let on_edit_blur = move |_ev: web_sys::FocusEvent| {
        commit_edit();
    };

    let key_cell = move || {
        let is_editing = editing_id.get() == Some(id);
        if is_editing {
            view! {
                <input
                    class="h-6 w-32 rounded border border-input bg-background px-1 font-mono text-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
                    prop:value=move || editing_value.get()
                    on:input=move |ev: web_sys::Event| {
                        if let Some(el) = ev
                            .target()
                            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                        {
                            editing_value.set(el.value());
                        }
                    }
                    on:keydown=on_edit_keydown
                    on:blur=on_edit_blur
                    node_ref=editing_ref
                />
            }
            .into_any()
        } else {
            let class = if key_editable {
                "cursor-text rounded px-1 font-mono text-xs font-medium hover:bg-accent"
            } else {
                "px-1 font-mono text-xs text-muted-foreground"
            };
            let key_for_edit = key.clone();
            let on_key_click = move |_ev: web_sys::MouseEvent| {
                if !key_editable {
                    return;
                }
                editing_value.set(key_for_edit.clone());
                editing_id.set(Some(id));
            };
            view! {
                <span class=class on:click=on_key_click>
                    {key.clone()}
                </span>
            }
            .into_any()
        }
    };

    let bullet = if has_kids {
        if is_expanded {
            "▾"
        } else {
            "▸"
        }
    } else {
        "·"
    };

    let children_block = if has_kids && is_expanded {
        node.children()
            .map(|kids| subtree_rows(kids, kind, depth + 1, expanded_now, ui))
            .unwrap_or_else(|| ().into_any())
    } else {
        ().into_any()
    };

    let indent_px = depth * 16;

    view! {
        <div>
            <div style=format!("padding-left: {indent_px}px")>
                <div
                    class=row_class
                    draggable="true"
                    on:dragstart=on_dragstart
                    on:dragover=on_dragover
                    on:drop=on_drop
                    on:dragend=on_dragend
                >
                    <button
                        class="w-4 shrink-0 text-xs text-muted-foreground"
                        on:click=on_toggle
                        disabled=!has_kids
                        title=move || if has_kids {
                            if is_expanded { "Collapse" } else { "Expand" }
                        } else {
                            ""
                        }
                    >
                        {bullet}
                    </button>

                    {key_cell}

                    <span class="rounded bg-muted px-1 text-[10px] uppercase text-muted-foreground">
                        {kind.label()}
                    </span>

                    <span class="min-w-0 flex-1 truncate font-mono text-xs text-muted-foreground">
                        {summary}
                    </span>
                </div>
            </div>

            {children_block}
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_preview_quotes_strings() {
        assert_eq!(primitive_preview(&json!("demo")), "\"demo\"");
        assert_eq!(primitive_preview(&json!(2)), "2");
        assert_eq!(primitive_preview(&json!(null)), "null");
        assert_eq!(primitive_preview(&json!(true)), "true");
    }

    #[test]
    fn test_primitive_preview_truncates_long_strings() {
        let long = "x".repeat(100);
        let preview = primitive_preview(&json!(long));
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(preview.ends_with('…'));
    }
}
