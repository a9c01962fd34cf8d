use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, Input, Label, Textarea,
};
use crate::editor::TreePanel;
use crate::json::{parse_json_text, pretty_json};
use crate::models::JsonFile;
use crate::state::{expand_first_level, AppContext, TreeActions};
use crate::storage::{save_active_file_id, save_files, SIDEBAR_COLLAPSED_KEY};
use crate::tree::edit::{rename_key, reparent};
use crate::tree::{tree_to_value, value_to_tree, TreeNode, ROOT_KEY};
use crate::util::{ensure_json_suffix, now_ms, uid};
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

const NEW_FILE_TEXT: &str = "{}";

#[component]
pub fn WorkspacePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let files = app_state.0.files;
    let active_file_id = app_state.0.active_file_id;
    let original_text = app_state.0.original_text;
    let updated_text = app_state.0.updated_text;
    let updated_error = app_state.0.updated_error;
    let tree = app_state.0.tree_root;
    let expanded = app_state.0.expanded;
    let drag = app_state.0.drag;
    let sidebar_collapsed = app_state.0.sidebar_collapsed;

    // File dialogs (sidebar).
    let create_open: RwSignal<bool> = RwSignal::new(false);
    let create_name: RwSignal<String> = RwSignal::new(String::new());
    let create_error: RwSignal<Option<String>> = RwSignal::new(None);
    let create_name_ref: NodeRef<html::Input> = NodeRef::new();

    let rename_open: RwSignal<bool> = RwSignal::new(false);
    let rename_file_id: RwSignal<Option<String>> = RwSignal::new(None);
    let rename_value: RwSignal<String> = RwSignal::new(String::new());
    let rename_error: RwSignal<Option<String>> = RwSignal::new(None);

    let delete_open: RwSignal<bool> = RwSignal::new(false);
    let delete_file_id: RwSignal<Option<String>> = RwSignal::new(None);
    let delete_file_name: RwSignal<String> = RwSignal::new(String::new());

    // Focus the create-file name input when the dialog opens.
    Effect::new(move |_| {
        if !create_open.get() {
            return;
        }

        // Defer to next tick so the Input is mounted.
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if let Some(el) = create_name_ref.get_untracked() {
                    let _ = el.focus();
                }
            })
            .as_ref()
            .unchecked_ref(),
            0,
        );
    });

    // The active file record follows the right-hand editor text. The left
    // panel keeps the opened snapshot until "Save Changes".
    let persist_updated_text = move |text: &str| {
        let Some(id) = active_file_id.get_untracked() else {
            return;
        };
        files.update(|fs| {
            if let Some(f) = fs.iter_mut().find(|f| f.id == id) {
                f.json_text = text.to_string();
                f.updated_ms = now_ms();
            }
        });
        save_files(&files.get_untracked());
    };

    // Single publication point for structural edits: replace the tree, then
    // reserialize it into the right-hand editor.
    let publish_tree = move |next: TreeNode| {
        let text = pretty_json(&tree_to_value(&next));
        tree.set(next);
        updated_text.set(text.clone());
        updated_error.set(None);
        persist_updated_text(&text);
    };

    provide_context(TreeActions {
        rename: Callback::new(move |(id, new_key): (crate::tree::NodeId, String)| {
            let root = tree.get_untracked();
            let next = rename_key(&root, id, new_key.trim());
            if next != root {
                publish_tree(next);
            }
        }),
        drop_commit: Callback::new(move |dragged: crate::tree::NodeId| {
            let mut committed = None;
            drag.update(|d| committed = d.release());

            let Some((source, target)) = committed else {
                return;
            };
            // The DOM payload and the gesture state must agree.
            if source != dragged {
                return;
            }

            let root = tree.get_untracked();
            let next = reparent(&root, source, target.parent_id, target.before_id);
            if next != root {
                expanded.update(|set| {
                    set.insert(target.parent_id);
                });
                publish_tree(next);
            }
        }),
    });

    // Opening a file resets all three panels and the gesture.
    let open_file = move |id: String| {
        let Some(file) = files.get_untracked().into_iter().find(|f| f.id == id) else {
            return;
        };

        active_file_id.set(Some(file.id.clone()));
        save_active_file_id(&file.id);

        original_text.set(file.json_text.clone());
        updated_text.set(file.json_text.clone());
        drag.set(Default::default());

        match parse_json_text(&file.json_text) {
            Ok(v) => {
                let root = value_to_tree(&v, ROOT_KEY);
                expanded.set(expand_first_level(&root));
                tree.set(root);
                updated_error.set(None);
            }
            Err(e) => {
                let root = value_to_tree(&serde_json::Value::Object(Default::default()), ROOT_KEY);
                expanded.set(expand_first_level(&root));
                tree.set(root);
                updated_error.set(Some(e));
            }
        }
    };

    let submit_create_file = move || {
        let name = create_name.get_untracked();
        if name.trim().is_empty() {
            create_error.set(Some("File name is required".to_string()));
            return;
        }

        let file = JsonFile {
            id: uid(),
            name: ensure_json_suffix(&name),
            json_text: NEW_FILE_TEXT.to_string(),
            updated_ms: now_ms(),
        };
        let id = file.id.clone();

        files.update(|fs| fs.push(file));
        save_files(&files.get_untracked());
        create_open.set(false);
        open_file(id);
    };

    let on_open_rename = move |id: String, name: String| {
        rename_file_id.set(Some(id));
        rename_value.set(name);
        rename_error.set(None);
        rename_open.set(true);
    };

    let submit_rename_file = move || {
        let Some(id) = rename_file_id.get_untracked() else {
            return;
        };
        let name = rename_value.get_untracked();
        if name.trim().is_empty() {
            rename_error.set(Some("Name cannot be empty".to_string()));
            return;
        }

        files.update(|fs| {
            if let Some(f) = fs.iter_mut().find(|f| f.id == id) {
                f.name = ensure_json_suffix(&name);
                f.updated_ms = now_ms();
            }
        });
        save_files(&files.get_untracked());
        rename_open.set(false);
    };

    let on_open_delete = move |id: String, name: String| {
        delete_file_id.set(Some(id));
        delete_file_name.set(name);
        delete_open.set(true);
    };

    let submit_delete_file = move || {
        let Some(id) = delete_file_id.get_untracked() else {
            return;
        };

        files.update(|fs| fs.retain(|f| f.id != id));
        save_files(&files.get_untracked());
        delete_open.set(false);

        if active_file_id.get_untracked().as_deref() == Some(id.as_str()) {
            if let Some(first) = files.get_untracked().first() {
                open_file(first.id.clone());
            } else {
                active_file_id.set(None);
                original_text.set(String::new());
                updated_text.set(String::new());
                updated_error.set(None);
                let root = value_to_tree(&serde_json::Value::Object(Default::default()), ROOT_KEY);
                expanded.set(expand_first_level(&root));
                tree.set(root);
            }
        }
    };

    // Right-hand editor edits: validate and persist, never rebuild the tree
    // implicitly. The structural panel follows the text only via "Rebuild".
    let on_updated_change = Callback::new(move |text: String| {
        match parse_json_text(&text) {
            Ok(_) => updated_error.set(None),
            Err(e) => updated_error.set(Some(e)),
        }
        persist_updated_text(&text);
    });

    let on_rebuild = move |_| {
        let text = updated_text.get_untracked();
        match parse_json_text(&text) {
            Ok(v) => {
                let root = value_to_tree(&v, ROOT_KEY);
                expanded.set(expand_first_level(&root));
                tree.set(root);
                drag.set(Default::default());
                updated_error.set(None);
            }
            Err(e) => updated_error.set(Some(e)),
        }
    };

    let on_reset_updated = move |_| {
        let text = original_text.get_untracked();
        updated_text.set(text.clone());
        match parse_json_text(&text) {
            Ok(v) => {
                let root = value_to_tree(&v, ROOT_KEY);
                expanded.set(expand_first_level(&root));
                tree.set(root);
                updated_error.set(None);
            }
            Err(e) => updated_error.set(Some(e)),
        }
        drag.set(Default::default());
        persist_updated_text(&text);
    };

    let on_save_changes = move |_| {
        let text = updated_text.get_untracked();
        original_text.set(text.clone());
        persist_updated_text(&text);
    };

    let on_format = move |_| {
        let text = updated_text.get_untracked();
        match parse_json_text(&text) {
            Ok(v) => {
                let formatted = pretty_json(&v);
                updated_text.set(formatted.clone());
                updated_error.set(None);
                persist_updated_text(&formatted);
            }
            Err(e) => updated_error.set(Some(e)),
        }
    };

    let persist_sidebar = move || {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(
                SIDEBAR_COLLAPSED_KEY,
                if sidebar_collapsed.get_untracked() { "1" } else { "0" },
            );
        }
    };
    let on_toggle_sidebar = move |_| {
        sidebar_collapsed.update(|v| *v = !*v);
        persist_sidebar();
    };

    let sidebar_width_class = move || {
        if sidebar_collapsed.get() {
            "w-14"
        } else {
            "w-56"
        }
    };

    let active_file_name = move || {
        let id = active_file_id.get();
        id.and_then(|id| {
            files
                .get()
                .into_iter()
                .find(|f| f.id == id)
                .map(|f| f.name)
        })
        .unwrap_or_else(|| "No file".to_string())
    };

    let has_unsaved = move || updated_text.get() != original_text.get();

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-[96rem] gap-4 px-4 py-6">
                <aside class=move || format!("{} shrink-0", sidebar_width_class())>
                    <div class="sticky top-6 space-y-4">
                        <div class="flex items-center justify-between">
                            <a href="/" class="text-sm font-medium text-foreground">
                                <Show when=move || !sidebar_collapsed.get() fallback=|| view! { "R" }>
                                    "Reshaper"
                                </Show>
                            </a>

                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Icon
                                on:click=on_toggle_sidebar
                                attr:title="Toggle sidebar"
                                class="h-8 w-8"
                            >
                                <span class="text-xs text-muted-foreground">
                                    {move || if sidebar_collapsed.get() { ">" } else { "<" }}
                                </span>
                            </Button>
                        </div>

                        <Show when=move || !sidebar_collapsed.get() fallback=|| ().into_view()>
                            <Card>
                                <CardHeader class="flex-row items-center justify-between p-3">
                                    <div>
                                        <CardTitle class="text-sm">"Files"</CardTitle>
                                        <CardDescription class="text-xs">
                                            {move || format!("{} stored", files.get().len())}
                                        </CardDescription>
                                    </div>
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Icon
                                        on:click=move |_| {
                                            create_name.set(String::new());
                                            create_error.set(None);
                                            create_open.set(true);
                                        }
                                        attr:title="New file"
                                        class="h-7 w-7"
                                    >
                                        <span class="text-xs text-muted-foreground">"+"</span>
                                    </Button>
                                </CardHeader>
                                <CardContent class="p-3 pt-0">
                                    <div class="space-y-1">
                                        <Show
                                            when=move || !files.get().is_empty()
                                            fallback=|| view! {
                                                <div class="text-[11px] text-muted-foreground">"No files"</div>
                                            }
                                        >
                                            {move || {
                                                let selected = active_file_id.get();

                                                files
                                                    .get()
                                                    .into_iter()
                                                    .map(|file| {
                                                        let is_selected =
                                                            selected.as_deref() == Some(file.id.as_str());
                                                        let variant = if is_selected {
                                                            ButtonVariant::Outline
                                                        } else {
                                                            ButtonVariant::Ghost
                                                        };

                                                        let id_for_open = file.id.clone();
                                                        let id_for_rename = file.id.clone();
                                                        let name_for_rename = file.name.clone();
                                                        let id_for_delete = file.id.clone();
                                                        let name_for_delete = file.name.clone();
                                                        let name_label = file.name.clone();

                                                        view! {
                                                            <div class="group flex min-w-0 items-center gap-1">
                                                                <Button
                                                                    variant=variant
                                                                    size=ButtonSize::Sm
                                                                    class="min-w-0 flex-1 justify-start"
                                                                    attr:aria-current=move || {
                                                                        if is_selected { Some("page") } else { None }
                                                                    }
                                                                    on:click=move |_| open_file(id_for_open.clone())
                                                                >
                                                                    <span class="min-w-0 flex-1 truncate text-left">{name_label}</span>
                                                                </Button>

                                                                <div class="hidden shrink-0 items-center gap-1 group-hover:flex">
                                                                    <Button
                                                                        variant=ButtonVariant::Ghost
                                                                        size=ButtonSize::Icon
                                                                        class="h-7 w-7"
                                                                        attr:title="Rename"
                                                                        on:click=move |ev: web_sys::MouseEvent| {
                                                                            ev.stop_propagation();
                                                                            on_open_rename(
                                                                                id_for_rename.clone(),
                                                                                name_for_rename.clone(),
                                                                            );
                                                                        }
                                                                    >
                                                                        <span class="text-xs text-muted-foreground">"✎"</span>
                                                                    </Button>
                                                                    <Button
                                                                        variant=ButtonVariant::Ghost
                                                                        size=ButtonSize::Icon
                                                                        class="h-7 w-7 text-destructive"
                                                                        attr:title="Delete"
                                                                        on:click=move |ev: web_sys::MouseEvent| {
                                                                            ev.stop_propagation();
                                                                            on_open_delete(
                                                                                id_for_delete.clone(),
                                                                                name_for_delete.clone(),
                                                                            );
                                                                        }
                                                                    >
                                                                        <span class="text-xs">"×"</span>
                                                                    </Button>
                                                                </div>
                                                            </div>
                                                        }
                                                    })
                                                    .collect_view()
                                            }}
                                        </Show>
                                    </div>
                                </CardContent>
                            </Card>
                        </Show>
                    </div>
                </aside>

                <main class="flex min-w-0 flex-1 flex-col">
                    <div class="mb-4 flex items-center justify-between gap-3">
                        <div class="flex min-w-0 items-center gap-2 text-sm">
                            <span class="min-w-0 truncate font-medium">{active_file_name}</span>
                            <Show when=has_unsaved fallback=|| ().into_view()>
                                <span class="rounded bg-muted px-1.5 py-0.5 text-[10px] text-muted-foreground">
                                    "unsaved"
                                </span>
                            </Show>
                        </div>

                        <div class="flex shrink-0 items-center gap-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=on_rebuild
                                attr:title="Parse the updated text and rebuild the structure panel"
                            >
                                "Rebuild from Updated"
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=on_reset_updated
                                attr:title="Discard edits and restore the original text"
                            >
                                "Reset Updated"
                            </Button>
                            <Button
                                size=ButtonSize::Sm
                                on:click=on_save_changes
                                attr:disabled=move || !has_unsaved()
                            >
                                "Save Changes"
                            </Button>
                        </div>
                    </div>

                    <div class="grid min-h-0 flex-1 gap-4 lg:grid-cols-3">
                        <section class="flex min-h-0 flex-col rounded-xl border bg-card text-card-foreground shadow-sm">
                            <div class="border-b px-4 py-3">
                                <div class="text-sm font-semibold">"Original"</div>
                                <div class="text-xs text-muted-foreground">"Snapshot from the last save"</div>
                            </div>
                            <div class="min-h-0 flex-1 p-2">
                                <Textarea
                                    class="h-full min-h-[24rem] border-0 shadow-none"
                                    readonly=true
                                    bind_value=original_text
                                />
                            </div>
                        </section>

                        <TreePanel />

                        <section class="flex min-h-0 flex-col rounded-xl border bg-card text-card-foreground shadow-sm">
                            <div class="flex items-center justify-between gap-2 border-b px-4 py-3">
                                <div>
                                    <div class="text-sm font-semibold">"Updated"</div>
                                    <div class="text-xs text-muted-foreground">"Structural edits land here"</div>
                                </div>
                                <Button
                                    variant=ButtonVariant::Ghost
                                    size=ButtonSize::Sm
                                    on:click=on_format
                                    attr:title="Reformat the text"
                                >
                                    "Format"
                                </Button>
                            </div>
                            <div class="flex min-h-0 flex-1 flex-col gap-2 p-2">
                                <Show when=move || updated_error.get().is_some() fallback=|| ().into_view()>
                                    {move || updated_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>
                                <Textarea
                                    class="min-h-[24rem] flex-1 border-0 shadow-none"
                                    spellcheck=false
                                    bind_value=updated_text
                                    on_change=on_updated_change
                                />
                            </div>
                        </section>
                    </div>

                    <div class="mt-3 text-xs text-muted-foreground">
                        "Drag rows in the structure panel to move values. Dropping on a container appends; dropping on a value inserts before it."
                    </div>
                </main>

                <Show when=move || create_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium">"New file"</div>
                                <div class="text-xs text-muted-foreground">"A .json suffix is added automatically."</div>
                            </div>

                            <div class="space-y-2">
                                <div class="space-y-1">
                                    <Label class="text-xs">"Name"</Label>
                                    <Input
                                        node_ref=create_name_ref
                                        bind_value=create_name
                                        class="h-8 text-sm border-border bg-background"
                                        placeholder="payload.json"
                                    />
                                </div>

                                <Show when=move || create_error.get().is_some() fallback=|| ().into_view()>
                                    {move || create_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| create_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button size=ButtonSize::Sm on:click=move |_| submit_create_file()>
                                        "Create"
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>

                <Show when=move || rename_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium">"Rename file"</div>
                            </div>

                            <div class="space-y-2">
                                <div class="space-y-1">
                                    <Label class="text-xs">"New name"</Label>
                                    <Input bind_value=rename_value class="h-8 text-sm" />
                                </div>

                                <Show when=move || rename_error.get().is_some() fallback=|| ().into_view()>
                                    {move || rename_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| rename_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button size=ButtonSize::Sm on:click=move |_| submit_rename_file()>
                                        "Save"
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>

                <Show when=move || delete_open.get() fallback=|| ().into_view()>
                    <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                        <div class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg">
                            <div class="mb-3 space-y-1">
                                <div class="text-sm font-medium text-destructive">"Delete file"</div>
                                <div class="text-xs text-muted-foreground">"This cannot be undone."</div>
                            </div>

                            <div class="space-y-2">
                                <div class="rounded-md border border-border bg-muted px-3 py-2 text-sm">
                                    {move || delete_file_name.get()}
                                </div>

                                <div class="flex items-center justify-end gap-2 pt-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| delete_open.set(false)
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        class="border-destructive/40 text-destructive"
                                        on:click=move |_| submit_delete_file()
                                    >
                                        "Delete"
                                    </Button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}
