#![allow(dead_code)]

use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Plain-text JSON editor surface. Same manual two-way wiring as `Input`;
/// `on_change` fires after the bound signal has been updated.
#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(optional)] readonly: bool,
    #[prop(optional)] spellcheck: bool,

    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(optional, into)] on_change: Option<Callback<String>>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground border-input flex w-full min-w-0 resize-none rounded-md border bg-transparent px-3 py-2 font-mono text-xs leading-5 shadow-xs outline-none",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        "read-only:bg-muted/40 read-only:text-muted-foreground",
        class
    );

    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(el) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
                let v = el.value();
                bind_value.set(v.clone());
                if let Some(cb) = on_change {
                    cb.run(v);
                }
            }
        }
    };

    view! {
        <textarea
            data-name="Textarea"
            class=merged_class
            placeholder=placeholder
            readonly=readonly
            spellcheck=spellcheck
            prop:value=move || bind_value.get()
            on:input=on_input
        ></textarea>
    }
    .into_any()
}
