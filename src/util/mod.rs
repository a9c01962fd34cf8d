use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

static COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Id for file records. A per-session counter mixed with the clock so ids
/// stay unique across reloads (files are persisted between sessions).
pub(crate) fn uid() -> String {
    let mut hasher = DefaultHasher::new();
    COUNTER.fetch_add(1, Ordering::SeqCst).hash(&mut hasher);
    now_ms().hash(&mut hasher);
    format!("f_{:x}", hasher.finish())
}

/// File names without a `.json` suffix get one appended.
pub(crate) fn ensure_json_suffix(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.ends_with(".json") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.json")
    }
}
