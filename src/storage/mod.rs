use crate::models::JsonFile;
use serde::{Deserialize, Serialize};

pub(crate) const FILES_KEY: &str = "reshaper_files";
pub(crate) const ACTIVE_FILE_KEY: &str = "reshaper_active_file_id";
pub(crate) const SIDEBAR_COLLAPSED_KEY: &str = "reshaper_sidebar_collapsed";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_files() -> Vec<JsonFile> {
    load_json_from_storage::<Vec<JsonFile>>(FILES_KEY).unwrap_or_default()
}

pub(crate) fn save_files(files: &[JsonFile]) {
    save_json_to_storage(FILES_KEY, &files);
}

pub(crate) fn load_active_file_id() -> Option<String> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    storage.get_item(ACTIVE_FILE_KEY).ok().flatten()
}

pub(crate) fn save_active_file_id(id: &str) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(ACTIVE_FILE_KEY, id);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
pub(crate) fn clear_files_storage() {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(FILES_KEY);
        let _ = storage.remove_item(ACTIVE_FILE_KEY);
    }
}
