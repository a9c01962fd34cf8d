use serde::{Deserialize, Serialize};

/// One JSON document in the sidebar. The text is the persisted source of
/// truth; trees are always rebuilt from it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct JsonFile {
    pub id: String,
    pub name: String,
    pub json_text: String,
    pub updated_ms: i64,
}
