use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Final artifact of one conversion. `code` is always present; the preview
/// clip is best-effort and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrudelResult {
    pub code: String,
    pub preview_path: Option<PathBuf>,
}

impl StrudelResult {
    pub fn new(code: impl Into<String>, preview_path: Option<PathBuf>) -> Self {
        Self {
            code: code.into(),
            preview_path,
        }
    }
}
