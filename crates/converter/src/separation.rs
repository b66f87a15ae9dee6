use std::path::{Path, PathBuf};

/// One isolated instrument track on disk, as produced by an external
/// separation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemSource {
    pub label: String,
    pub path: PathBuf,
}

/// What the separation collaborator produced. Unavailability is an ordinary
/// value here, not a caught failure: the pipeline degrades to main-mix-only
/// when it sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparationOutcome {
    Stems(Vec<StemSource>),
    Unavailable { reason: String },
}

pub trait SourceSeparator {
    fn separate(&self, mix_path: &Path) -> SeparationOutcome;
}

/// The no-op collaborator used when no separation backend is configured.
pub struct DisabledSeparator;

impl SourceSeparator for DisabledSeparator {
    fn separate(&self, _mix_path: &Path) -> SeparationOutcome {
        SeparationOutcome::Unavailable {
            reason: "source separation disabled".to_string(),
        }
    }
}

/// Picks up pre-separated stems from a directory of `<label>.wav` files,
/// the layout an external spleeter/demucs run leaves behind. Labels come
/// from file stems and are sorted so the outcome does not depend on
/// directory iteration order.
pub struct DirectorySeparator {
    root: PathBuf,
}

impl DirectorySeparator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceSeparator for DirectorySeparator {
    fn separate(&self, _mix_path: &Path) -> SeparationOutcome {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                return SeparationOutcome::Unavailable {
                    reason: format!("read stems dir {:?}: {}", self.root, err),
                }
            }
        };

        let mut stems = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_wav = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false);
            if !is_wav {
                continue;
            }
            if let Some(label) = path.file_stem().and_then(|stem| stem.to_str()) {
                stems.push(StemSource {
                    label: label.to_string(),
                    path: path.clone(),
                });
            }
        }
        stems.sort_by(|a, b| a.label.cmp(&b.label));

        if stems.is_empty() {
            SeparationOutcome::Unavailable {
                reason: format!("no stem files in {:?}", self.root),
            }
        } else {
            SeparationOutcome::Stems(stems)
        }
    }
}
