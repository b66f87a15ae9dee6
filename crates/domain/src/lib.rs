pub mod error;
pub mod features;
pub mod io;
pub mod notes;
pub mod pattern;
pub mod result;
pub mod signal;

pub use crate::error::ConvertError;
pub use crate::features::{FeatureSet, StemFeatureSet, PITCH_CLASS_COUNT};
pub use crate::io::{CodeExporter, ExportFormat, JsonExporter, ResultExporter};
pub use crate::notes::{NoteEvent, NoteName, PitchClass};
pub use crate::pattern::{Step, StepPattern};
pub use crate::result::StrudelResult;
pub use crate::signal::AudioSignal;
