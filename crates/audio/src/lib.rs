pub mod dsp;
pub mod io;
pub mod preview;

pub use dsp::{normalize_buffer, PeakLevel};
pub use io::{is_supported, AudioDecoder, SUPPORTED_EXTENSIONS};
pub use preview::PreviewExporter;
