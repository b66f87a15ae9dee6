pub mod chroma;
pub mod features;
pub mod key;
pub mod notes;
pub mod params;
pub mod pitch;
pub mod rhythm;
pub mod stft;

pub use features::FeatureExtractor;
pub use key::KeyEstimator;
pub use notes::NoteMapper;
pub use params::AnalysisParams;
pub use rhythm::RhythmGridMapper;
