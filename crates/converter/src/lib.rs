pub mod compose;
pub mod pipeline;
pub mod separation;
pub mod stems;

pub use compose::PatternComposer;
pub use pipeline::{ConversionJob, ConversionPipeline};
pub use separation::{
    DirectorySeparator, DisabledSeparator, SeparationOutcome, SourceSeparator, StemSource,
};
pub use stems::StemAnalyzer;
