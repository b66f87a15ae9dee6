use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use strudelize_analysis::{AnalysisParams, FeatureExtractor, NoteMapper};
use strudelize_audio::AudioDecoder;
use strudelize_domain::StemFeatureSet;

use crate::separation::{SeparationOutcome, SourceSeparator, StemSource};

/// Re-runs feature extraction and note mapping per isolated instrument
/// track. Every failure in here is a degradation, never an abort: an
/// unavailable separator yields zero stems, and a stem that fails to decode
/// is dropped from the set.
pub struct StemAnalyzer {
    extractor: FeatureExtractor,
    notes: NoteMapper,
}

impl StemAnalyzer {
    pub fn new(params: AnalysisParams) -> Self {
        Self {
            extractor: FeatureExtractor::new(params),
            notes: NoteMapper::new(params.hop_size),
        }
    }

    pub fn analyze(&self, separator: &dyn SourceSeparator, mix_path: &Path) -> Vec<StemFeatureSet> {
        let sources = match separator.separate(mix_path) {
            SeparationOutcome::Stems(sources) => sources,
            SeparationOutcome::Unavailable { reason } => {
                warn!(%reason, "stem separation unavailable, continuing with main mix only");
                return Vec::new();
            }
        };

        let mut stems = Vec::with_capacity(sources.len());
        for source in &sources {
            match self.analyze_stem(source) {
                Ok(stem) => stems.push(stem),
                Err(err) => {
                    warn!(label = %source.label, error = %err, "dropping stem");
                }
            }
        }
        info!(count = stems.len(), "analyzed stems");
        stems
    }

    fn analyze_stem(&self, source: &StemSource) -> Result<StemFeatureSet> {
        let signal = AudioDecoder::open(&source.path)?;
        let features = self.extractor.extract(&signal)?;
        let notes = self.notes.map(
            &features.pitch_contour,
            signal.sample_rate(),
            &features.onset_times,
        );
        Ok(StemFeatureSet::new(source.label.clone(), features, notes))
    }
}

impl Default for StemAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separation::DisabledSeparator;
    use std::path::PathBuf;

    struct BrokenStems;

    impl SourceSeparator for BrokenStems {
        fn separate(&self, _mix_path: &Path) -> SeparationOutcome {
            SeparationOutcome::Stems(vec![StemSource {
                label: "vocals".to_string(),
                path: PathBuf::from("does-not-exist.wav"),
            }])
        }
    }

    #[test]
    fn unavailable_separation_yields_no_stems() {
        let analyzer = StemAnalyzer::default();
        let stems = analyzer.analyze(&DisabledSeparator, Path::new("mix.wav"));
        assert!(stems.is_empty());
    }

    #[test]
    fn undecodable_stem_is_dropped_not_fatal() {
        let analyzer = StemAnalyzer::default();
        let stems = analyzer.analyze(&BrokenStems, Path::new("mix.wav"));
        assert!(stems.is_empty());
    }

    #[test]
    fn decodable_stem_is_analyzed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bass.wav");
        write_tone(&path, 110.0, 1.0);

        struct OneStem(PathBuf);
        impl SourceSeparator for OneStem {
            fn separate(&self, _mix_path: &Path) -> SeparationOutcome {
                SeparationOutcome::Stems(vec![StemSource {
                    label: "bass".to_string(),
                    path: self.0.clone(),
                }])
            }
        }

        let analyzer = StemAnalyzer::default();
        let stems = analyzer.analyze(&OneStem(path), Path::new("mix.wav"));
        assert_eq!(stems.len(), 1);
        assert_eq!(stems[0].label, "bass");
        assert!(!stems[0].features.pitch_contour.is_empty());
    }

    fn write_tone(path: &Path, freq: f32, seconds: f32) {
        let sample_rate = 8_000u32;
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let count = (seconds * sample_rate as f32) as usize;
        for i in 0..count {
            let sample =
                (std::f32::consts::TAU * freq * i as f32 / sample_rate as f32).sin() * 0.6;
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
}
