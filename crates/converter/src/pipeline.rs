use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use strudelize_analysis::{AnalysisParams, FeatureExtractor};
use strudelize_audio::{is_supported, AudioDecoder};
use strudelize_domain::{ConvertError, StrudelResult};

use crate::compose::PatternComposer;
use crate::separation::SourceSeparator;
use crate::stems::StemAnalyzer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub input_path: String,
}

/// One synchronous conversion: allow-list gate, decode, main-mix feature
/// extraction, best-effort stem enrichment, composition. Holds no state
/// between requests.
pub struct ConversionPipeline<S: SourceSeparator> {
    separator: S,
    extractor: FeatureExtractor,
    stems: StemAnalyzer,
    composer: PatternComposer,
}

impl<S: SourceSeparator> ConversionPipeline<S> {
    pub fn new(separator: S) -> Self {
        Self::with_params(separator, AnalysisParams::default(), 16, 12.0)
    }

    pub fn with_params(
        separator: S,
        params: AnalysisParams,
        grid: usize,
        preview_seconds: f64,
    ) -> Self {
        Self {
            separator,
            extractor: FeatureExtractor::new(params),
            stems: StemAnalyzer::new(params),
            composer: PatternComposer::new(&params, grid, preview_seconds),
        }
    }

    #[instrument(skip(self))]
    pub fn convert(&self, job: &ConversionJob) -> Result<StrudelResult> {
        let path = Path::new(&job.input_path);
        if !is_supported(path) {
            return Err(ConvertError::UnsupportedFormat(job.input_path.clone()).into());
        }

        info!(path = %job.input_path, "decoding audio");
        let signal = AudioDecoder::open(path)?;
        let features = self.extractor.extract(&signal)?;
        let stems = self.stems.analyze(&self.separator, path);
        Ok(self.composer.compose(&signal, &features, &stems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separation::{DirectorySeparator, DisabledSeparator};
    use std::path::Path;

    fn write_clicks(path: &Path, seconds: f32) {
        let sample_rate = 8_000u32;
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let count = (seconds * sample_rate as f32) as usize;
        let interval = sample_rate as usize / 2;
        for i in 0..count {
            let position = i % interval;
            let sample = if position < 256 {
                0.8 * (-(position as f32) / 40.0).exp()
            } else {
                0.0
            };
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn rejects_disallowed_extensions() {
        let pipeline = ConversionPipeline::new(DisabledSeparator);
        let job = ConversionJob {
            input_path: "notes.txt".to_string(),
        };
        let err = pipeline.convert(&job).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn surfaces_decode_failures() {
        let pipeline = ConversionPipeline::new(DisabledSeparator);
        let job = ConversionJob {
            input_path: "missing.wav".to_string(),
        };
        let err = pipeline.convert(&job).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::Decode(_))
        ));
    }

    #[test]
    fn converts_without_separation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mix.wav");
        write_clicks(&input, 3.0);

        let pipeline = ConversionPipeline::new(DisabledSeparator);
        let job = ConversionJob {
            input_path: input.to_string_lossy().into_owned(),
        };
        let result = pipeline.convert(&job).unwrap();

        assert!(result.code.contains("setcpm("));
        assert!(result.code.contains("$: s(`"));
        assert!(!result.code.contains("// stem:"));
        let preview = result.preview_path.expect("preview should still be written");
        assert!(preview.exists());
        std::fs::remove_file(&preview).ok();
    }

    #[test]
    fn stem_layers_appear_when_separation_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mix.wav");
        write_clicks(&input, 2.0);

        let stems_dir = dir.path().join("stems");
        std::fs::create_dir(&stems_dir).unwrap();
        write_clicks(&stems_dir.join("drums.wav"), 2.0);

        let pipeline = ConversionPipeline::new(DirectorySeparator::new(&stems_dir));
        let job = ConversionJob {
            input_path: input.to_string_lossy().into_owned(),
        };
        let result = pipeline.convert(&job).unwrap();

        assert!(result.code.contains("// stem: drums"));
        if let Some(preview) = result.preview_path {
            std::fs::remove_file(preview).ok();
        }
    }

    #[test]
    fn conversion_code_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mix.wav");
        write_clicks(&input, 2.0);

        let pipeline = ConversionPipeline::new(DisabledSeparator);
        let job = ConversionJob {
            input_path: input.to_string_lossy().into_owned(),
        };
        let first = pipeline.convert(&job).unwrap();
        let second = pipeline.convert(&job).unwrap();
        assert_eq!(first.code, second.code);
        for result in [first, second] {
            if let Some(preview) = result.preview_path {
                std::fs::remove_file(preview).ok();
            }
        }
    }
}
