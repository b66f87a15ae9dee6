use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use strudelize_domain::AudioSignal;

/// Writes a bounded prefix of a signal as a 16-bit WAV into a fresh
/// temporary directory that outlives the exporter.
pub struct PreviewExporter {
    duration_seconds: f64,
}

impl PreviewExporter {
    pub fn new(duration_seconds: f64) -> Self {
        Self { duration_seconds }
    }

    pub fn export(&self, signal: &AudioSignal) -> Result<PathBuf> {
        let limit = (self.duration_seconds * signal.sample_rate() as f64) as usize;
        let clip = &signal.samples()[..limit.min(signal.len())];

        let dir = tempfile::Builder::new()
            .prefix("strudelize-preview-")
            .tempdir()
            .context("create preview directory")?
            .into_path();
        let path = dir.join("preview.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: signal.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(&path, spec).context("create preview writer")?;
        for &sample in clip {
            let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(quantized)?;
        }
        writer.finalize().context("finalize preview clip")?;

        debug!(path = %path.display(), frames = clip.len(), "exported preview clip");
        Ok(path)
    }
}

impl Default for PreviewExporter {
    fn default() -> Self {
        Self::new(12.0)
    }
}
