use tracing::{debug, instrument};

use strudelize_domain::{AudioSignal, ConvertError, FeatureSet};

use crate::params::AnalysisParams;
use crate::{chroma, pitch, stft};

/// Derives tempo, onset envelope, onset times, pitch contour, and chroma
/// energy from one mono signal. Degenerate input (silence, empty signal)
/// degrades to the empty feature shapes instead of failing.
pub struct FeatureExtractor {
    params: AnalysisParams,
}

impl FeatureExtractor {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    #[instrument(skip(self, signal))]
    pub fn extract(&self, signal: &AudioSignal) -> Result<FeatureSet, ConvertError> {
        let params = &self.params;
        let magnitudes =
            stft::magnitude_frames(signal.samples(), params.frame_size, params.hop_size);
        let envelope = onset_envelope(&magnitudes);
        let tempo = estimate_tempo(
            &envelope,
            signal.sample_rate(),
            params.hop_size,
            params.min_bpm,
            params.max_bpm,
        );
        let onset_times = detect_onsets(&envelope, signal.sample_rate(), params.hop_size);
        let contour = pitch::pitch_contour(signal.samples(), signal.sample_rate(), params);
        let chroma = chroma::chroma_matrix(&magnitudes, signal.sample_rate(), params.frame_size);

        debug!(
            tempo_bpm = tempo,
            onsets = onset_times.len(),
            frames = magnitudes.len(),
            "extracted features"
        );
        FeatureSet::new(tempo, envelope, onset_times, contour, chroma)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(AnalysisParams::default())
    }
}

/// Half-wave rectified spectral flux, one value per frame. The first frame
/// has no predecessor and reports zero strength.
fn onset_envelope(magnitudes: &[Vec<f32>]) -> Vec<f32> {
    if magnitudes.is_empty() {
        return Vec::new();
    }
    let mut envelope = Vec::with_capacity(magnitudes.len());
    envelope.push(0.0);
    for pair in magnitudes.windows(2) {
        let flux: f32 = pair[1]
            .iter()
            .zip(&pair[0])
            .map(|(current, previous)| (current - previous).max(0.0))
            .sum();
        envelope.push(flux);
    }
    envelope
}

/// Peak-picks the envelope above an adaptive median + MAD threshold, then
/// backtracks each peak to the preceding local minimum so the reported time
/// is the attack, not the flux maximum.
fn detect_onsets(envelope: &[f32], sample_rate: u32, hop_size: usize) -> Vec<f64> {
    if envelope.len() < 3 || sample_rate == 0 || hop_size == 0 {
        return Vec::new();
    }

    let threshold = adaptive_threshold(envelope, 2.5);
    let hop_seconds = hop_size as f64 / sample_rate as f64;
    let mut onsets: Vec<f64> = Vec::new();

    for i in 1..envelope.len() - 1 {
        let flux = envelope[i];
        if flux > threshold && flux > envelope[i - 1] && flux >= envelope[i + 1] {
            let attack = backtrack_to_minimum(envelope, i);
            let time = attack as f64 * hop_seconds;
            // Two peaks can backtrack onto the same attack frame.
            if onsets.last().map_or(true, |last| time > *last) {
                onsets.push(time);
            }
        }
    }
    onsets
}

fn backtrack_to_minimum(envelope: &[f32], peak: usize) -> usize {
    let mut index = peak;
    while index > 0 && envelope[index - 1] < envelope[index] {
        index -= 1;
    }
    index
}

/// median + k * MAD. Robust to the long quiet stretches that dominate most
/// onset envelopes.
fn adaptive_threshold(values: &[f32], k: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let center = median(values);
    let deviations: Vec<f32> = values.iter().map(|v| (v - center).abs()).collect();
    center + k * median(&deviations)
}

fn median(values: &[f32]) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    }
}

/// Mean-removed autocorrelation of the envelope over the lag range that maps
/// to the configured BPM window; the best-scoring lag becomes the single
/// primary tempo estimate. Returns 0 when the envelope carries no
/// periodicity to speak of.
fn estimate_tempo(
    envelope: &[f32],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> f32 {
    if envelope.is_empty()
        || sample_rate == 0
        || hop_size == 0
        || min_bpm <= 0.0
        || max_bpm <= min_bpm
    {
        return 0.0;
    }

    let frames_per_second = sample_rate as f32 / hop_size as f32;
    let min_lag = ((frames_per_second * 60.0 / max_bpm).floor() as usize).max(1);
    if envelope.len() <= min_lag + 1 {
        return 0.0;
    }
    let max_lag = ((frames_per_second * 60.0 / min_bpm).ceil() as usize).min(envelope.len() - 1);

    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let centered: Vec<f32> = envelope.iter().map(|v| v - mean).collect();
    let energy: f32 = centered.iter().map(|v| v * v).sum();
    if energy <= f32::EPSILON {
        return 0.0;
    }

    let mut best_lag = 0;
    let mut best_score = 0.0f32;
    for lag in min_lag..=max_lag {
        let dot: f32 = centered[..centered.len() - lag]
            .iter()
            .zip(&centered[lag..])
            .map(|(a, b)| a * b)
            .sum();
        // Normalize by overlap so long lags are not penalized.
        let score = dot / (centered.len() - lag) as f32;
        if score > best_score {
            best_score = score;
            best_lag = lag;
        }
    }

    if best_lag == 0 {
        return 0.0;
    }
    60.0 * frames_per_second / best_lag as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 8_000;
    const HOP: usize = 512;

    /// Decaying click every `interval` seconds.
    fn click_train(seconds: f64, interval: f64) -> AudioSignal {
        let count = (seconds * SR as f64) as usize;
        let mut samples = vec![0.0f32; count];
        let click_len = 256;
        let mut pos = 0;
        while pos < count {
            for i in 0..click_len.min(count - pos) {
                samples[pos + i] = 0.8 * (-(i as f32) / 40.0).exp();
            }
            pos += (interval * SR as f64) as usize;
        }
        AudioSignal::new(samples, SR).unwrap()
    }

    #[test]
    fn envelope_is_non_negative_and_frame_aligned() {
        let signal = click_train(2.0, 0.5);
        let magnitudes = stft::magnitude_frames(signal.samples(), 2048, HOP);
        let envelope = onset_envelope(&magnitudes);
        assert_eq!(envelope.len(), magnitudes.len());
        assert_eq!(envelope[0], 0.0);
        assert!(envelope.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn detects_click_onsets_in_order() {
        let signal = click_train(3.0, 0.5);
        let magnitudes = stft::magnitude_frames(signal.samples(), 2048, HOP);
        let envelope = onset_envelope(&magnitudes);
        let onsets = detect_onsets(&envelope, SR, HOP);
        assert!(!onsets.is_empty());
        assert!(onsets.windows(2).all(|w| w[1] > w[0]));
        assert!(onsets.iter().all(|t| *t < signal.duration_seconds()));
    }

    #[test]
    fn silence_produces_no_onsets() {
        let magnitudes = stft::magnitude_frames(&vec![0.0f32; SR as usize], 2048, HOP);
        let envelope = onset_envelope(&magnitudes);
        assert!(detect_onsets(&envelope, SR, HOP).is_empty());
    }

    #[test]
    fn backtracks_to_the_attack_frame() {
        let envelope = [0.0, 0.0, 0.1, 0.6, 1.0, 0.2, 0.0];
        assert_eq!(backtrack_to_minimum(&envelope, 4), 1);
        assert_eq!(backtrack_to_minimum(&envelope, 0), 0);
    }

    #[test]
    fn tempo_from_periodic_envelope() {
        // Impulse every 43 frames at 44.1 kHz / hop 512 is 120.2 BPM.
        let mut envelope = vec![0.0f32; 430];
        for i in (0..430).step_by(43) {
            envelope[i] = 1.0;
        }
        let bpm = estimate_tempo(&envelope, 44_100, 512, 60.0, 180.0);
        assert!((bpm - 120.0).abs() < 5.0, "got {} BPM", bpm);
    }

    #[test]
    fn flat_envelope_has_no_tempo() {
        assert_eq!(estimate_tempo(&[0.0; 300], 44_100, 512, 60.0, 180.0), 0.0);
        assert_eq!(estimate_tempo(&[1.0; 300], 44_100, 512, 60.0, 180.0), 0.0);
        assert_eq!(estimate_tempo(&[], 44_100, 512, 60.0, 180.0), 0.0);
    }

    #[test]
    fn extract_tolerates_degenerate_input() {
        let extractor = FeatureExtractor::default();

        let empty = AudioSignal::new(Vec::new(), SR).unwrap();
        let features = extractor.extract(&empty).unwrap();
        assert_eq!(features.tempo_bpm, 0.0);
        assert!(features.onset_times.is_empty());
        assert!(features.pitch_contour.is_empty());
        assert_eq!(features.chroma.ncols(), 0);

        let silence = AudioSignal::new(vec![0.0; SR as usize], SR).unwrap();
        let features = extractor.extract(&silence).unwrap();
        assert_eq!(features.tempo_bpm, 0.0);
        assert!(features.onset_times.is_empty());
    }

    #[test]
    fn extract_finds_structure_in_a_click_train() {
        let extractor = FeatureExtractor::default();
        let signal = click_train(4.0, 0.5);
        let features = extractor.extract(&signal).unwrap();

        assert!(!features.onset_times.is_empty());
        assert!(features.tempo_bpm > 90.0 && features.tempo_bpm < 150.0);
        assert_eq!(
            features.pitch_contour.len(),
            signal.len().div_ceil(HOP)
        );
        assert_eq!(features.chroma.nrows(), 12);
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = FeatureExtractor::default();
        let signal = click_train(2.0, 0.5);
        let first = extractor.extract(&signal).unwrap();
        let second = extractor.extract(&signal).unwrap();
        assert_eq!(first.tempo_bpm.to_bits(), second.tempo_bpm.to_bits());
        assert_eq!(first.onset_times, second.onset_times);
        let bits = |c: &[f32]| c.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first.pitch_contour), bits(&second.pitch_contour));
        assert_eq!(first.chroma, second.chroma);
    }
}
