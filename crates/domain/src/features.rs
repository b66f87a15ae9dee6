use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::notes::NoteEvent;
use crate::ConvertError;

/// Number of chroma rows, pitch classes C..B.
pub const PITCH_CLASS_COUNT: usize = 12;

/// Everything the extractor derives from one signal. Shape invariants are
/// enforced at construction: chroma always has 12 rows and onset times are
/// strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSet {
    pub tempo_bpm: f32,
    pub onset_envelope: Vec<f32>,
    pub onset_times: Vec<f64>,
    /// Hz per analysis frame; `NaN` or ≤ 0 marks an unvoiced frame.
    pub pitch_contour: Vec<f32>,
    /// 12×F pitch-class energy, one column per analysis frame.
    pub chroma: Array2<f32>,
}

impl FeatureSet {
    pub fn new(
        tempo_bpm: f32,
        onset_envelope: Vec<f32>,
        onset_times: Vec<f64>,
        pitch_contour: Vec<f32>,
        chroma: Array2<f32>,
    ) -> Result<Self, ConvertError> {
        if !tempo_bpm.is_finite() || tempo_bpm < 0.0 {
            return Err(ConvertError::validation("tempo must be finite and >= 0"));
        }
        if onset_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConvertError::validation(
                "onset times must be strictly increasing",
            ));
        }
        if chroma.nrows() != PITCH_CLASS_COUNT {
            return Err(ConvertError::validation(format!(
                "chroma must have {} rows, got {}",
                PITCH_CLASS_COUNT,
                chroma.nrows()
            )));
        }
        Ok(Self {
            tempo_bpm,
            onset_envelope,
            onset_times,
            pitch_contour,
            chroma,
        })
    }

    /// The well-defined degenerate value: silence analyzes to this rather
    /// than to an error.
    pub fn empty() -> Self {
        Self {
            tempo_bpm: 0.0,
            onset_envelope: Vec::new(),
            onset_times: Vec::new(),
            pitch_contour: Vec::new(),
            chroma: Array2::zeros((PITCH_CLASS_COUNT, 0)),
        }
    }
}

/// Features re-derived from one isolated instrument track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StemFeatureSet {
    pub label: String,
    pub features: FeatureSet,
    pub notes: Vec<NoteEvent>,
}

impl StemFeatureSet {
    pub fn new(label: impl Into<String>, features: FeatureSet, notes: Vec<NoteEvent>) -> Self {
        Self {
            label: label.into(),
            features,
            notes,
        }
    }
}
