/// Analysis parameters shared by the extraction stages. Frame and hop sizes
/// are fixed per conversion so that frame counts, and with them the pitch
/// contour length, are a deterministic function of signal length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisParams {
    pub frame_size: usize,
    pub hop_size: usize,
    pub min_bpm: f32,
    pub max_bpm: f32,
    /// Lower pitch-tracking bound, C2.
    pub min_pitch_hz: f32,
    /// Upper pitch-tracking bound, C7.
    pub max_pitch_hz: f32,
    /// CMNDF acceptance threshold; lower is stricter.
    pub yin_threshold: f32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            min_bpm: 60.0,
            max_bpm: 180.0,
            min_pitch_hz: 65.406,
            max_pitch_hz: 2093.005,
            yin_threshold: 0.15,
        }
    }
}
