use strudelize_domain::{NoteEvent, NoteName};

/// Samples the pitch contour at onset instants and names the result. Onsets
/// that land on unvoiced frames are dropped, so the output may be shorter
/// than the onset list.
pub struct NoteMapper {
    hop_size: usize,
}

impl NoteMapper {
    pub fn new(hop_size: usize) -> Self {
        Self { hop_size }
    }

    pub fn map(
        &self,
        pitch_contour: &[f32],
        sample_rate: u32,
        onset_times: &[f64],
    ) -> Vec<NoteEvent> {
        if pitch_contour.is_empty() || onset_times.is_empty() || sample_rate == 0 {
            return Vec::new();
        }

        let hop_seconds = self.hop_size as f64 / sample_rate as f64;
        let frame_times: Vec<f64> = (0..pitch_contour.len())
            .map(|frame| frame as f64 * hop_seconds)
            .collect();

        let mut events = Vec::new();
        for (onset_index, &onset) in onset_times.iter().enumerate() {
            // First frame at or after the onset; past the end we clamp to
            // the final frame rather than wrapping.
            let frame = frame_times
                .partition_point(|time| *time < onset)
                .min(pitch_contour.len() - 1);
            if let Some(name) = NoteName::from_hz(pitch_contour[frame]) {
                events.push(NoteEvent::new(name, onset_index));
            }
        }
        events
    }
}

impl Default for NoteMapper {
    fn default() -> Self {
        Self::new(512)
    }
}
