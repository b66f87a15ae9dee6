use strudelize_domain::StepPattern;

const BEATS_PER_CYCLE: f64 = 4.0;

/// Quantizes onset times onto a fixed-length cyclic step grid anchored to
/// the tempo. One cycle covers four beats. The returned pattern always has
/// exactly `grid` slots; zero tempo or an empty onset list produce all
/// rests.
pub struct RhythmGridMapper {
    grid: usize,
}

impl RhythmGridMapper {
    pub fn new(grid: usize) -> Self {
        Self { grid }
    }

    pub fn map(&self, onset_times: &[f64], tempo_bpm: f32) -> StepPattern {
        let mut pattern = StepPattern::rests(self.grid);
        if tempo_bpm <= 0.0 || onset_times.is_empty() || self.grid == 0 {
            return pattern;
        }

        let seconds_per_beat = 60.0 / tempo_bpm as f64;
        for &onset in onset_times {
            let beat_position = onset / seconds_per_beat;
            let step = ((beat_position % BEATS_PER_CYCLE) / BEATS_PER_CYCLE
                * self.grid as f64)
                .round() as usize
                % self.grid;
            pattern.mark(step);
        }
        pattern
    }
}

impl Default for RhythmGridMapper {
    fn default() -> Self {
        Self::new(16)
    }
}
