use ndarray::Array2;

use strudelize_domain::PitchClass;

/// Reduces a chroma matrix to its dominant pitch class: mean energy per
/// class across all frames, stable argmax (ties resolve to the lowest class
/// index). An empty matrix defaults to C rather than erroring.
#[derive(Default)]
pub struct KeyEstimator;

impl KeyEstimator {
    pub fn estimate(&self, chroma: &Array2<f32>) -> PitchClass {
        if chroma.ncols() == 0 {
            return PitchClass::C;
        }

        let mut best_class = 0;
        let mut best_energy = f32::NEG_INFINITY;
        for (class, row) in chroma.rows().into_iter().enumerate() {
            let mean = row.mean().unwrap_or(0.0);
            if mean > best_energy {
                best_energy = mean;
                best_class = class;
            }
        }
        PitchClass::from_index(best_class)
    }
}
