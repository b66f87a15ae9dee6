use ndarray::Array2;

use strudelize_domain::PITCH_CLASS_COUNT;

use crate::stft::bin_frequency;

// C0; chroma bins count semitones from here.
const C0_HZ: f32 = 16.351_599;

// Energy outside this band says little about pitch class.
const MIN_HZ: f32 = 20.0;
const MAX_HZ: f32 = 10_000.0;

/// Folds spectral energy onto the 12 pitch classes, one column per analysis
/// frame. Rows are C..B. An empty spectrogram yields a 12×0 matrix.
pub fn chroma_matrix(
    magnitudes: &[Vec<f32>],
    sample_rate: u32,
    frame_size: usize,
) -> Array2<f32> {
    let mut chroma = Array2::zeros((PITCH_CLASS_COUNT, magnitudes.len()));

    for (column, frame) in magnitudes.iter().enumerate() {
        for (bin, &magnitude) in frame.iter().enumerate().skip(1) {
            let freq = bin_frequency(bin, frame_size, sample_rate);
            if !(MIN_HZ..=MAX_HZ).contains(&freq) {
                continue;
            }
            let semitone = 12.0 * (freq / C0_HZ).log2();
            let class = (semitone.round() as i64).rem_euclid(PITCH_CLASS_COUNT as i64) as usize;
            chroma[[class, column]] += magnitude * magnitude;
        }
    }

    chroma
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spectrogram_folds_to_zero_columns() {
        let chroma = chroma_matrix(&[], 44_100, 2048);
        assert_eq!(chroma.shape(), &[12, 0]);
    }

    #[test]
    fn tone_energy_lands_on_its_pitch_class() {
        let sample_rate = 8_192;
        let frame_size = 1024;
        // 392 Hz is G4.
        let samples: Vec<f32> = (0..frame_size * 2)
            .map(|i| (std::f32::consts::TAU * 392.0 * i as f32 / sample_rate as f32).sin())
            .collect();
        let frames = crate::stft::magnitude_frames(&samples, frame_size, 256);
        let chroma = chroma_matrix(&frames, sample_rate as u32, frame_size);

        let energy: Vec<f32> = (0..12)
            .map(|class| chroma.row(class).sum())
            .collect();
        let strongest = energy
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(class, _)| class)
            .unwrap();
        assert_eq!(strongest, 7, "G is pitch-class index 7");
    }

    #[test]
    fn values_are_non_negative() {
        let frames = vec![vec![0.5f32; 513]; 3];
        let chroma = chroma_matrix(&frames, 44_100, 1024);
        assert!(chroma.iter().all(|v| *v >= 0.0));
        assert_eq!(chroma.ncols(), 3);
    }
}
