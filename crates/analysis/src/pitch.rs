//! Monophonic pitch tracking with YIN (difference function, cumulative mean
//! normalized difference, absolute threshold, parabolic refinement).

use crate::params::AnalysisParams;

/// Per-frame fundamental frequency in Hz. Frames advance by `hop_size` with
/// a zero-padded tail, so the contour length is `ceil(len / hop)` for any
/// non-empty signal. Unvoiced frames report `NaN`.
pub fn pitch_contour(samples: &[f32], sample_rate: u32, params: &AnalysisParams) -> Vec<f32> {
    if samples.is_empty() || params.hop_size == 0 || params.frame_size == 0 {
        return Vec::new();
    }

    let num_frames = samples.len().div_ceil(params.hop_size);
    let mut contour = Vec::with_capacity(num_frames);
    let mut frame = vec![0.0f32; params.frame_size];

    for i in 0..num_frames {
        let start = i * params.hop_size;
        let end = (start + params.frame_size).min(samples.len());
        let available = end - start;
        frame[..available].copy_from_slice(&samples[start..end]);
        frame[available..].fill(0.0);

        let pitch = yin_frame(
            &frame,
            sample_rate as f32,
            params.min_pitch_hz,
            params.max_pitch_hz,
            params.yin_threshold,
        );
        contour.push(pitch.unwrap_or(f32::NAN));
    }

    contour
}

/// One YIN estimate. `None` marks an unvoiced frame.
fn yin_frame(frame: &[f32], fs: f32, min_hz: f32, max_hz: f32, threshold: f32) -> Option<f32> {
    if fs <= 0.0 || min_hz <= 0.0 || max_hz <= min_hz {
        return None;
    }

    let min_lag = (fs / max_hz).floor() as usize;
    let max_lag = ((fs / min_hz).ceil() as usize).min(frame.len() / 2);
    if min_lag >= max_lag {
        return None;
    }

    let difference = difference_function(frame, max_lag);
    let cmndf = cumulative_mean_normalized(&difference);

    // First valley under the threshold, walked down to its local minimum.
    let mut chosen = None;
    let mut tau = min_lag;
    while tau < cmndf.len() {
        if cmndf[tau] < threshold {
            while tau + 1 < cmndf.len() && cmndf[tau + 1] < cmndf[tau] {
                tau += 1;
            }
            chosen = Some(tau);
            break;
        }
        tau += 1;
    }

    // No dip under the threshold: fall back to the global minimum, but only
    // when it is convincing enough to call the frame voiced.
    let tau = match chosen {
        Some(tau) => tau,
        None => {
            let (tau, value) = cmndf
                .iter()
                .enumerate()
                .skip(min_lag)
                .fold((min_lag, f32::MAX), |best, (i, &v)| {
                    if v < best.1 {
                        (i, v)
                    } else {
                        best
                    }
                });
            if value > 0.5 {
                return None;
            }
            tau
        }
    };

    let refined = parabolic_interpolation(&cmndf, tau);
    if refined <= 0.0 {
        return None;
    }
    Some(fs / refined)
}

/// d(tau) = sum over the window of (x[j] - x[j + tau])^2, for tau in 0..=max_lag.
fn difference_function(signal: &[f32], max_lag: usize) -> Vec<f32> {
    let max_lag = max_lag.min(signal.len() / 2);
    let window = signal.len() - max_lag;
    let mut difference = vec![0.0f32; max_lag + 1];
    for (tau, slot) in difference.iter_mut().enumerate().skip(1) {
        let mut sum = 0.0;
        for j in 0..window {
            let delta = signal[j] - signal[j + tau];
            sum += delta * delta;
        }
        *slot = sum;
    }
    difference
}

/// d'(0) = 1, d'(tau) = d(tau) * tau / sum(d(1..=tau)). Flattens the bias
/// toward small lags in the raw difference function.
fn cumulative_mean_normalized(difference: &[f32]) -> Vec<f32> {
    if difference.is_empty() {
        return Vec::new();
    }
    let mut cmndf = vec![0.0f32; difference.len()];
    cmndf[0] = 1.0;
    let mut running_sum = 0.0f32;
    for tau in 1..difference.len() {
        running_sum += difference[tau];
        cmndf[tau] = if running_sum.abs() < f32::MIN_POSITIVE {
            1.0
        } else {
            difference[tau] * tau as f32 / running_sum
        };
    }
    cmndf
}

/// Sub-sample valley location from the parabola through tau-1, tau, tau+1.
fn parabolic_interpolation(data: &[f32], tau: usize) -> f32 {
    if tau == 0 || tau + 1 >= data.len() {
        return tau as f32;
    }
    let s0 = data[tau - 1];
    let s1 = data[tau];
    let s2 = data[tau + 1];
    let denominator = 2.0 * s1 - s0 - s2;
    if denominator.abs() < 1e-12 {
        return tau as f32;
    }
    tau as f32 + (s0 - s2) / (2.0 * denominator)
}
