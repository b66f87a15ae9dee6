use realfft::RealFftPlanner;

/// Hann-windowed magnitude spectrogram. One row per frame, each of length
/// `frame_size / 2 + 1`. Signals shorter than one frame produce no frames.
pub fn magnitude_frames(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    if frame_size == 0 || hop_size == 0 || samples.len() < frame_size {
        return Vec::new();
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);
    let window = hann_window(frame_size);

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    let mut frames = Vec::with_capacity(num_frames);
    let mut input = fft.make_input_vec();
    let mut output = fft.make_output_vec();

    for i in 0..num_frames {
        let start = i * hop_size;
        for (slot, (&sample, &weight)) in input
            .iter_mut()
            .zip(samples[start..start + frame_size].iter().zip(&window))
        {
            *slot = sample * weight;
        }
        if fft.process(&mut input, &mut output).is_ok() {
            frames.push(output.iter().map(|bin| bin.norm()).collect());
        }
    }

    frames
}

/// Center frequency of an FFT bin in Hz.
pub fn bin_frequency(bin: usize, frame_size: usize, sample_rate: u32) -> f32 {
    bin as f32 * sample_rate as f32 / frame_size as f32
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let phase = std::f32::consts::TAU * i as f32 / size as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}
