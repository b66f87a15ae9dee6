use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// A decoded mono signal. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, ConvertError> {
        if sample_rate == 0 {
            return Err(ConvertError::validation("sample rate must be nonzero"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(AudioSignal::new(vec![0.0], 0).is_err());
    }

    #[test]
    fn duration_from_length_and_rate() {
        let signal = AudioSignal::new(vec![0.0; 44_100], 44_100).unwrap();
        assert_eq!(signal.duration_seconds(), 1.0);
        assert_eq!(signal.len(), 44_100);
    }
}
