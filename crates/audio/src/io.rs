use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use strudelize_domain::{AudioSignal, ConvertError};

use crate::dsp::normalize_buffer;

/// Container/codec allow-list. Anything else is rejected before the
/// pipeline touches it.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["wav", "mp3", "ogg", "flac", "aac", "m4a", "mp4", "mov"];

pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
        })
        .unwrap_or(false)
}

pub struct AudioDecoder;

impl AudioDecoder {
    /// Decodes a media file into a peak-normalized mono signal.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<AudioSignal, ConvertError> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)
            .map_err(|err| ConvertError::decode(format!("open {:?}: {}", path_ref, err)))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());
        let mut hint = Hint::new();
        if let Some(ext) = path_ref.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|err| ConvertError::decode(format!("probe {:?}: {}", path_ref, err)))?;
        let mut format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| ConvertError::decode("no default track found"))?;
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|err| ConvertError::decode(format!("codec setup: {}", err)))?;
        let sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);

        let mut samples = Vec::new();
        loop {
            match format.next_packet() {
                Ok(packet) => {
                    let buffer = match decoder.decode(&packet) {
                        Ok(buffer) => buffer,
                        // skip undecodable packet
                        Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                        Err(err) => return Err(ConvertError::decode(err.to_string())),
                    };
                    let spec = *buffer.spec();
                    let channels = spec.channels.count().max(1);
                    let mut interleaved =
                        SampleBuffer::<f32>::new(buffer.frames() as u64, spec);
                    interleaved.copy_interleaved_ref(buffer);
                    for frame in interleaved.samples().chunks(channels) {
                        let sum: f32 = frame.iter().sum();
                        samples.push(sum / channels as f32);
                    }
                }
                Err(err) => {
                    use symphonia::core::errors::Error as SymphError;
                    match err {
                        SymphError::IoError(e)
                            if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                        {
                            break;
                        }
                        SymphError::DecodeError(_) => {
                            // skip undecodable packet
                        }
                        other => return Err(ConvertError::decode(other.to_string())),
                    }
                }
            }
        }

        debug!(
            sample_rate,
            sample_count = samples.len(),
            "decoded mono signal"
        );
        normalize_buffer(&mut samples);
        AudioSignal::new(samples, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_surfaces_missing_file() {
        let result = AudioDecoder::open("does-not-exist.wav");
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn allow_list_matches_extensions_case_insensitively() {
        assert!(is_supported("song.wav"));
        assert!(is_supported("clip.M4A"));
        assert!(is_supported("video.mov"));
        assert!(!is_supported("notes.txt"));
        assert!(!is_supported("no-extension"));
    }
}
