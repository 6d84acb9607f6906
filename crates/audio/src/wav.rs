//! WAV decoding for local transcription backends

use std::path::Path;

use crate::AudioError;

/// Sample rate expected by the speech models
pub const SAMPLE_RATE: u32 = 16_000;

/// Decode a 16 kHz WAV file into mono f32 samples
///
/// Multi-channel input is downmixed by averaging; other sample rates are
/// rejected (resampling is the caller's job).
pub fn read_mono_f32(path: &Path) -> Result<Vec<f32>, AudioError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| AudioError::Audio(format!("failed to open {}: {}", path.display(), e)))?;
    let spec = reader.spec();

    if spec.sample_rate != SAMPLE_RATE {
        return Err(AudioError::Audio(format!(
            "expected {SAMPLE_RATE} Hz audio, got {} Hz",
            spec.sample_rate
        )));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AudioError::Audio(format!("failed to decode samples: {e}")))?,
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / 32768.0))
            .collect::<Result<_, _>>()
            .map_err(|e| AudioError::Audio(format!("failed to decode samples: {e}")))?,
    };

    if spec.channels <= 1 {
        return Ok(samples);
    }

    let channels = spec.channels as usize;
    Ok(samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}
