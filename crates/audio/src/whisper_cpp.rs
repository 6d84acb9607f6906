//! whisper.cpp local backend (feature `whisper-cpp`)
//!
//! Thin adapter over the `whisper-rs` bindings: one context per GGML
//! model file, greedy sampling, 16 kHz mono WAV input.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::json;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::transcriber::{Device, ModelLoader, RawTranscript, SpeechModel};
use crate::{wav, AudioError};

/// Loads GGML whisper models from a directory
///
/// Model files follow the upstream naming scheme, `ggml-<model>.bin`.
pub struct WhisperCppLoader {
    model_dir: PathBuf,
}

impl WhisperCppLoader {
    pub fn new(model_dir: PathBuf) -> Self {
        Self { model_dir }
    }

    fn model_path(&self, model: &str) -> PathBuf {
        self.model_dir.join(format!("ggml-{model}.bin"))
    }
}

impl ModelLoader for WhisperCppLoader {
    fn load(&self, model: &str, device: &Device) -> Result<Box<dyn SpeechModel>, AudioError> {
        if let Device::Cuda(_) = device {
            // whisper.cpp picks its device when the bindings are built
            tracing::warn!("whisper.cpp backend ignores the requested device");
        }

        let path = self.model_path(model);
        if !path.exists() {
            return Err(AudioError::Model(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        let context = WhisperContext::new_with_params(
            &path.to_string_lossy(),
            WhisperContextParameters::default(),
        )
        .map_err(|e| AudioError::Model(format!("failed to load {}: {}", path.display(), e)))?;

        Ok(Box::new(WhisperCppModel { context }))
    }
}

struct WhisperCppModel {
    context: WhisperContext,
}

impl SpeechModel for WhisperCppModel {
    fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
    ) -> Result<RawTranscript, AudioError> {
        let samples = wav::read_mono_f32(audio)?;

        let mut state = self
            .context
            .create_state()
            .map_err(|e| AudioError::Model(format!("failed to create decoding state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(language);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        state
            .full(params, &samples)
            .map_err(|e| AudioError::Model(format!("transcription failed: {e}")))?;

        let segments = state
            .full_n_segments()
            .map_err(|e| AudioError::Model(format!("failed to read segments: {e}")))?;

        let mut text = String::new();
        for i in 0..segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| AudioError::Model(format!("failed to read segment {i}: {e}")))?;
            text.push_str(&segment);
        }

        let mut extra = HashMap::new();
        extra.insert("segments".to_string(), json!(segments));
        if let Some(language) = language {
            extra.insert("language".to_string(), json!(language));
        }

        Ok(RawTranscript {
            text: text.trim().to_string(),
            extra,
        })
    }
}
