//! Whisper transcription component
//!
//! The execution mode is chosen once at construction from the model
//! identifier and never changes: recognized remote models call the API,
//! recognized local models run against a lazily loaded model handle.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use uuid::Uuid;

use docpipe_core::Document;

use crate::remote::RemoteWhisperClient;
use crate::AudioError;

/// Model identifiers served by the remote API
pub const REMOTE_MODELS: &[&str] = &["whisper-1"];

/// Model identifiers loadable locally
pub const LOCAL_MODELS: &[&str] = &[
    "tiny", "tiny.en", "base", "base.en", "small", "small.en", "medium", "medium.en", "large",
    "large-v2", "large-v3",
];

/// Compute device for local inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

/// Raw output of a transcription call, before document wrapping
#[derive(Debug, Clone)]
pub struct RawTranscript {
    /// Transcribed text
    pub text: String,
    /// Any other fields the backend returned alongside the text
    pub extra: HashMap<String, serde_json::Value>,
}

/// Loads a local speech model onto a device
pub trait ModelLoader: Send + Sync {
    fn load(&self, model: &str, device: &Device) -> Result<Box<dyn SpeechModel>, AudioError>;
}

/// A loaded local speech model
pub trait SpeechModel: Send + Sync {
    fn transcribe(&self, audio: &Path, language: Option<&str>)
        -> Result<RawTranscript, AudioError>;
}

/// Transcriber configuration
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Model identifier; decides the execution mode
    pub model: String,
    /// API credential, required for remote models
    pub api_key: Option<String>,
    /// Remote transcription endpoint
    pub api_url: String,
    /// Device for local inference
    pub device: Device,
    /// Directory holding local model files
    pub model_dir: PathBuf,
    /// Language hint passed to the backend
    pub language: Option<String>,
    /// Request timeout in milliseconds (remote mode)
    pub timeout_ms: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            api_key: None,
            api_url: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            device: Device::Cpu,
            model_dir: PathBuf::from("models/whisper"),
            language: None,
            timeout_ms: 30_000,
        }
    }
}

struct LocalModel {
    model: String,
    device: Device,
    loader: Arc<dyn ModelLoader>,
    slot: OnceCell<Box<dyn SpeechModel>>,
}

enum Backend {
    Remote(RemoteWhisperClient),
    Local(LocalModel),
}

/// A component transcribing audio files into documents
pub struct WhisperTranscriber {
    backend: Backend,
    language: Option<String>,
}

impl fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("model", &self.model_name())
            .field("is_local", &self.is_local())
            .field("is_warm", &self.is_warm())
            .field("language", &self.language)
            .finish()
    }
}

impl WhisperTranscriber {
    /// Create a transcriber, selecting the execution mode from the
    /// configured model identifier
    ///
    /// Remote models need `api_key`; local models need a speech backend
    /// (the `whisper-cpp` feature, or a loader injected via
    /// [`with_loader`](Self::with_loader)). Unrecognized identifiers
    /// fail.
    pub fn new(config: WhisperConfig) -> Result<Self, AudioError> {
        if LOCAL_MODELS.contains(&config.model.as_str()) {
            let loader = default_loader(&config)?;
            return Self::with_loader(config, loader);
        }
        Self::build(config, None)
    }

    /// Create a local-mode transcriber with an explicit model loader
    pub fn with_loader(
        config: WhisperConfig,
        loader: Arc<dyn ModelLoader>,
    ) -> Result<Self, AudioError> {
        if !LOCAL_MODELS.contains(&config.model.as_str()) {
            return Err(AudioError::Config(format!(
                "model '{}' is not a local model, so a loader does not apply",
                config.model
            )));
        }
        Self::build(config, Some(loader))
    }

    fn build(config: WhisperConfig, loader: Option<Arc<dyn ModelLoader>>) -> Result<Self, AudioError> {
        let backend = if REMOTE_MODELS.contains(&config.model.as_str()) {
            let api_key = config
                .api_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    AudioError::Config(format!(
                        "model '{}' runs against the remote API and needs an API key",
                        config.model
                    ))
                })?;
            Backend::Remote(RemoteWhisperClient::new(
                api_key,
                &config.model,
                &config.api_url,
                config.timeout_ms,
            )?)
        } else if LOCAL_MODELS.contains(&config.model.as_str()) {
            // with_loader validated this arm always has a loader
            let loader = loader.ok_or_else(|| {
                AudioError::Config("local mode needs a model loader".to_string())
            })?;
            Backend::Local(LocalModel {
                model: config.model,
                device: config.device,
                loader,
                slot: OnceCell::new(),
            })
        } else {
            return Err(AudioError::Config(format!(
                "model '{}' is not recognized",
                config.model
            )));
        };

        Ok(Self {
            backend,
            language: config.language,
        })
    }

    /// The configured model identifier
    pub fn model_name(&self) -> &str {
        match &self.backend {
            Backend::Remote(client) => client.model(),
            Backend::Local(local) => &local.model,
        }
    }

    /// Whether this instance runs a locally loaded model
    pub fn is_local(&self) -> bool {
        matches!(self.backend, Backend::Local(_))
    }

    /// Whether the local model has been loaded yet
    ///
    /// Always false in remote mode.
    pub fn is_warm(&self) -> bool {
        match &self.backend {
            Backend::Remote(_) => false,
            Backend::Local(local) => local.slot.get().is_some(),
        }
    }

    /// Load the local model if it has not been loaded yet
    ///
    /// Idempotent: the loader runs at most once per instance, also under
    /// concurrent callers. A no-op in remote mode.
    pub fn warm_up(&self) -> Result<(), AudioError> {
        match &self.backend {
            Backend::Remote(_) => Ok(()),
            Backend::Local(local) => local
                .slot
                .get_or_try_init(|| {
                    tracing::info!(
                        model = %local.model,
                        device = %local.device,
                        "loading local transcription model"
                    );
                    local.loader.load(&local.model, &local.device)
                })
                .map(|_| ()),
        }
    }

    /// Transcribe each audio file, in order, into a document
    ///
    /// `content` is the transcribed text; `metadata` is the audio source
    /// path plus every other field the backend returned. Backend errors
    /// propagate unchanged and abort the whole batch.
    pub fn transcribe_to_documents(
        &self,
        audio_files: &[PathBuf],
    ) -> Result<Vec<Document>, AudioError> {
        self.warm_up()?;

        let mut documents = Vec::with_capacity(audio_files.len());
        for audio in audio_files {
            let raw = match &self.backend {
                Backend::Remote(client) => client.transcribe(audio)?,
                Backend::Local(local) => {
                    let model = local.slot.get().ok_or_else(|| {
                        AudioError::Model("model slot is empty after warm-up".to_string())
                    })?;
                    model.transcribe(audio, self.language.as_deref())?
                }
            };

            tracing::debug!(audio = %audio.display(), chars = raw.text.len(), "transcribed");

            let mut document = Document::new(Uuid::new_v4().to_string(), raw.text)
                .with_metadata("audio_file", audio.to_string_lossy().to_string());
            document.metadata.extend(raw.extra);
            documents.push(document);
        }
        Ok(documents)
    }
}

#[cfg(feature = "whisper-cpp")]
fn default_loader(config: &WhisperConfig) -> Result<Arc<dyn ModelLoader>, AudioError> {
    Ok(Arc::new(crate::whisper_cpp::WhisperCppLoader::new(
        config.model_dir.clone(),
    )))
}

#[cfg(not(feature = "whisper-cpp"))]
fn default_loader(config: &WhisperConfig) -> Result<Arc<dyn ModelLoader>, AudioError> {
    Err(AudioError::Config(format!(
        "local model '{}' needs a speech backend: enable the `whisper-cpp` feature or inject a loader",
        config.model
    )))
}
