//! Remote transcription API client
//!
//! Blocking HTTP client keyed by credential + model name. The response
//! is a JSON object; the `text` field becomes the transcript and every
//! other field is passed through as metadata.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::transcriber::RawTranscript;
use crate::AudioError;

/// Client for a hosted transcription endpoint
pub struct RemoteWhisperClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    url: String,
}

impl RemoteWhisperClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        url: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, AudioError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AudioError::Api(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            url: url.into(),
        })
    }

    /// The model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Upload one audio file and return the raw transcription
    pub fn transcribe(&self, audio: &Path) -> Result<RawTranscript, AudioError> {
        let form = reqwest::blocking::multipart::Form::new()
            .text("model", self.model.clone())
            .file("file", audio)
            .map_err(|e| {
                AudioError::Audio(format!("failed to read {}: {}", audio.display(), e))
            })?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| AudioError::Api(format!("transcription request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AudioError::Api(format!(
                "transcription API returned {}",
                response.status()
            )));
        }

        let mut fields: HashMap<String, serde_json::Value> = response
            .json()
            .map_err(|e| AudioError::Api(format!("failed to parse transcription response: {e}")))?;

        let text = match fields.remove("text") {
            Some(serde_json::Value::String(text)) => text,
            Some(_) => {
                return Err(AudioError::Api(
                    "transcription response 'text' field is not a string".to_string(),
                ))
            }
            None => {
                return Err(AudioError::Api(
                    "transcription response has no 'text' field".to_string(),
                ))
            }
        };

        Ok(RawTranscript {
            text,
            extra: fields,
        })
    }
}
