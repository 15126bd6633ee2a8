//! Speech-to-text for voice messages via the hosted Whisper endpoint.
//!
//! The audio is written to a named temp file that lives exactly as long as
//! the upload; dropping the handle removes it on every exit path.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::openai;

/// Recognized text plus whatever metadata the service returned.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub text: String,
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
}

#[derive(Debug)]
pub enum TranscriptionError {
    TempFile(std::io::Error),
    Service(openai::Error),
}

impl fmt::Display for TranscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TempFile(e) => write!(f, "failed to stage audio: {e}"),
            Self::Service(e) => write!(f, "transcription service failed: {e}"),
        }
    }
}

impl std::error::Error for TranscriptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TempFile(e) => Some(e),
            Self::Service(e) => Some(e),
        }
    }
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<TranscriptionResult, TranscriptionError>;
}

/// Transcriber backed by the OpenAI audio API.
pub struct WhisperTranscriber {
    client: Arc<openai::Client>,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(client: Arc<openai::Client>, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<TranscriptionResult, TranscriptionError> {
        debug!("Transcribing {} bytes of audio", audio.len());
        let result = with_scoped_audio(audio, |path| async move {
            self.client
                .transcribe_file(&path, &self.model)
                .await
                .map_err(TranscriptionError::Service)
        })
        .await?;

        info!("Transcribed: \"{}\"", truncate(&result.text, 100));
        Ok(TranscriptionResult {
            text: result.text,
            language: result.language,
            duration_secs: result.duration,
        })
    }
}

/// Stage `audio` in a `.ogg` temp file, run `f` against its path, then remove it.
pub async fn with_scoped_audio<F, Fut, T>(audio: &[u8], f: F) -> Result<T, TranscriptionError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T, TranscriptionError>>,
{
    let file = tempfile::Builder::new()
        .prefix("voice_")
        .suffix(".ogg")
        .tempfile()
        .map_err(TranscriptionError::TempFile)?;
    tokio::fs::write(file.path(), audio)
        .await
        .map_err(TranscriptionError::TempFile)?;

    // `file` is dropped (and unlinked) when this scope ends, whatever `f` returned.
    f(file.path().to_path_buf()).await
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
