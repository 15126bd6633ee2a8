//! Message router: dispatches each inbound message to its handler.
//!
//! Every handler sends at most one final reply. Adapter failures stop at the
//! handler boundary, where they are logged and turned into a fixed apology.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::bot::message::{Command, IncomingMessage, MessageKind};
use crate::bot::messenger::{Messenger, Rendering};
use crate::bot::prompts;
use crate::bot::synthesis::Synthesizer;
use crate::bot::transcription::{Transcriber, TranscriptionError};
use crate::openai;

/// Minimum trimmed length of a usable task description.
pub const MIN_TASK_CHARS: usize = 5;

/// Failure inside one handler invocation.
#[derive(Debug)]
pub enum HandlerError {
    Download(String),
    Transcription(TranscriptionError),
    Synthesis(openai::Error),
}

impl HandlerError {
    /// The apology shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Download(_) | Self::Transcription(_) => prompts::VOICE_FAILED,
            Self::Synthesis(_) => prompts::SYNTHESIS_FAILED,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Download(e) => write!(f, "voice download failed: {e}"),
            Self::Transcription(e) => write!(f, "{e}"),
            Self::Synthesis(e) => write!(f, "prompt synthesis failed: {e}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Download(_) => None,
            Self::Transcription(e) => Some(e),
            Self::Synthesis(e) => Some(e),
        }
    }
}

/// Return the trimmed task if it is long enough to work with.
pub fn validate_task(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (trimmed.chars().count() >= MIN_TASK_CHARS).then_some(trimmed)
}

/// Cap a reply at `MAX_REPLY_CHARS`, appending the truncation marker if cut.
pub fn truncate_reply(text: &str) -> String {
    match text.char_indices().nth(prompts::MAX_REPLY_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], prompts::TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

pub struct Router {
    messenger: Arc<dyn Messenger>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl Router {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            messenger,
            transcriber,
            synthesizer,
        }
    }

    pub async fn handle(&self, msg: IncomingMessage) {
        let chat_id = msg.chat_id;
        match msg.kind {
            MessageKind::Command(command) => {
                info!("⌨️ /{} from {} ({})", format!("{command:?}").to_lowercase(), msg.username, msg.user_id);
                self.on_command(chat_id, command).await;
            }
            MessageKind::Text(text) => {
                let preview: String = text.chars().take(100).collect();
                info!("📨 Text from {} ({}): \"{}\"", msg.username, msg.user_id, preview);
                self.on_text(chat_id, &text).await;
            }
            MessageKind::Voice { file_id } => {
                info!("🎤 Voice from {} ({})", msg.username, msg.user_id);
                self.on_voice(chat_id, &file_id).await;
            }
        }
    }

    /// Handle `msg` on its own task so a panic is logged with the update
    /// instead of unwinding into the dispatcher. No reply is sent for it.
    pub async fn handle_isolated(self: &Arc<Self>, msg: IncomingMessage) {
        let router = Arc::clone(self);
        let summary = format!("{:?}", msg);
        if let Err(e) = tokio::spawn(async move { router.handle(msg).await }).await {
            error!("Update {} caused error: {}", summary, e);
        }
    }

    /// Reply with the canned text for a command.
    pub async fn on_command(&self, chat_id: i64, command: Command) {
        let (text, rendering) = match command {
            Command::Start => (prompts::WELCOME, Rendering::Plain),
            Command::Help => (prompts::HELP, Rendering::Markdown),
            Command::Example => (prompts::EXAMPLE, Rendering::Markdown),
        };
        self.send(chat_id, text, rendering).await;
    }

    pub async fn on_text(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.text_pipeline(chat_id, text).await {
            self.report_failure(chat_id, "creating prompt", &e).await;
        }
    }

    pub async fn on_voice(&self, chat_id: i64, file_id: &str) {
        if let Err(e) = self.voice_pipeline(chat_id, file_id).await {
            self.report_failure(chat_id, "processing voice message", &e).await;
        }
    }

    async fn text_pipeline(&self, chat_id: i64, text: &str) -> Result<(), HandlerError> {
        let Some(task) = validate_task(text) else {
            info!("Task too short in chat {}, asking for detail", chat_id);
            self.send(chat_id, prompts::TOO_SHORT, Rendering::Plain).await;
            return Ok(());
        };

        self.send(chat_id, prompts::WORKING, Rendering::Plain).await;
        let result = self.synthesizer.synthesize(task).await.map_err(HandlerError::Synthesis)?;
        self.deliver(chat_id, &result).await;
        Ok(())
    }

    async fn voice_pipeline(&self, chat_id: i64, file_id: &str) -> Result<(), HandlerError> {
        self.send(chat_id, prompts::TRANSCRIBING, Rendering::Plain).await;

        let audio = self.messenger.download_file(file_id).await.map_err(HandlerError::Download)?;
        let transcript = self
            .transcriber
            .transcribe(&audio)
            .await
            .map_err(HandlerError::Transcription)?;

        let Some(task) = validate_task(&transcript.text) else {
            info!("Transcript unusable in chat {}: {:?}", chat_id, transcript.text);
            self.send(chat_id, prompts::TRANSCRIPT_UNUSABLE, Rendering::Plain).await;
            return Ok(());
        };

        self.send(chat_id, &prompts::transcript_echo(task), Rendering::Plain).await;
        let result = self.synthesizer.synthesize(task).await.map_err(HandlerError::Synthesis)?;
        self.deliver(chat_id, &result).await;
        Ok(())
    }

    /// Send the generated text as rich text, falling back to plain if Telegram rejects the markup.
    async fn deliver(&self, chat_id: i64, result: &str) {
        let reply = truncate_reply(result);
        if self
            .messenger
            .send_text(chat_id, &reply, Rendering::Markdown)
            .await
            .is_err()
        {
            warn!("Markdown reply rejected in chat {}, resending as plain text", chat_id);
            self.send(chat_id, &reply, Rendering::Plain).await;
        }
    }

    async fn report_failure(&self, chat_id: i64, action: &str, err: &HandlerError) {
        error!("Error {} in chat {}: {} ({:?})", action, chat_id, err, err);
        self.send(chat_id, err.user_message(), Rendering::Plain).await;
    }

    /// Fire-and-forget send; the messenger already logs failures.
    async fn send(&self, chat_id: i64, text: &str, rendering: Rendering) {
        let _ = self.messenger.send_text(chat_id, text, rendering).await;
    }
}
