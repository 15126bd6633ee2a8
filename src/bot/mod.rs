//! Bot core - turns task descriptions (text or voice) into engineered prompts.

pub mod message;
pub mod messenger;
pub mod prompts;
pub mod router;
pub mod synthesis;
pub mod transcription;


pub use message::{Command, IncomingMessage, MessageKind};
pub use messenger::{Messenger, Rendering, TelegramClient};
pub use router::Router;
pub use synthesis::{PromptSynthesizer, Synthesizer};
pub use transcription::{Transcriber, WhisperTranscriber};
