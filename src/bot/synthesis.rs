//! Prompt synthesis through the chat-completion API.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::bot::prompts;
use crate::openai::{self, ChatMessage};

/// The two-message request sent for every task. Built fresh each time.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub system: &'static str,
    pub user: String,
}

impl SynthesisRequest {
    pub fn for_task(task: &str) -> Self {
        Self {
            system: prompts::SYSTEM_PROMPT,
            user: prompts::user_instruction(task),
        }
    }

    pub fn messages(&self) -> [ChatMessage; 2] {
        [ChatMessage::system(self.system), ChatMessage::user(self.user.clone())]
    }
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, task: &str) -> Result<String, openai::Error>;
}

/// Synthesizer backed by an OpenAI chat model.
pub struct PromptSynthesizer {
    client: Arc<openai::Client>,
    model: String,
    max_completion_tokens: u32,
}

impl PromptSynthesizer {
    pub fn new(client: Arc<openai::Client>, model: impl Into<String>, max_completion_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_completion_tokens,
        }
    }
}

#[async_trait]
impl Synthesizer for PromptSynthesizer {
    async fn synthesize(&self, task: &str) -> Result<String, openai::Error> {
        let request = SynthesisRequest::for_task(task);
        let text = self
            .client
            .chat_completion(&self.model, &request.messages(), self.max_completion_tokens)
            .await?;
        info!("🧠 Synthesized {} chars with {}", text.chars().count(), self.model);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::Role;

    #[test]
    fn test_request_embeds_task_verbatim() {
        let request = SynthesisRequest::for_task("Write me a prompt for a travel blog");
        let [system, user] = request.messages();

        assert_eq!(system.role, Role::System);
        assert_eq!(system.content, prompts::SYSTEM_PROMPT);
        assert_eq!(user.role, Role::User);
        assert!(user.content.ends_with("Write me a prompt for a travel blog"));
        assert!(user.content.starts_with(prompts::USER_INSTRUCTION_PREFIX));
    }

    #[test]
    fn test_system_prompt_names_all_sections() {
        for section in ["Анализ задачи", "Готовый промпт", "Структура промпта", "Советы по использованию"] {
            assert!(prompts::SYSTEM_PROMPT.contains(section), "missing section {section}");
        }
        assert!(prompts::SYSTEM_PROMPT.contains("Отвечай на русском языке"));
    }
}
