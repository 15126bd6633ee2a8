//! Inbound message model and the bot's command surface.

use teloxide::types::{Message, MessageEntity, MessageEntityKind};
use teloxide::utils::command::BotCommands;

/// Commands shown in the Telegram command menu.
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "показать приветствие")]
    Start,
    #[command(description = "как правильно описать задачу")]
    Help,
    #[command(description = "пример работы бота")]
    Example,
}

/// What the user sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Command(Command),
    Text(String),
    Voice { file_id: String },
}

/// One inbound message, alive only while it is being handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub kind: MessageKind,
}

impl IncomingMessage {
    /// Convert a Telegram message. Returns `None` for kinds the bot ignores.
    pub fn from_telegram(msg: &Message, bot_name: &str) -> Option<Self> {
        let kind = if let Some(voice) = msg.voice() {
            MessageKind::Voice { file_id: voice.file.id.0.clone() }
        } else {
            let is_command = msg.entities().is_some_and(starts_with_bot_command);
            classify_text(msg.text()?, is_command, bot_name)?
        };

        let user = msg.from.as_ref();
        let user_id = user.map(|u| u.id.0 as i64).unwrap_or(0);
        let username = user
            .and_then(|u| u.username.as_deref())
            .unwrap_or_else(|| user.map(|u| u.first_name.as_str()).unwrap_or("unknown"))
            .to_string();

        Some(Self { chat_id: msg.chat.id.0, user_id, username, kind })
    }
}

/// Whether Telegram marked the message as opening with a bot command.
pub fn starts_with_bot_command(entities: &[MessageEntity]) -> bool {
    entities
        .iter()
        .any(|e| e.offset == 0 && matches!(e.kind, MessageEntityKind::BotCommand))
}

/// Split text into a known command or free text.
///
/// Only text Telegram flagged as a bot command is parsed as one; unknown
/// commands yield `None`. With no known bot name, `/cmd@name` is accepted
/// for any `name`.
pub fn classify_text(text: &str, is_command: bool, bot_name: &str) -> Option<MessageKind> {
    if !is_command {
        return Some(MessageKind::Text(text.to_string()));
    }
    let bot_name = if bot_name.is_empty() { addressed_bot(text).unwrap_or("") } else { bot_name };
    Command::parse(text, bot_name).ok().map(MessageKind::Command)
}

fn addressed_bot(text: &str) -> Option<&str> {
    text.split_whitespace().next()?.split_once('@').map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands() {
        assert_eq!(classify_text("/start", true, "promptbot"), Some(MessageKind::Command(Command::Start)));
        assert_eq!(classify_text("/help", true, "promptbot"), Some(MessageKind::Command(Command::Help)));
        assert_eq!(classify_text("/example", true, "promptbot"), Some(MessageKind::Command(Command::Example)));
    }

    #[test]
    fn test_command_addressed_to_bot() {
        assert_eq!(
            classify_text("/help@promptbot", true, "promptbot"),
            Some(MessageKind::Command(Command::Help))
        );
    }

    #[test]
    fn test_addressed_command_without_known_bot_name() {
        assert_eq!(
            classify_text("/start@promptbot", true, ""),
            Some(MessageKind::Command(Command::Start))
        );
    }

    #[test]
    fn test_command_for_other_bot_ignored() {
        assert_eq!(classify_text("/start@otherbot", true, "promptbot"), None);
    }

    #[test]
    fn test_slash_prefixed_task_is_text() {
        let task = "/ напиши промпт для поста про путешествия";
        assert_eq!(classify_text(task, false, "promptbot"), Some(MessageKind::Text(task.to_string())));
    }

    #[test]
    fn test_command_entity_detection() {
        let command = MessageEntity::new(MessageEntityKind::BotCommand, 0, 6);
        let later_command = MessageEntity::new(MessageEntityKind::BotCommand, 8, 5);
        let bold = MessageEntity::new(MessageEntityKind::Bold, 0, 4);

        assert!(starts_with_bot_command(&[command]));
        assert!(!starts_with_bot_command(&[later_command]));
        assert!(!starts_with_bot_command(&[bold]));
        assert!(!starts_with_bot_command(&[]));
    }

    #[test]
    fn test_unknown_command_ignored() {
        assert_eq!(classify_text("/settings", true, "promptbot"), None);
    }

    #[test]
    fn test_plain_text_kept_verbatim() {
        assert_eq!(
            classify_text("  Write me a prompt  ", false, "promptbot"),
            Some(MessageKind::Text("  Write me a prompt  ".to_string()))
        );
    }

    #[test]
    fn test_menu_lists_all_commands() {
        let names: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert_eq!(names, vec!["start", "help", "example"]);
    }
}
