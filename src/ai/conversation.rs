use std::sync::Arc;

use log::warn;

use super::{
    api::{
        Content,
        ContentProvider,
    },
    set_degraded_mode,
};
use crate::core::LanguageConfig;

pub const APOLOGY: &str =
    "Sorry, I could not reach the tutoring service just now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    fn wire_name(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// A tutoring conversation. The service is stateless across calls, so every
/// turn resends the whole transcript; conversational memory lives here.
pub struct Conversation {
    provider: Arc<ContentProvider>,
    system_prompt: String,
    transcript: Vec<ChatTurn>,
}

impl Conversation {
    pub fn open(provider: Arc<ContentProvider>, languages: &LanguageConfig) -> Self {
        let system_prompt = format!(
            "You are a friendly {learning} tutor. The learner speaks {known} and is \
             practicing {learning}. Keep replies short, stay in {learning} where \
             possible, and gently correct mistakes.",
            known = languages.known,
            learning = languages.learning,
        );

        Self { provider, system_prompt, transcript: Vec::new() }
    }

    /// Send one message and return the tutor's reply. On a provider error the
    /// reply is an apology and neither the failed user turn nor any synthetic
    /// error turn is recorded, so a retry resends the same prior context.
    pub async fn send(&mut self, message: &str) -> String {
        let mut contents: Vec<Content> = self
            .transcript
            .iter()
            .map(|turn| Content::new(turn.role.wire_name(), turn.text.clone()))
            .collect();
        contents.push(Content::new("user", message.to_string()));

        match self.provider.send_chat(&self.system_prompt, contents).await {
            Ok(reply) => {
                set_degraded_mode(false);
                self.transcript.push(ChatTurn { role: ChatRole::User, text: message.to_string() });
                self.transcript.push(ChatTurn { role: ChatRole::Assistant, text: reply.clone() });
                reply
            }
            Err(error) => {
                warn!("conversation turn failed: {}", error);
                set_degraded_mode(true);
                APOLOGY.to_string()
            }
        }
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::api::DEFAULT_MODEL;

    fn offline_conversation() -> Conversation {
        let provider = Arc::new(ContentProvider::new(None, DEFAULT_MODEL));
        Conversation::open(provider, &LanguageConfig::default())
    }

    #[tokio::test]
    async fn test_failed_turn_apologizes_and_keeps_history_clean() {
        let mut conversation = offline_conversation();

        let reply = conversation.send("Cześć!").await;
        assert_eq!(reply, APOLOGY);
        assert!(conversation.transcript().is_empty());

        // A retry starts from the same (empty) context.
        let reply = conversation.send("Cześć?").await;
        assert_eq!(reply, APOLOGY);
        assert!(conversation.transcript().is_empty());
    }

    #[test]
    fn test_persona_names_the_language_pair() {
        let conversation = offline_conversation();
        assert!(conversation.system_prompt.contains("Polish"));
        assert!(conversation.system_prompt.contains("English"));
    }
}
