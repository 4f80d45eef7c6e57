//! One conversation turn end to end: policy check, completion, translation,
//! then recording both sides in the history.

mod chat;
mod translation;

pub use chat::{ChatClient, RequestContext};
pub use translation::{TranslationClient, TRANSLATION_FAILED};

use crate::config::Settings;
use crate::context::system_prompt::{TranslationPrompt, TUTOR_SYSTEM_PROMPT};
use crate::context::{ConversationHistory, HistoryStats, TurnRole};
use crate::error::Result;
use crate::llm::LlmClient;
use crate::policy::{ContentPolicy, KeywordFilter};
use std::sync::Arc;

pub const CONNECTION_FALLBACK: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment.";
pub const CONNECTION_FALLBACK_TRANSLATED: &str = "抱歉，我现在连接有问题。请稍后再试。";
pub const TRANSLATION_DISABLED: &str = "翻译功能已禁用";

/// Where a turn currently is. Every turn starts and ends in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingPolicyCheck,
    AwaitingCompletion,
    AwaitingTranslation,
    Recorded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model answered.
    Answered,
    /// Input matched the content policy; no request was made.
    Redirected,
    /// The completion call failed and the canned apology was used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// English reply, also what gets recorded in the history.
    pub primary: String,
    /// Reply in the translation language, or a notice.
    pub secondary: String,
    pub outcome: TurnOutcome,
}

/// Fixed texts substituted when a call fails or translation is off.
#[derive(Debug, Clone)]
struct CannedReplies {
    connection_failed: String,
    connection_failed_translated: String,
    translation_disabled: String,
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self {
            connection_failed: CONNECTION_FALLBACK.to_string(),
            connection_failed_translated: CONNECTION_FALLBACK_TRANSLATED.to_string(),
            translation_disabled: TRANSLATION_DISABLED.to_string(),
        }
    }
}

pub struct Session {
    policy: Box<dyn ContentPolicy>,
    history: ConversationHistory,
    chat: ChatClient,
    translator: Option<TranslationClient>,
    system_prompt: String,
    recent_history_count: usize,
    replies: CannedReplies,
    state: TurnState,
}

impl Session {
    /// Wire a session from settings. Translation shares the chat transport.
    pub fn new(settings: &Settings, llm: Arc<dyn LlmClient>, history: ConversationHistory) -> Self {
        let chat = ChatClient::new(llm);
        let translator = settings.conversation.enable_translation.then(|| {
            TranslationClient::new(chat.clone())
                .with_prompt(TranslationPrompt::from_language_tag(&settings.ui.language))
        });

        Self {
            policy: Box::new(KeywordFilter::from_settings(&settings.filter)),
            history,
            chat,
            translator,
            system_prompt: TUTOR_SYSTEM_PROMPT.to_string(),
            recent_history_count: settings.conversation.recent_history_count,
            replies: CannedReplies::default(),
            state: TurnState::Idle,
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn ContentPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_translator(mut self, translator: Option<TranslationClient>) -> Self {
        self.translator = translator;
        self
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn translation_enabled(&self) -> bool {
        self.translator.is_some()
    }

    /// Turns sent as context: `recent_history_count` exchanges of two turns
    /// each. A redirected turn still counts as a pair, so the boundary can
    /// fall between a user turn and its reply.
    pub fn window_size(&self) -> usize {
        self.recent_history_count.saturating_mul(2)
    }

    /// Run one turn. Never fails: transport errors become canned replies and
    /// persistence errors are logged by the history.
    pub async fn turn(&mut self, input: &str) -> TurnReply {
        enter(&mut self.state, TurnState::AwaitingPolicyCheck);
        if self.policy.is_blocked(input) {
            tracing::info!("Input matched the content policy; skipping completion");
            let reply = TurnReply {
                primary: self.policy.redirect_message().to_string(),
                secondary: self.policy.redirect_message_translated().to_string(),
                outcome: TurnOutcome::Redirected,
            };
            return self.record(input, reply);
        }

        enter(&mut self.state, TurnState::AwaitingCompletion);
        let window = self.history.window(self.window_size());
        let context = RequestContext::new(&self.system_prompt, window, input);

        let reply = match self.chat.complete_context(&context).await {
            Ok(english) => {
                let secondary = match &self.translator {
                    Some(translator) => {
                        enter(&mut self.state, TurnState::AwaitingTranslation);
                        translator.translate(&english).await
                    }
                    None => self.replies.translation_disabled.clone(),
                };
                TurnReply {
                    primary: english,
                    secondary,
                    outcome: TurnOutcome::Answered,
                }
            }
            Err(e) => {
                tracing::warn!("Completion failed, using fallback reply: {}", e);
                TurnReply {
                    primary: self.replies.connection_failed.clone(),
                    secondary: self.replies.connection_failed_translated.clone(),
                    outcome: TurnOutcome::Fallback,
                }
            }
        };

        self.record(input, reply)
    }

    pub fn save_history(&self) -> Result<()> {
        self.history.save()
    }

    /// Destructive: empties the history and deletes its file.
    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }

    fn record(&mut self, input: &str, reply: TurnReply) -> TurnReply {
        enter(&mut self.state, TurnState::Recorded);
        self.history.append(TurnRole::User, input);
        self.history.append(TurnRole::Assistant, reply.primary.clone());
        enter(&mut self.state, TurnState::Idle);
        reply
    }
}

fn enter(state: &mut TurnState, next: TurnState) {
    tracing::debug!("turn state {:?} -> {:?}", state, next);
    *state = next;
}
