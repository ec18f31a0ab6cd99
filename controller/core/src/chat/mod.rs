//! EcoBot Chat Responder
//!
//! A keyword chatbot: no model, no network. A message is lowercased and run
//! through the ordered [`rules::RULES`]; if none matches, the fallback
//! [`keywords::KEYWORD_TABLE`] is scanned; if that misses too, a help
//! message is returned whose wording depends on whether the user has
//! already asked about recycling something.
//!
//! The responder is a pure function of `(message, context, rng)`. The only
//! randomness is the pick among equivalent greeting/thanks replies.

pub mod keywords;
pub mod rules;
mod transcript;

pub use transcript::{ChatMessage, ChatSender, ChatTranscript, QUICK_ACTIONS};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use rules::{Reply, RULES};

/// Help prompt once the user has asked about a recyclable item
pub const NARROW_PROMPT: &str = "🤔 Hmm, I'm not sure about that specific item. But I can tell you about:\n• Batteries & power banks 🔋\n• Phones & laptops 📱\n• How to find centers 📍\n• Earning rewards ⭐\n\nWhat interests you most?";

/// Help prompt for everything else
pub const WELCOME_PROMPT: &str = "🤔 I'm here to help with recycling questions! Try asking:\n• 'What can I recycle?'\n• 'Where is the nearest center?'\n• 'How do I earn points?'\n• 'Is it safe?'\n\nI'm learning to be more helpful! 🌱";

/// Conversation topic remembered between turns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Small talk opener
    Greeting,
    /// Safety of recycling
    Safety,
    /// Battery recycling
    Batteries,
    /// Directions to the nearest center (ordered rule)
    NearestCenter,
    /// Directions to the nearest center (keyword table)
    Nearest,
    /// Eco Points
    Points,
    /// Phone recycling
    Phone,
    /// Laptop recycling
    Laptop,
    /// How the process works
    Process,
    /// What is accepted
    AcceptedItems,
    /// Human support
    Contact,
}

impl Topic {
    /// Wire/log name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Safety => "safety",
            Self::Batteries => "batteries",
            Self::NearestCenter => "nearest_center",
            Self::Nearest => "nearest",
            Self::Points => "points",
            Self::Phone => "phone",
            Self::Laptop => "laptop",
            Self::Process => "process",
            Self::AcceptedItems => "accepted_items",
            Self::Contact => "contact",
        }
    }
}

/// What the bot remembers about the conversation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    /// Topic of the last answered question
    pub last_topic: Option<Topic>,
    /// Whether the user asked about recycling a specific item
    pub asked_about_recycling: bool,
}

/// Which part of the responder produced a reply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchSource {
    /// An ordered rule, by name
    Rule(&'static str),
    /// The fallback keyword table
    Keyword(Topic),
    /// Nothing matched
    Fallback,
}

/// One bot turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    /// Reply text
    pub response: String,
    /// Context after this turn
    pub context: ChatContext,
    /// What produced the reply
    pub source: MatchSource,
}

/// Stateless keyword responder
#[derive(Clone, Copy, Debug, Default)]
pub struct ChatResponder;

impl ChatResponder {
    /// Create a responder
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Answer a message using the thread-local RNG for random picks
    #[must_use]
    pub fn respond(&self, message: &str, context: &ChatContext) -> (String, ChatContext) {
        let turn = self.respond_with_rng(message, context, &mut rand::thread_rng());
        (turn.response, turn.context)
    }

    /// Answer a message with an explicit RNG
    pub fn respond_with_rng<R: Rng + ?Sized>(
        &self,
        message: &str,
        context: &ChatContext,
        rng: &mut R,
    ) -> ChatTurn {
        let lower = message.to_lowercase();
        let mut next = *context;

        if let Some(rule) = RULES.iter().find(|rule| rule.matcher.matches(&lower)) {
            let response = match rule.reply {
                Reply::Fixed(text) => text,
                Reply::Pick(options) => options.choose(rng).copied().unwrap_or_default(),
                Reply::FollowUp {
                    after,
                    then,
                    otherwise,
                } => {
                    if context.last_topic == Some(after) {
                        then
                    } else {
                        otherwise
                    }
                }
            };
            rule.update.apply(&mut next);
            tracing::debug!(rule = rule.name, "Chat rule matched");
            return ChatTurn {
                response: response.to_string(),
                context: next,
                source: MatchSource::Rule(rule.name),
            };
        }

        if let Some(entry) = keywords::lookup(&lower) {
            next.last_topic = Some(entry.topic);
            tracing::debug!(topic = entry.topic.as_str(), "Chat keyword matched");
            return ChatTurn {
                response: format!("{}{}", entry.response, keywords::FOLLOW_UP),
                context: next,
                source: MatchSource::Keyword(entry.topic),
            };
        }

        let response = if context.asked_about_recycling {
            NARROW_PROMPT
        } else {
            WELCOME_PROMPT
        };
        ChatTurn {
            response: response.to_string(),
            context: next,
            source: MatchSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn turn(message: &str, context: &ChatContext) -> ChatTurn {
        let mut rng = StdRng::seed_from_u64(7);
        ChatResponder::new().respond_with_rng(message, context, &mut rng)
    }

    #[test]
    fn test_battery_question() {
        let t = turn("Can I recycle batteries?", &ChatContext::default());
        assert_eq!(t.source, MatchSource::Rule("batteries"));
        assert_eq!(t.context.last_topic, Some(Topic::Batteries));
        assert!(t.context.asked_about_recycling);
    }

    #[test]
    fn test_greeting_sets_topic() {
        let t = turn("Hello!", &ChatContext::default());
        assert_eq!(t.source, MatchSource::Rule("greeting"));
        assert_eq!(t.context.last_topic, Some(Topic::Greeting));
        assert!(t.response.starts_with("H"));
    }

    #[test]
    fn test_thanks_leaves_context_unchanged() {
        let before = ChatContext {
            last_topic: Some(Topic::Laptop),
            asked_about_recycling: true,
        };
        let t = turn("thanks!", &before);
        assert_eq!(t.source, MatchSource::Rule("thanks"));
        assert_eq!(t.context, before);
    }

    #[test]
    fn test_affirmation_after_laptop_is_generic() {
        let first = turn("laptop", &ChatContext::default());
        assert_eq!(first.context.last_topic, Some(Topic::Laptop));

        let second = turn("yes", &first.context);
        assert_eq!(second.response, "Great! How else can I help you today? 😊");
    }

    #[test]
    fn test_affirmation_after_nearest_center_follows_up() {
        let first = turn("where is the closest one", &ChatContext::default());
        assert_eq!(first.context.last_topic, Some(Topic::NearestCenter));

        let second = turn("yes", &first.context);
        assert!(second.response.starts_with("Perfect! 🗺️"));
    }

    #[test]
    fn test_phone_number_goes_to_contact() {
        let t = turn("what is your phone number", &ChatContext::default());
        // "what" is checked before contact, so accepted items wins
        assert_eq!(t.source, MatchSource::Rule("accepted_items"));

        let t = turn("give me your phone number", &ChatContext::default());
        assert_eq!(t.source, MatchSource::Rule("contact"));
        assert_eq!(t.context.last_topic, Some(Topic::Contact));
    }

    #[test]
    fn test_keyword_table_fallback() {
        let t = turn("mobile number", &ChatContext::default());
        assert_eq!(t.source, MatchSource::Keyword(Topic::Phone));
        assert_eq!(t.context.last_topic, Some(Topic::Phone));
        assert!(t.response.ends_with(keywords::FOLLOW_UP));
    }

    #[test]
    fn test_unmatched_after_recycling_question_narrows() {
        let context = ChatContext {
            last_topic: Some(Topic::Batteries),
            asked_about_recycling: true,
        };
        let t = turn("zzz", &context);
        assert_eq!(t.source, MatchSource::Fallback);
        assert_eq!(t.response, NARROW_PROMPT);
    }

    #[test]
    fn test_unmatched_fresh_is_welcome() {
        let t = turn("zzz", &ChatContext::default());
        assert_eq!(t.response, WELCOME_PROMPT);
        assert_eq!(t.context, ChatContext::default());
    }

    #[test]
    fn test_respond_tuple_contract() {
        let (response, context) =
            ChatResponder::new().respond("Is it safe?", &ChatContext::default());
        assert!(response.starts_with("Great question!"));
        assert_eq!(context.last_topic, Some(Topic::Safety));
    }
}
