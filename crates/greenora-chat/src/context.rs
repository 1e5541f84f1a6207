//! Conversation topic tracking.
//!
//! A single slot holding the most recent inferred topic. Utterances that
//! match no topic keywords leave the slot untouched.

use tracing::debug;

use crate::types::Topic;

pub const EXPORT_KEYWORDS: &[&str] = &["export", "business", "market"];
pub const GROWING_KEYWORDS: &[&str] = &["grow", "plant", "cultivat"];
pub const HEALTH_KEYWORDS: &[&str] = &["benefit", "medicinal", "health"];

/// Topic classification table, first match wins.
const TOPIC_RULES: &[(Topic, &[&str])] = &[
    (Topic::Export, EXPORT_KEYWORDS),
    (Topic::Growing, GROWING_KEYWORDS),
    (Topic::Health, HEALTH_KEYWORDS),
];

/// Whether `text` contains any of `keywords` as a substring.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Infer a topic from a lowercased utterance.
///
/// `None` means "no opinion": the current topic should be kept.
pub fn classify(utterance_lower: &str) -> Option<Topic> {
    TOPIC_RULES
        .iter()
        .find(|(_, keywords)| contains_any(utterance_lower, keywords))
        .map(|(topic, _)| *topic)
}

/// Holds the active topic for one conversation.
#[derive(Debug, Clone, Default)]
pub struct ContextTracker {
    topic: Topic,
}

impl ContextTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic(topic: Topic) -> Self {
        Self { topic }
    }

    pub fn get(&self) -> Topic {
        self.topic
    }

    pub fn set(&mut self, topic: Topic) {
        self.topic = topic;
    }

    /// Classify `utterance_lower` and overwrite the topic on a match.
    ///
    /// Returns the new topic when it changed.
    pub fn observe(&mut self, utterance_lower: &str) -> Option<Topic> {
        let next = classify(utterance_lower)?;
        if next == self.topic {
            return None;
        }
        debug!(from = %self.topic, to = %next, "Conversation topic changed");
        self.topic = next;
        Some(next)
    }
}
