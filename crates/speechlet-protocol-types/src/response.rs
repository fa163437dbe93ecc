//! Spoken responses returned by handlers.

use serde::{Deserialize, Serialize};

/// Text to speak, either plain or as SSML markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputSpeech {
    Plain { text: String },
    Ssml { ssml: String },
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        Self::Ssml { ssml: ssml.into() }
    }

    /// The raw speech content, whichever form it takes.
    pub fn content(&self) -> &str {
        match self {
            Self::Plain { text } => text,
            Self::Ssml { ssml } => ssml,
        }
    }
}

/// What the daemon answers for a `launch` or `intent` request.
///
/// `should_end_session` is authoritative: when true the connector closes the
/// session and no `session_ended` notification follows for this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub output_speech: OutputSpeech,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<OutputSpeech>,
    pub should_end_session: bool,
}

impl Response {
    /// A terminal response: speak the text and end the session.
    pub fn tell(text: impl Into<String>) -> Self {
        Self {
            output_speech: OutputSpeech::plain(text),
            reprompt: None,
            should_end_session: true,
        }
    }

    /// A prompting response: speak the text, keep the session open, and
    /// reprompt if the user stays silent.
    pub fn ask(text: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            output_speech: OutputSpeech::plain(text),
            reprompt: Some(OutputSpeech::plain(reprompt)),
            should_end_session: false,
        }
    }

    /// Spoken text of the primary output, mainly for logging and tests.
    pub fn speech_content(&self) -> &str {
        self.output_speech.content()
    }
}

// ============================================================================
// Tests
// ============================================================================
