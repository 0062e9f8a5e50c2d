//! Render commands emitted by the game state machine.
//!
//! The state machine never touches the terminal. It describes what the
//! screen should show and a renderer interprets these commands.

use serde::{Deserialize, Serialize};

use crate::level::LevelButton;

/// Who a transcript entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    Success,
    Error,
    /// Neutral notices: level loading and the fallback level intro.
    System,
}

/// One chat transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    /// Overrides the default role label (e.g. "Level 2 AI").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            heading: None,
            content: content.into(),
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(Role::Success, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Error, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Action controls that are disabled while their request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Send,
    Submit,
}

impl Control {
    pub fn label(self, busy: bool) -> &'static str {
        match (self, busy) {
            (Control::Send, false) => "Send Message",
            (Control::Send, true) => "Sending...",
            (Control::Submit, false) => "Submit Password",
            (Control::Submit, true) => "Checking...",
        }
    }
}

/// Text inputs the state machine may clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputField {
    Message,
    Password,
}

/// Result of the last health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// Server up and its model backend reachable.
    Connected,
    /// Server answered but reports the model backend as unreachable.
    Disconnected,
    /// Server unreachable or answered garbage.
    Error,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RenderCommand {
    /// Current level indicator.
    SetLevelLabel(u32),
    /// Number of completed levels.
    SetCompletedCount(u32),
    /// Lock/active state of every level selector.
    SetLevelButtons(Vec<LevelButton>),
    /// Empty the chat transcript.
    ClearTranscript,
    /// Append one entry to the chat transcript.
    Append(TranscriptEntry),
    /// Modal notice for rejected input.
    Alert(String),
    /// Ask the player to confirm starting over.
    ConfirmReset,
    /// Enable or disable an action control.
    SetControl { control: Control, busy: bool },
    /// Empty a text input.
    ClearInput(InputField),
    /// Connection indicator.
    SetConnection(ConnectionStatus),
}
