//! Message shapes exchanged with the client and forwarded to inference.

use serde::{Deserialize, Serialize};

use crate::state::model_selection::ModelSelection;

/// Who wrote a chat message. Serialized as `0` (agent) or `1` (user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageKind {
    Agent,
    User,
}

impl TryFrom<u8> for MessageKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Agent),
            1 => Ok(Self::User),
            other => Err(format!("unknown message kind {other}")),
        }
    }
}

impl From<MessageKind> for u8 {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Agent => 0,
            MessageKind::User => 1,
        }
    }
}

/// Inbound chat message as sent by the client for inference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    #[serde(alias = "Kind")]
    pub kind: MessageKind,
    #[serde(alias = "Message")]
    pub message: String,
    /// Per-request model override
    #[serde(default, alias = "Model")]
    pub model: Option<String>,
}

/// Body of an inference call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InferenceEnvelope {
    pub kind: MessageKind,
    pub message: String,
    pub model: String,
    pub preprompt: String,
}

impl InferenceEnvelope {
    /// Build the envelope, reading the model selection exactly once unless the
    /// message names its own model.
    pub fn build(message: ChatMessage, preamble: String, models: &ModelSelection) -> Self {
        let model = message
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| models.current());

        Self {
            kind: message.kind,
            message: message.message,
            model,
            preprompt: preamble,
        }
    }
}
