use serde::{Deserialize, Serialize};

/// One dispatch pulled out of a radio transmission by the language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchMessage {
    pub call_type: String,
    /// Canonical form `TAC<digits>`, normalised by the model prompt.
    pub tac_channel: String,
    pub cleaned_transcription: String,
    /// Verbatim transcription the message was extracted from. Filled in by
    /// the parser client, not the model.
    #[serde(default)]
    pub transcription: String,
}

/// Every dispatch found in one transmission. A single transmission can
/// announce several incidents back to back, so this is an ordered list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchMessages {
    pub messages: Vec<DispatchMessage>,
    pub transcription: String,
}

/// ASR response for one uploaded recording; filename echoes the object key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub filename: String,
    pub transcription: String,
}
