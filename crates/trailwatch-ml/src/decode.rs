use serde::Deserialize;
use trailwatch_domain::{DispatchMessage, DispatchMessages};

use crate::error::MlError;

#[derive(Debug, Deserialize)]
struct WireDispatchMessage {
    call_type: String,
    tac_channel: String,
    cleaned_transcription: String,
}

#[derive(Debug, Deserialize)]
struct MultiMessageResponse {
    messages: Vec<WireDispatchMessage>,
}

/// Decode a model reply into the multi-message contract. Older prompts
/// produced a single message at the top level; those are accepted and
/// treated as a one-element list so callers only ever see the list form.
pub(crate) fn decode_dispatch_messages(
    raw: &str,
    transcription: &str,
) -> Result<DispatchMessages, MlError> {
    let wire_messages = match serde_json::from_str::<MultiMessageResponse>(raw) {
        Ok(multi) => multi.messages,
        Err(_) => {
            let single: WireDispatchMessage =
                serde_json::from_str(raw).map_err(|e| MlError::Decode(e.to_string()))?;
            vec![single]
        }
    };

    let messages = wire_messages
        .into_iter()
        .map(|m| DispatchMessage {
            call_type: m.call_type,
            tac_channel: m.tac_channel,
            cleaned_transcription: m.cleaned_transcription,
            transcription: transcription.to_string(),
        })
        .collect();

    Ok(DispatchMessages {
        messages,
        transcription: transcription.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_multi_message_shape() {
        let raw = r#"{
            "messages": [
                {"call_type": "Rescue - Trail", "tac_channel": "TAC3", "cleaned_transcription": "Rescue on Tiger Mountain trail, respond TAC3."},
                {"call_type": "Aid Emergency", "tac_channel": "TAC5", "cleaned_transcription": "Aid emergency at 120 Main St."}
            ],
            "transcription": "ignored"
        }"#;

        let decoded = decode_dispatch_messages(raw, "verbatim words").unwrap();
        assert_eq!(decoded.messages.len(), 2);
        assert_eq!(decoded.messages[0].tac_channel, "TAC3");
        assert_eq!(decoded.messages[0].transcription, "verbatim words");
        assert_eq!(decoded.transcription, "verbatim words");
    }

    #[test]
    fn decodes_legacy_single_message_shape() {
        let raw = r#"{"call_type": "Rescue - Trail", "tac_channel": "TAC3", "cleaned_transcription": "Trail rescue, TAC3."}"#;

        let decoded = decode_dispatch_messages(raw, "verbatim words").unwrap();
        assert_eq!(decoded.messages.len(), 1);
        assert_eq!(decoded.messages[0].call_type, "Rescue - Trail");
        assert_eq!(decoded.messages[0].transcription, "verbatim words");
    }

    #[test]
    fn rejects_malformed_replies() {
        assert!(decode_dispatch_messages("not json", "t").is_err());
        assert!(decode_dispatch_messages(r#"{"messages": "nope"}"#, "t").is_err());
        assert!(decode_dispatch_messages(r#"{"call_type": "x"}"#, "t").is_err());
    }

    #[test]
    fn empty_message_list_decodes_empty() {
        let decoded = decode_dispatch_messages(r#"{"messages": []}"#, "t").unwrap();
        assert!(decoded.messages.is_empty());
    }
}
