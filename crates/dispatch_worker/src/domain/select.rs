use std::collections::HashSet;

use tracing::{info, warn};
use trailwatch_domain::{call_is_trail_rescue, DispatchMessage, DispatchMessages};
use twox_hash::XxHash64;

/// Pick the first trail-rescue dispatch out of a parsed transmission,
/// skipping anything the classifier rejects and anything whose cleaned
/// transcription has already been seen this envelope. The seen-set belongs
/// to the envelope and is discarded with it.
pub fn select_trail_rescue_message<'a>(
    dispatches: &'a DispatchMessages,
    seen: &mut HashSet<u64>,
) -> Option<(&'a DispatchMessage, u64)> {
    for (index, message) in dispatches.messages.iter().enumerate() {
        if !call_is_trail_rescue(&message.call_type) {
            warn!(
                call_type = %message.call_type,
                "call is not a trail rescue"
            );
            continue;
        }

        let fingerprint = XxHash64::oneshot(0, message.cleaned_transcription.as_bytes());
        if !seen.insert(fingerprint) {
            warn!(
                call_type = %message.call_type,
                tac_channel = %message.tac_channel,
                message_index = index + 1,
                "duplicate dispatch message detected, skipping"
            );
            continue;
        }

        info!(
            call_type = %message.call_type,
            tac_channel = %message.tac_channel,
            message_index = index + 1,
            fingerprint,
            "trail rescue call detected"
        );
        return Some((message, fingerprint));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatches(messages: Vec<(&str, &str, &str)>) -> DispatchMessages {
        DispatchMessages {
            messages: messages
                .into_iter()
                .map(|(call_type, tac_channel, cleaned)| DispatchMessage {
                    call_type: call_type.to_string(),
                    tac_channel: tac_channel.to_string(),
                    cleaned_transcription: cleaned.to_string(),
                    transcription: String::new(),
                })
                .collect(),
            transcription: String::new(),
        }
    }

    #[test]
    fn selects_first_trail_rescue() {
        let parsed = dispatches(vec![
            ("Aid Emergency", "TAC5", "aid call"),
            ("Rescue - Trail", "TAC3", "trail rescue on tiger mountain"),
            ("Rescue - Trail", "TAC4", "another rescue"),
        ]);

        let mut seen = HashSet::new();
        let (selected, _) = select_trail_rescue_message(&parsed, &mut seen).unwrap();
        assert_eq!(selected.tac_channel, "TAC3");
    }

    #[test]
    fn duplicate_cleaned_transcriptions_are_skipped() {
        let parsed = dispatches(vec![
            ("Rescue - Trail", "TAC3", "trail rescue on tiger mountain"),
            ("Rescue - Trail", "TAC3", "trail rescue on tiger mountain"),
        ]);

        let mut seen = HashSet::new();
        let (_, fingerprint) = select_trail_rescue_message(&parsed, &mut seen).unwrap();

        // The second identical message is the only remaining candidate and
        // must be rejected by the fingerprint set.
        assert!(select_trail_rescue_message(&parsed, &mut seen).is_none());
        assert!(seen.contains(&fingerprint));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn no_rescue_messages_selects_nothing() {
        let parsed = dispatches(vec![("Aid Emergency", "TAC5", "aid call")]);
        let mut seen = HashSet::new();
        assert!(select_trail_rescue_message(&parsed, &mut seen).is_none());
        assert!(seen.is_empty());
    }

    #[test]
    fn fingerprints_are_stable_across_envelopes() {
        let parsed = dispatches(vec![("Rescue - Trail", "TAC3", "same words")]);

        let mut first = HashSet::new();
        let (_, a) = select_trail_rescue_message(&parsed, &mut first).unwrap();
        let mut second = HashSet::new();
        let (_, b) = select_trail_rescue_message(&parsed, &mut second).unwrap();
        assert_eq!(a, b);
    }
}
