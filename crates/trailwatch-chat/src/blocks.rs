//! Block Kit layouts for the three message kinds the service posts.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

const OPENMHZ_SYSTEM: &str = "psernlfp";

/// Inputs for the activation header posted when a trail rescue is dispatched.
#[derive(Debug, Clone)]
pub struct RescueTrailBlocksInput {
    pub tac_channel: String,
    pub tac_tgid: String,
    pub tac_short_name: String,
    pub dispatch_tgid: String,
    pub transcription_text: String,
    pub expires_at: DateTime<Utc>,
}

fn openmhz_url(tgids: &[&str]) -> String {
    format!(
        "https://openmhz.com/system/{}?filter-type=talkgroup&filter-code={}",
        OPENMHZ_SYSTEM,
        tgids.join(",")
    )
}

fn header(text: &str) -> Value {
    json!({
        "type": "header",
        "text": {"type": "plain_text", "text": text, "emoji": true}
    })
}

fn divider() -> Value {
    json!({"type": "divider"})
}

fn mrkdwn_section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": text}
    })
}

pub fn rescue_trail_blocks(input: &RescueTrailBlocksInput) -> Vec<Value> {
    let listen_url = openmhz_url(&[&input.tac_tgid, &input.dispatch_tgid]);

    vec![
        header("Rescue Trail :helmet_with_white_cross: :evergreen_tree: :mountain:"),
        divider(),
        mrkdwn_section("*Channel:* Fire Dispatch 1"),
        mrkdwn_section(&format!("```{}```", input.transcription_text)),
        json!({
            "type": "section",
            "text": {"type": "mrkdwn", "text": "Listen live on OpenMHz:"},
            "accessory": {
                "type": "button",
                "action_id": "live-audio-button",
                "text": {"type": "plain_text", "text": ":headphones: Live Audio", "emoji": true},
                "url": listen_url
            }
        }),
        divider(),
        mrkdwn_section(&format!(
            "{} ({}) transcription has been activated. _*Expires {}*_",
            input.tac_channel,
            input.tac_short_name,
            input.expires_at.format("%m/%d/%y %H:%M UTC")
        )),
    ]
}

/// A tactical-channel transmission replied into the activation thread.
#[derive(Debug, Clone)]
pub struct ThreadCommunicationBlocksInput {
    pub channel: String,
    pub message: String,
    pub ts: DateTime<Utc>,
}

pub fn thread_communication_blocks(input: &ThreadCommunicationBlocksInput) -> Vec<Value> {
    vec![
        mrkdwn_section(&format!(
            "*Time:* {}\n*Channel:* {}",
            input.ts.format("%a, %d %b %Y %H:%M:%S UTC"),
            input.channel
        )),
        mrkdwn_section(&format!("```{}```", input.message)),
        divider(),
    ]
}

/// Posted into the thread (and broadcast) when the activation window closes.
#[derive(Debug, Clone)]
pub struct ChannelClosedBlocksInput {
    pub channel: String,
    pub closed_at: DateTime<Utc>,
}

pub fn channel_closed_blocks(input: &ChannelClosedBlocksInput) -> Vec<Value> {
    vec![
        header("Channel Closed :lock:"),
        divider(),
        mrkdwn_section(&format!("*Channel {} has been closed.*", input.channel)),
        mrkdwn_section(&format!(
            "*Closed at {}*",
            input.closed_at.format("%a, %d %b %Y %H:%M:%S UTC")
        )),
    ]
}
