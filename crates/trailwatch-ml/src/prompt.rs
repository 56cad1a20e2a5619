use serde_json::{json, Value};

/// Instructions shared by both model backends. The response schema keeps the
/// model honest about shape; the prompt covers everything the schema cannot.
pub(crate) const SYSTEM_PROMPT: &str = "You are a tool to accurately parse relevant information from a transcription of Fire Department radio messages.\n\
A single transmission may announce more than one call; return one entry in \"messages\" for each distinct call, in the order they occur. If the same call is repeated within the transmission, include it only once.\n\
For each call, extract the call type and the tactical channel (TAC).\n\
Call types can include \"Aid Emergency\", \"MVC\", \"MVC Aid Emergency\", \"AFA Commercial\", \"Rescue - Trail\", etc.\n\
If the call type can not be determined, return \"Unknown\".\n\
The tactical channel (TAC) should be in the format \"TAC1\", \"TAC2\", etc. Do not include a space between \"TAC\" and the number. If it appears as SPFR Repeater, assume it is \"TAC8\".\n\
Please clean each call's transcription to update any misspellings, incorrect locations, and generally ensure that it is clear and concise.\n\
Do not add any additional information or context that is not present in the transcription.";

/// JSON schema for the multi-message response shape.
pub(crate) fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "messages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "call_type": {"type": "string"},
                        "tac_channel": {"type": "string"},
                        "cleaned_transcription": {"type": "string"}
                    },
                    "required": ["call_type", "tac_channel", "cleaned_transcription"]
                }
            }
        },
        "required": ["messages"]
    })
}
