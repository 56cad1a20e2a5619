use serde::{Deserialize, Serialize};

pub const EVENT_OBJECT_CREATED_PUT: &str = "ObjectCreated:Put";
pub const EVENT_OBJECT_CREATED_POST: &str = "ObjectCreated:Post";

/// S3 event notification envelope as delivered on the queue. One envelope
/// may carry several records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventName")]
    pub event_name: String,
    pub s3: S3Entity,
}

impl EventRecord {
    /// Only object-created events carry a new recording.
    pub fn is_object_created(&self) -> bool {
        self.event_name == EVENT_OBJECT_CREATED_PUT || self.event_name == EVENT_OBJECT_CREATED_POST
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Bucket {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
}
