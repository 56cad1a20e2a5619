use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};

/// A deconstructed recording key.
///
/// Recorder uploads are named `<talkgroup>-<timestamp>_<frequency>.<suffix>.<filetype>`,
/// e.g. `1183-1750542445_854412500.1-call_1871.wav`. The suffix is opaque and
/// may itself contain `-` or `_`; only the leading segment is split further.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectKey {
    pub talkgroup: String,
    pub time: DateTime<Utc>,
    pub frequency_mhz: f64,
    pub suffix: String,
    pub file_type: String,
}

impl ObjectKey {
    /// Parse a recording key. Strict: exactly three `.` segments, exactly one
    /// `-` in the leading segment, exactly one `_` between timestamp and
    /// frequency.
    pub fn parse(key: &str) -> DomainResult<Self> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.len() != 3 {
            return Err(DomainError::KeyFormat(key.to_string()));
        }

        let file_type = segments[2];
        let suffix = segments[1];

        let head: Vec<&str> = segments[0].split('-').collect();
        if head.len() != 2 {
            return Err(DomainError::KeyFormat(key.to_string()));
        }
        let talkgroup = head[0];

        let time_and_freq: Vec<&str> = head[1].split('_').collect();
        if time_and_freq.len() != 2 {
            return Err(DomainError::TimeFrequencyFormat(head[1].to_string()));
        }

        let secs: i64 = time_and_freq[0]
            .parse()
            .map_err(|_| DomainError::Timestamp(time_and_freq[0].to_string()))?;
        let time = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| DomainError::Timestamp(time_and_freq[0].to_string()))?;

        let frequency_mhz: f64 = time_and_freq[1]
            .parse()
            .map_err(|_| DomainError::Frequency(time_and_freq[1].to_string()))?;

        Ok(Self {
            talkgroup: talkgroup.to_string(),
            time,
            frequency_mhz,
            suffix: suffix.to_string(),
            file_type: file_type.to_string(),
        })
    }

    pub fn is_wav(&self) -> bool {
        self.file_type == "wav"
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}_{}.{}.{}",
            self.talkgroup,
            self.time.timestamp(),
            self.frequency_mhz,
            self.suffix,
            self.file_type
        )
    }
}

/// Cheap extension check applied before any parsing or remote call.
pub fn has_wav_extension(key: &str) -> bool {
    key.rsplit('.').next() == Some("wav")
}
