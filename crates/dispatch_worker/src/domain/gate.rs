use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use trailwatch_domain::{talkgroup_from_tgid, ObjectKey, TalkgroupInformation};
use trailwatch_kv::KvStore;

use crate::domain::error::{WorkerError, WorkerResult};

/// The one shared set every worker consults. Members are TGIDs; each carries
/// its own TTL, refreshed on every admit.
pub const ALLOWED_TALKGROUPS_KEY: &str = "allowed_talkgroups";

/// A parsed key adorned with registry metadata. The registry lookup can miss
/// for talkgroups outside the watched system; handlers decide how to surface
/// that.
#[derive(Debug, Clone)]
pub struct AdornedKey {
    pub key: ObjectKey,
    pub talkgroup: Option<&'static TalkgroupInformation>,
}

/// Admission control over the expiring talkgroup set.
pub struct AllowListGate {
    kv: Arc<dyn KvStore>,
    dispatch_talkgroup: String,
}

impl AllowListGate {
    pub fn new(kv: Arc<dyn KvStore>, dispatch_talkgroup: String) -> Self {
        Self {
            kv,
            dispatch_talkgroup,
        }
    }

    /// Parse the key and decide whether its talkgroup is currently admitted.
    /// The dispatch talkgroup is always admitted without consulting the
    /// store; it is what activates tactical channels in the first place.
    pub async fn is_object_allowed(&self, raw_key: &str) -> WorkerResult<(bool, AdornedKey)> {
        let key = ObjectKey::parse(raw_key)?;
        let talkgroup = talkgroup_from_tgid(&key.talkgroup);
        let adorned = AdornedKey { key, talkgroup };

        if adorned.key.talkgroup == self.dispatch_talkgroup {
            return Ok((true, adorned));
        }

        let members = vec![adorned.key.talkgroup.clone()];
        let memberships = self.kv.smismember(ALLOWED_TALKGROUPS_KEY, &members).await?;
        if memberships.len() != 1 {
            return Err(WorkerError::MembershipArity {
                talkgroup: adorned.key.talkgroup.clone(),
                count: memberships.len(),
            });
        }

        debug!(
            talkgroup = %adorned.key.talkgroup,
            allowed = memberships[0],
            "checked allow-list membership"
        );
        Ok((memberships[0], adorned))
    }

    /// Admit a talkgroup for the activation window, refreshing its TTL if it
    /// is already present.
    pub async fn admit(&self, tgid: &str, ttl: Duration) -> WorkerResult<()> {
        self.kv
            .sadd_ex(ALLOWED_TALKGROUPS_KEY, ttl, &[tgid.to_string()])
            .await?;
        Ok(())
    }
}
