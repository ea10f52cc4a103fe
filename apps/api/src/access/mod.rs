//! Access control: who is calling, and whether they still have quota today.

pub mod guard;
pub mod store;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::access::store::{Acquire, QuotaStore};
use crate::errors::AppError;

const FINGERPRINT_LEN: usize = 16;
const UNKNOWN_ADDRESS: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Pro,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub id: String,
    pub tier: Tier,
}

/// Daily allowance applied to free-tier callers.
#[derive(Debug, Clone)]
pub struct QuotaPolicy {
    pub daily_limit: usize,
    pub upgrade_url: String,
}

/// Derives the caller's identity.
///
/// A recognized API key identifies a Pro caller by the key itself. Everyone else is a Free
/// caller identified by a fingerprint of the first forwarded address.
pub async fn identify(
    store: &dyn QuotaStore,
    api_key: Option<&str>,
    forwarded_for: Option<&str>,
) -> anyhow::Result<ClientIdentity> {
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        if store.is_privileged(key).await? {
            return Ok(ClientIdentity {
                id: key.to_string(),
                tier: Tier::Pro,
            });
        }
    }

    let address = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .unwrap_or(UNKNOWN_ADDRESS);

    Ok(ClientIdentity {
        id: fingerprint(address),
        tier: Tier::Free,
    })
}

/// First 16 hex characters of the SHA-256 of `value`.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}

/// Checks and consumes one request from the caller's allowance for the day containing `now`.
/// Pro callers are never limited.
pub async fn enforce_quota(
    store: &dyn QuotaStore,
    identity: &ClientIdentity,
    policy: &QuotaPolicy,
    now: DateTime<Local>,
) -> Result<(), AppError> {
    if identity.tier == Tier::Pro {
        return Ok(());
    }

    let day_start = start_of_day(now);
    match store
        .try_acquire(&identity.id, day_start, now, policy.daily_limit)
        .await?
    {
        Acquire::Granted { used } => {
            tracing::debug!(client = %identity.id, used, "Quota consumed");
            Ok(())
        }
        Acquire::Exhausted { used } => {
            tracing::warn!(client = %identity.id, used, "Daily quota exhausted");
            Err(AppError::QuotaExceeded {
                message: format!(
                    "Daily limit reached ({}/day for free tier)",
                    policy.daily_limit
                ),
                upgrade_url: policy.upgrade_url.clone(),
                reset_at: day_start + Duration::hours(24),
            })
        }
    }
}

/// Local midnight of the day containing `now`. If midnight does not exist locally (a DST
/// jump at 00:00), the first valid instant after it is used.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .unwrap_or(now)
}
