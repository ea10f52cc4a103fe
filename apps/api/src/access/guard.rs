use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use chrono::Local;

use crate::access::{enforce_quota, identify, ClientIdentity};
use crate::errors::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Extractor that identifies the caller and consumes one request of quota.
///
/// Runs before the body is read, so a rejected caller never reaches the handler.
#[derive(Debug, Clone)]
pub struct QuotaGuard(pub ClientIdentity);

#[async_trait]
impl FromRequestParts<AppState> for QuotaGuard {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let store = state.quota_store.as_ref();
        let identity = identify(
            store,
            header_str(&parts.headers, API_KEY_HEADER),
            header_str(&parts.headers, FORWARDED_FOR_HEADER),
        )
        .await?;

        enforce_quota(store, &identity, &state.quota_policy, Local::now()).await?;
        Ok(QuotaGuard(identity))
    }
}

/// Header value as text; non-ASCII values are treated as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
