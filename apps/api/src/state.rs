use std::sync::Arc;

use crate::access::store::{InMemoryQuotaStore, QuotaStore};
use crate::access::QuotaPolicy;
use crate::analysis::rules::RuleSet;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled keyword and pattern tables used by every extractor.
    pub rules: Arc<RuleSet>,
    /// Pluggable quota storage. Default: InMemoryQuotaStore seeded with `PRO_API_KEYS`.
    pub quota_store: Arc<dyn QuotaStore>,
    pub quota_policy: QuotaPolicy,
}

impl AppState {
    pub fn new(config: Config, rules: Arc<RuleSet>) -> Self {
        let quota_store = Arc::new(InMemoryQuotaStore::new(config.pro_api_keys.clone()));
        let quota_policy = QuotaPolicy {
            daily_limit: config.free_daily_limit,
            upgrade_url: config.upgrade_url(),
        };
        Self {
            config,
            rules,
            quota_store,
            quota_policy,
        }
    }
}
