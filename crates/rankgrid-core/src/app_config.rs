use rust_decimal::Decimal;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub provider_login: String,
    pub provider_password: String,
    pub provider_base_url: String,
    pub provider_timeout_secs: u64,
    pub provider_max_retries: u32,
    pub provider_backoff_base_ms: u64,
    pub user_agent: String,
    pub scan_concurrency: usize,
    pub scan_delay_ms: u64,
    pub scan_depth: u32,
    /// Provider price per grid-point query.
    pub unit_cost: Decimal,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("provider_login", &self.provider_login)
            .field("provider_password", &"[redacted]")
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("provider_max_retries", &self.provider_max_retries)
            .field("provider_backoff_base_ms", &self.provider_backoff_base_ms)
            .field("user_agent", &self.user_agent)
            .field("scan_concurrency", &self.scan_concurrency)
            .field("scan_delay_ms", &self.scan_delay_ms)
            .field("scan_depth", &self.scan_depth)
            .field("unit_cost", &self.unit_cost)
            .finish()
    }
}
