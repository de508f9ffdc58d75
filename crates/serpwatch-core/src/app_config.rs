#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub collector_search_engine: String,
    pub collector_track_competitors: bool,
    pub collector_competitors_limit: usize,
    pub threat_critical_drop: i32,
    pub threat_significant_drop: i32,
    pub threat_days_to_analyze: i32,
    pub threat_displacement_days: i32,
    pub threat_min_checks: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("collector_search_engine", &self.collector_search_engine)
            .field(
                "collector_track_competitors",
                &self.collector_track_competitors,
            )
            .field(
                "collector_competitors_limit",
                &self.collector_competitors_limit,
            )
            .field("threat_critical_drop", &self.threat_critical_drop)
            .field("threat_significant_drop", &self.threat_significant_drop)
            .field("threat_days_to_analyze", &self.threat_days_to_analyze)
            .field("threat_displacement_days", &self.threat_displacement_days)
            .field("threat_min_checks", &self.threat_min_checks)
            .finish()
    }
}
