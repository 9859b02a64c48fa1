use std::path::PathBuf;

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
    pub env: Environment,
    pub search_api_key: String,
    pub search_base_url: String,
    pub search_model: String,
    pub search_request_timeout_secs: u64,
    pub search_branch_timeout_secs: u64,
    pub search_max_retries: u32,
    pub search_retry_backoff_base_secs: u64,
    pub search_user_agent: String,
    pub max_results: usize,
    pub stores_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("search_api_key", &"[redacted]")
            .field("search_base_url", &self.search_base_url)
            .field("search_model", &self.search_model)
            .field(
                "search_request_timeout_secs",
                &self.search_request_timeout_secs,
            )
            .field(
                "search_branch_timeout_secs",
                &self.search_branch_timeout_secs,
            )
            .field("search_max_retries", &self.search_max_retries)
            .field(
                "search_retry_backoff_base_secs",
                &self.search_retry_backoff_base_secs,
            )
            .field("search_user_agent", &self.search_user_agent)
            .field("max_results", &self.max_results)
            .field("stores_path", &self.stores_path)
            .finish()
    }
}
