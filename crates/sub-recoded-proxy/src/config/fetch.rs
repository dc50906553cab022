use serde::{Deserialize, Serialize};
use std::time::Duration;
use sub_recoded_types::{DEFAULT_USER_AGENT, FETCH_TIMEOUT_SECS, MAX_REDIRECTS};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: MAX_REDIRECTS,
        }
    }
}
