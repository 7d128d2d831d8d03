//! API configuration

use std::path::PathBuf;

use core_kernel::Timezone;
use domain_loans::ScheduleConfig;
use domain_pnl::PnlConfig;
use infra_store::{StoreBackend, StoreConfig};
use serde::Deserialize;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_DATA_DIR=/var/lib/ledger`. Missing fields keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory of the JSON file store
    pub data_dir: PathBuf,
    /// `file` or `memory`
    pub store_backend: StoreBackend,
    /// IANA zone deciding which calendar day "today" is
    pub timezone: Timezone,
    /// Log level
    pub log_level: String,
    /// Reject PnL entries until a baseline is saved
    pub require_baseline: bool,
    pub upcoming_limit: usize,
    pub paid_limit: usize,
    pub planner_window_days: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let schedule = ScheduleConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            store_backend: StoreBackend::File,
            timezone: Timezone::default(),
            log_level: "info".to_string(),
            require_baseline: true,
            upcoming_limit: schedule.upcoming_limit,
            paid_limit: schedule.paid_limit,
            planner_window_days: schedule.planner_window_days,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_config(&self) -> StoreConfig {
        match self.store_backend {
            StoreBackend::Memory => StoreConfig::memory(),
            StoreBackend::File => StoreConfig::file(self.data_dir.clone()),
        }
    }

    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            upcoming_limit: self.upcoming_limit,
            paid_limit: self.paid_limit,
            planner_window_days: self.planner_window_days,
        }
    }

    pub fn pnl_config(&self) -> PnlConfig {
        PnlConfig {
            require_baseline: self.require_baseline,
            ..PnlConfig::default()
        }
    }
}
