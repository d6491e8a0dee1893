pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::AppConfig};

pub use core::{
    admin::AdminGate,
    engine::DiagnosisEngine,
    ledger::{ConfiguredLedger, CsvLedger, MemoryLedger},
};
pub use utils::error::{DiagError, Result};
