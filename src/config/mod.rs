pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::AppConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fmt;

#[cfg(feature = "cli")]
const REDACTED: &str = "<redacted>";

#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "smart-caixilho")]
#[command(about = "Diagnóstico Smart Caixilho: maturity self-assessment for aluminium frame companies")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory where reports and exports are written
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    /// Ledger backend (memory or csv)
    #[arg(long, global = true)]
    pub ledger: Option<String>,

    /// CSV ledger location
    #[arg(long, global = true)]
    pub ledger_path: Option<String>,

    /// SHA-256 digest of the consultant secret
    #[arg(long, global = true, env = "SMART_CAIXILHO_ADMIN_SECRET_SHA256", hide_env_values = true)]
    pub admin_digest: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Clone, Subcommand)]
pub enum Command {
    /// List the ten questions and the scoring scale
    Questions,
    /// Answer the questionnaire and generate the report
    Submit(SubmitArgs),
    /// Consultant panel: view or export every recorded diagnosis
    Leads(LeadsArgs),
    /// Print the SHA-256 digest of a secret, for admin.secret_sha256
    HashSecret { secret: String },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct SubmitArgs {
    #[arg(long, default_value = "")]
    pub company: String,

    /// Responsible person / role
    #[arg(long, default_value = "")]
    pub responsible: String,

    /// Phone (WhatsApp)
    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub email: String,

    /// Ten comma-separated scores in question order, e.g. 3,2,4,1,0,2,3,1,2,4
    #[arg(long, conflicts_with = "answers_file")]
    pub answers: Option<String>,

    /// TOML file with an [answers] table (Q1 = 3, ...)
    #[arg(long)]
    pub answers_file: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Default, Args)]
pub struct LeadsArgs {
    #[arg(long, env = "SMART_CAIXILHO_ADMIN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Write leads_smart_caixilho.csv to the output directory
    #[arg(long)]
    pub export: bool,
}

// 密碼與摘要不進日誌
#[cfg(feature = "cli")]
fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| REDACTED)
}

#[cfg(feature = "cli")]
impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("config", &self.config)
            .field("output_path", &self.output_path)
            .field("ledger", &self.ledger)
            .field("ledger_path", &self.ledger_path)
            .field("admin_digest", &redact(&self.admin_digest))
            .field("verbose", &self.verbose)
            .field("command", &self.command)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Questions => f.write_str("Questions"),
            Command::Submit(args) => f.debug_tuple("Submit").field(args).finish(),
            Command::Leads(args) => f.debug_tuple("Leads").field(args).finish(),
            Command::HashSecret { .. } => f
                .debug_struct("HashSecret")
                .field("secret", &REDACTED)
                .finish(),
        }
    }
}

#[cfg(feature = "cli")]
impl fmt::Debug for LeadsArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadsArgs")
            .field("secret", &redact(&self.secret))
            .field("export", &self.export)
            .finish()
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 日誌初始化之後呼叫，否則這行會被丟掉
    pub fn log_config_source(&self) {
        match &self.config {
            Some(path) => tracing::info!("📁 Loading configuration from: {}", path),
            None => tracing::info!("📁 No configuration file, using defaults"),
        }
    }

    /// 載入設定檔並套用命令列覆蓋
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.report.output_path = output_path.clone();
        }
        if let Some(backend) = &self.ledger {
            config.ledger.backend = backend.clone();
        }
        if let Some(path) = &self.ledger_path {
            config.ledger.path = path.clone();
        }
        if let Some(digest) = &self.admin_digest {
            config.set_admin_digest(digest.clone());
        }

        Ok(config)
    }
}
