use crate::core::ledger::{BACKENDS, BACKEND_CSV};
use crate::core::ConfigProvider;
use crate::utils::error::{DiagError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_sha256_hex, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    pub admin: Option<AdminConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "Diagnóstico Smart Caixilho".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub backend: String,
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: BACKEND_CSV.to_string(),
            path: "./data/leads.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// SHA-256 hex digest of the consultant secret, never the secret itself.
    pub secret_sha256: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DiagError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${ADMIN_DIGEST})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DiagError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn set_admin_digest(&mut self, digest: String) {
        self.admin
            .get_or_insert_with(AdminConfig::default)
            .secret_sha256 = Some(digest);
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("compact")
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("app.name", &self.app.name)?;
        validate_path("report.output_path", &self.report.output_path)?;
        validate_one_of("ledger.backend", &self.ledger.backend, &BACKENDS)?;
        if self.ledger.backend == BACKEND_CSV {
            validate_path("ledger.path", &self.ledger.path)?;
        }
        if let Some(digest) = self.admin_secret_sha256() {
            validate_sha256_hex("admin.secret_sha256", digest)?;
        }
        validate_one_of("logging.format", self.log_format(), &LOG_FORMATS)?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn ledger_backend(&self) -> &str {
        &self.ledger.backend
    }

    fn ledger_path(&self) -> &str {
        &self.ledger.path
    }

    fn admin_secret_sha256(&self) -> Option<&str> {
        self.admin
            .as_ref()
            .and_then(|a| a.secret_sha256.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
