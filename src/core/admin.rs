//! Access gate for the consultant panel.
//!
//! Only the SHA-256 digest of the operator secret is configured
//! (`admin.secret_sha256` or `SMART_CAIXILHO_ADMIN_SECRET_SHA256`). Presented
//! secrets are hashed and compared in constant time.

use crate::utils::error::{DiagError, Result};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub fn hash_secret(secret: &str) -> String {
    Sha256::digest(secret.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    expected_digest: Option<String>,
}

impl AdminGate {
    pub fn new(expected_digest: Option<&str>) -> Self {
        Self {
            expected_digest: expected_digest
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.expected_digest.is_some()
    }

    pub fn authorize(&self, secret: Option<&str>) -> Result<()> {
        let Some(expected) = self.expected_digest.as_deref() else {
            tracing::warn!(
                event = "auth_failure",
                reason = "admin_disabled",
                "Consultant panel requested but no admin digest is configured"
            );
            return Err(DiagError::Unauthorized {
                reason: "admin access is not configured".to_string(),
            });
        };

        let Some(secret) = secret.filter(|s| !s.is_empty()) else {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_secret",
                "Consultant panel requested without a secret"
            );
            return Err(DiagError::Unauthorized {
                reason: "missing secret".to_string(),
            });
        };

        // 兩邊都是 64 字元的摘要，長度固定
        let provided = hash_secret(secret);
        let matches: bool = provided.as_bytes().ct_eq(expected.as_bytes()).into();

        if matches {
            tracing::info!("🔑 Consultant panel access granted");
            Ok(())
        } else {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_secret",
                "Consultant panel access denied"
            );
            Err(DiagError::Unauthorized {
                reason: "invalid secret".to_string(),
            })
        }
    }
}
