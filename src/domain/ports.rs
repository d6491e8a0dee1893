use crate::domain::model::DiagnosisRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for downloads (report text, lead exports).
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Drops a file written earlier; a missing file is not an error.
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn ledger_backend(&self) -> &str;
    fn ledger_path(&self) -> &str;
    fn admin_secret_sha256(&self) -> Option<&str>;
}

/// Append-only record of every diagnosis.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn append(&self, record: DiagnosisRecord) -> Result<()>;
    /// Snapshot in insertion order.
    async fn list(&self) -> Result<Vec<DiagnosisRecord>>;

    async fn len(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}
