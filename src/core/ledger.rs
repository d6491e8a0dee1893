use crate::core::ConfigProvider;
use crate::domain::model::DiagnosisRecord;
use crate::domain::ports::Ledger;
use crate::utils::error::{DiagError, Result};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub const LEDGER_HEADER: [&str; 7] = [
    "Data",
    "Empresa",
    "Responsavel",
    "Telefone",
    "Email",
    "Pontuacao",
    "Nivel",
];

pub const BACKEND_MEMORY: &str = "memory";
pub const BACKEND_CSV: &str = "csv";
pub const BACKENDS: [&str; 2] = [BACKEND_MEMORY, BACKEND_CSV];

/// Process-lifetime ledger; everything is lost on exit.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Mutex<Vec<DiagnosisRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append(&self, record: DiagnosisRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.push(record);
        tracing::debug!("Ledger now holds {} record(s) in memory", records.len());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DiagnosisRecord>> {
        Ok(self.records.lock().await.clone())
    }
}

/// File-backed ledger: one CSV row per diagnosis, header on the first line.
#[derive(Debug)]
pub struct CsvLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// csv 只有同步 API，整段讀寫丟到 blocking 執行緒
fn append_row(path: &Path, record: &DiagnosisRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_new = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(LEDGER_HEADER)?;
    }
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<DiagnosisRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.iter().ne(LEDGER_HEADER.iter().copied()) {
        return Err(DiagError::LedgerError {
            message: format!("unexpected header in {}: {:?}", path.display(), headers),
        });
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn join_error(e: tokio::task::JoinError) -> DiagError {
    DiagError::LedgerError {
        message: format!("ledger task failed: {}", e),
    }
}

#[async_trait]
impl Ledger for CsvLedger {
    async fn append(&self, record: DiagnosisRecord) -> Result<()> {
        let _guard = self.lock.lock().await;

        let path = self.path.clone();
        let company = record.company.clone();
        tokio::task::spawn_blocking(move || append_row(&path, &record))
            .await
            .map_err(join_error)??;

        tracing::debug!("Appended diagnosis for '{}' to {}", company, self.path.display());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DiagnosisRecord>> {
        let _guard = self.lock.lock().await;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_rows(&path))
            .await
            .map_err(join_error)?
    }
}

/// Ledger chosen at startup from configuration.
#[derive(Debug)]
pub enum ConfiguredLedger {
    Memory(MemoryLedger),
    Csv(CsvLedger),
}

impl ConfiguredLedger {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        match config.ledger_backend() {
            BACKEND_MEMORY => {
                tracing::warn!("Using in-memory ledger: diagnoses are discarded when the process exits");
                Ok(Self::Memory(MemoryLedger::new()))
            }
            BACKEND_CSV => {
                let ledger = CsvLedger::new(config.ledger_path());
                tracing::info!("📒 Using CSV ledger at {}", ledger.path().display());
                Ok(Self::Csv(ledger))
            }
            other => Err(DiagError::InvalidConfigValueError {
                field: "ledger.backend".to_string(),
                value: other.to_string(),
                reason: format!("Valid backends: {}", BACKENDS.join(", ")),
            }),
        }
    }
}

#[async_trait]
impl Ledger for ConfiguredLedger {
    async fn append(&self, record: DiagnosisRecord) -> Result<()> {
        match self {
            Self::Memory(ledger) => ledger.append(record).await,
            Self::Csv(ledger) => ledger.append(record).await,
        }
    }

    async fn list(&self) -> Result<Vec<DiagnosisRecord>> {
        match self {
            Self::Memory(ledger) => ledger.list().await,
            Self::Csv(ledger) => ledger.list().await,
        }
    }
}

/// Serializes the ledger as the administrative CSV export (header always present).
pub fn leads_to_csv(records: &[DiagnosisRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(LEDGER_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| DiagError::LedgerError {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| DiagError::LedgerError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(company: &str, total: u8) -> DiagnosisRecord {
        DiagnosisRecord {
            timestamp: "17/10/2026 10:00".to_string(),
            company: company.to_string(),
            responsible: "Carlos, Gerente".to_string(),
            phone: "11 90000-0000".to_string(),
            email: format!("{}@example.com", company.to_lowercase()),
            total_score: total,
            tier: "Nível 1 – Operação Invisível".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_ledger_preserves_insertion_order() {
        let ledger = MemoryLedger::new();
        for (i, name) in ["Alfa", "Beta", "Gama"].iter().enumerate() {
            ledger.append(record(name, i as u8)).await.unwrap();
        }

        let records = ledger.list().await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Alfa", "Beta", "Gama"]);
        assert_eq!(ledger.len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_memory_ledger_does_not_dedup() {
        let ledger = MemoryLedger::new();
        ledger.append(record("Alfa", 5)).await.unwrap();
        ledger.append(record("Alfa", 5)).await.unwrap();
        assert_eq!(ledger.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_csv_ledger_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("leads.csv");

        let ledger = CsvLedger::new(&path);
        assert!(ledger.list().await.unwrap().is_empty());
        ledger.append(record("Alfa", 8)).await.unwrap();
        ledger.append(record("Beta", 33)).await.unwrap();

        let reopened = CsvLedger::new(&path);
        let records = reopened.list().await.unwrap();
        assert_eq!(records, vec![record("Alfa", 8), record("Beta", 33)]);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next().unwrap(), LEDGER_HEADER.join(","));
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_csv_ledger_rejects_foreign_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leads.csv");
        std::fs::write(&path, "id,name\n1,x\n").unwrap();

        let ledger = CsvLedger::new(&path);
        assert!(matches!(
            ledger.list().await,
            Err(DiagError::LedgerError { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_csv_ledger_concurrent_appends_keep_every_row() {
        let dir = TempDir::new().unwrap();
        let ledger = std::sync::Arc::new(CsvLedger::new(dir.path().join("leads.csv")));

        let mut handles = Vec::new();
        for i in 0..16u8 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.append(record(&format!("Empresa{}", i), i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = ledger.list().await.unwrap();
        assert_eq!(records.len(), 16);
        let mut totals: Vec<u8> = records.iter().map(|r| r.total_score).collect();
        totals.sort_unstable();
        assert_eq!(totals, (0..16).collect::<Vec<u8>>());

        let content = std::fs::read_to_string(dir.path().join("leads.csv")).unwrap();
        assert_eq!(content.matches("Data,Empresa").count(), 1);
    }

    #[test]
    fn test_leads_to_csv_header_and_rows() {
        let csv = leads_to_csv(&[record("Alfa", 8), record("Beta", 33)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Data,Empresa,Responsavel,Telefone,Email,Pontuacao,Nivel");
        assert_eq!(lines.len(), 3);
        // 含逗號的欄位要加引號
        assert!(lines[1].contains("\"Carlos, Gerente\""));
        assert!(lines[2].contains(",33,"));
    }

    #[test]
    fn test_leads_to_csv_empty_ledger_has_header_only() {
        let csv = leads_to_csv(&[]).unwrap();
        assert_eq!(csv, "Data,Empresa,Responsavel,Telefone,Email,Pontuacao,Nivel\n");
    }
}
