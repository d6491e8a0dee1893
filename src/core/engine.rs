use crate::core::admin::AdminGate;
use crate::core::ledger::leads_to_csv;
use crate::core::questionnaire::resolve;
use crate::core::radar::dimension_averages;
use crate::core::recommend::select_priorities;
use crate::core::report::{render_report, report_file_name, TIMESTAMP_FORMAT};
use crate::core::scoring::{rounded_percentage, summarize};
use crate::core::{Ledger, Storage};
use crate::domain::model::{CompanyProfile, DiagnosisRecord, DiagnosisReport, Submission};
use crate::utils::error::{DiagError, Result};
use chrono::{DateTime, Local};

pub const LEADS_EXPORT_FILE: &str = "leads_smart_caixilho.csv";

const MISSING_PROFILE_MESSAGE: &str =
    "Por favor, preencha os dados de cadastro (Empresa e E-mail) antes de continuar.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadsExport {
    pub file_name: String,
    pub rows: usize,
    pub csv: String,
}

pub fn validate_profile(profile: &CompanyProfile) -> Result<()> {
    if profile.company.trim().is_empty() || profile.email.trim().is_empty() {
        return Err(DiagError::validation(MISSING_PROFILE_MESSAGE));
    }
    Ok(())
}

pub struct DiagnosisEngine<L: Ledger, S: Storage> {
    ledger: L,
    storage: S,
    gate: AdminGate,
}

impl<L: Ledger, S: Storage> DiagnosisEngine<L, S> {
    pub fn new(ledger: L, storage: S, gate: AdminGate) -> Self {
        Self {
            ledger,
            storage,
            gate,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub async fn submit(&self, submission: Submission) -> Result<DiagnosisReport> {
        self.submit_at(submission, Local::now()).await
    }

    /// Scores a submission, stores its report and records it in the ledger.
    ///
    /// The ledger append happens last: any earlier failure leaves no record,
    /// and a failed append removes the report that was just written.
    pub async fn submit_at(
        &self,
        submission: Submission,
        at: DateTime<Local>,
    ) -> Result<DiagnosisReport> {
        let Submission { profile, answers } = submission;

        if let Err(e) = validate_profile(&profile) {
            tracing::warn!("❌ Submission rejected: company name or e-mail missing");
            return Err(e);
        }

        let answered = resolve(&answers)?;
        let summary = summarize(&answered);
        let recommendations = select_priorities(&answered);
        let radar = dimension_averages(&answered);

        let record = DiagnosisRecord {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            company: profile.company,
            responsible: profile.responsible,
            phone: profile.phone,
            email: profile.email,
            total_score: summary.total,
            tier: summary.tier.label().to_string(),
        };

        let report_text = render_report(&record, &summary, &recommendations);
        let file_name = report_file_name(&record.company);
        self.storage
            .write_file(&file_name, report_text.as_bytes())
            .await?;
        tracing::debug!("Report written to {}", file_name);

        if let Err(e) = self.ledger.append(record.clone()).await {
            tracing::error!("❌ Ledger append failed for {}: {}", record.company, e);
            if let Err(cleanup) = self.storage.remove_file(&file_name).await {
                tracing::warn!("⚠️ Could not remove orphan report {}: {}", file_name, cleanup);
            }
            return Err(e);
        }

        tracing::info!(
            "✅ Diagnosis completed for {}: {}/{} ({}%), {}",
            record.company,
            summary.total,
            summary.max,
            rounded_percentage(summary.total),
            summary.tier
        );

        Ok(DiagnosisReport {
            record,
            score: summary,
            radar,
            recommendations,
            report_file_name: file_name,
            report_text,
        })
    }

    pub async fn list_leads(&self, secret: Option<&str>) -> Result<Vec<DiagnosisRecord>> {
        self.gate.authorize(secret)?;
        let records = self.ledger.list().await?;
        if records.is_empty() {
            tracing::info!("Nenhum diagnóstico realizado ainda.");
        }
        Ok(records)
    }

    pub async fn export_leads(&self, secret: Option<&str>) -> Result<LeadsExport> {
        let records = self.list_leads(secret).await?;
        let csv = leads_to_csv(&records)?;

        self.storage
            .write_file(LEADS_EXPORT_FILE, csv.as_bytes())
            .await?;
        tracing::info!("📥 Exported {} lead(s) to {}", records.len(), LEADS_EXPORT_FILE);

        Ok(LeadsExport {
            file_name: LEADS_EXPORT_FILE.to_string(),
            rows: records.len(),
            csv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::admin::hash_secret;
    use crate::core::ledger::MemoryLedger;
    use crate::core::questionnaire::QUESTIONS;
    use crate::domain::model::{AnswerSet, Score, Tier};
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn remove_file(&self, path: &str) -> Result<()> {
            let mut files = self.files.lock().await;
            files.remove(path);
            Ok(())
        }
    }

    /// 模擬帳本寫入失敗（磁碟滿、權限不足）
    struct FailingLedger;

    #[async_trait::async_trait]
    impl Ledger for FailingLedger {
        async fn append(&self, _record: DiagnosisRecord) -> Result<()> {
            Err(DiagError::LedgerError {
                message: "disk full".to_string(),
            })
        }

        async fn list(&self) -> Result<Vec<DiagnosisRecord>> {
            Ok(Vec::new())
        }
    }

    const SECRET: &str = "cba2026";

    fn engine(storage: MockStorage) -> DiagnosisEngine<MemoryLedger, MockStorage> {
        DiagnosisEngine::new(
            MemoryLedger::new(),
            storage,
            AdminGate::new(Some(&hash_secret(SECRET))),
        )
    }

    fn submission(company: &str, email: &str, values: [u8; 10]) -> Submission {
        let answers: AnswerSet = QUESTIONS
            .iter()
            .zip(values)
            .map(|(q, v)| (q.id, Score::new(v).unwrap()))
            .collect();
        Submission {
            profile: CompanyProfile {
                company: company.to_string(),
                responsible: "Marina / Sócia".to_string(),
                phone: "21 98888-7777".to_string(),
                email: email.to_string(),
            },
            answers,
        }
    }

    #[tokio::test]
    async fn test_submit_records_and_stores_report() {
        let storage = MockStorage::default();
        let engine = engine(storage.clone());
        let at = Local.with_ymd_and_hms(2026, 10, 17, 14, 5, 0).unwrap();

        let report = engine
            .submit_at(
                submission("Vidros Sul", "contato@vidrossul.com", [3, 3, 3, 3, 3, 3, 3, 3, 2, 2]),
                at,
            )
            .await
            .unwrap();

        assert_eq!(report.score.total, 28);
        assert_eq!(report.score.tier, Tier::Controlled);
        assert_eq!(report.record.timestamp, "17/10/2026 14:05");
        assert_eq!(report.record.tier, "Nível 3 – Operação Controlada");
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.recommendations[0].question_id, "Q9");
        assert_eq!(report.radar.len(), 7);
        assert_eq!(report.report_file_name, "Relatorio_Vidros_Sul.txt");

        let stored = storage.get_file("Relatorio_Vidros_Sul.txt").await.unwrap();
        assert_eq!(String::from_utf8(stored).unwrap(), report.report_text);

        let leads = engine.ledger().list().await.unwrap();
        assert_eq!(leads, vec![report.record]);
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_company_or_email() {
        let storage = MockStorage::default();
        let engine = engine(storage.clone());

        for (company, email) in [("", "a@b.com"), ("ACME", ""), ("   ", "a@b.com"), ("", "")] {
            let result = engine.submit(submission(company, email, [2; 10])).await;
            assert!(matches!(result, Err(DiagError::ValidationError { .. })));
        }

        assert_eq!(engine.ledger().len().await.unwrap(), 0);
        assert!(storage.files.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_incomplete_answers_creates_no_record() {
        let engine = engine(MockStorage::default());
        let mut sub = submission("ACME", "a@acme.com", [1; 10]);
        sub.answers = [("Q1", Score::new(1).unwrap())].into_iter().collect();

        let result = engine.submit(sub).await;
        assert!(matches!(result, Err(DiagError::IncompleteAnswers { .. })));
        assert_eq!(engine.ledger().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_each_submission_adds_exactly_one_record() {
        let engine = engine(MockStorage::default());
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            engine
                .submit(submission(name, "x@y.com", [i as u8; 10]))
                .await
                .unwrap();
            assert_eq!(engine.ledger().len().await.unwrap(), i + 1);
        }

        let names: Vec<String> = engine
            .list_leads(Some(SECRET))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_export_requires_secret_and_matches_ledger() {
        let storage = MockStorage::default();
        let engine = engine(storage.clone());
        engine
            .submit(submission("A", "a@a.com", [0; 10]))
            .await
            .unwrap();
        engine
            .submit(submission("B", "b@b.com", [4; 10]))
            .await
            .unwrap();

        assert!(matches!(
            engine.export_leads(Some("wrong")).await,
            Err(DiagError::Unauthorized { .. })
        ));
        assert!(storage.get_file(LEADS_EXPORT_FILE).await.is_none());

        let export = engine.export_leads(Some(SECRET)).await.unwrap();
        assert_eq!(export.rows, 2);
        assert_eq!(export.csv.lines().count(), 3);
        assert!(export.csv.contains("Nível 4 – Operação Inteligente"));

        let stored = storage.get_file(LEADS_EXPORT_FILE).await.unwrap();
        assert_eq!(String::from_utf8(stored).unwrap(), export.csv);
    }

    #[tokio::test]
    async fn test_export_empty_ledger() {
        let engine = engine(MockStorage::default());
        let export = engine.export_leads(Some(SECRET)).await.unwrap();
        assert_eq!(export.rows, 0);
        assert_eq!(export.csv.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_append_removes_written_report() {
        let storage = MockStorage::default();
        let engine = DiagnosisEngine::new(FailingLedger, storage.clone(), AdminGate::new(None));

        let result = engine
            .submit(submission("Vidros Sul", "contato@vidrossul.com", [2; 10]))
            .await;

        assert!(matches!(result, Err(DiagError::LedgerError { .. })));
        assert!(storage.get_file("Relatorio_Vidros_Sul.txt").await.is_none());
        assert!(storage.files.lock().await.is_empty());
    }
}
