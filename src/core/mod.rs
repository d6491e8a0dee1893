pub mod admin;
pub mod engine;
pub mod ledger;
pub mod questionnaire;
pub mod radar;
pub mod recommend;
pub mod report;
pub mod scoring;

pub use crate::domain::model::{
    AnswerSet, CompanyProfile, DiagnosisRecord, DiagnosisReport, Submission,
};
pub use crate::domain::ports::{ConfigProvider, Ledger, Storage};
pub use crate::utils::error::Result;
