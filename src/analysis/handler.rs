use tracing::{info, warn, Instrument};
use crate::db::Database;
use crate::errors::LabsightError;
use crate::extraction;
use crate::models::{Report, ReportDraft, UploadedFile};
use super::interpreter::Interpreter;
use super::parse::ParseOutcome;

/// Upload -> extract -> interpret -> parse -> store.
pub struct ReportAnalyzer {
    db: Database,
    interpreter: Interpreter,
    max_upload_bytes: usize,
}

impl ReportAnalyzer {
    pub fn new(db: Database, interpreter: Interpreter, max_upload_bytes: usize) -> Self {
        Self { db, interpreter, max_upload_bytes }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Run the full pipeline and persist the result.
    pub async fn analyze(&self, upload: Option<UploadedFile>) -> Result<Report, LabsightError> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "upload",
            %request_id,
            file = upload.as_ref().and_then(|u| u.file_name.as_deref()).unwrap_or("-"),
            media_type = upload.as_ref().map(|u| u.media_type.as_str()).unwrap_or("-"),
            size = upload.as_ref().map(UploadedFile::size).unwrap_or(0),
        );

        async move {
            let draft = self.build_draft(upload).await?;
            let report = self.db.create_report(&draft)?;
            info!(
                id = report.id,
                title = %report.title,
                abnormal = report.metrics.abnormal_tests,
                "Report created"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Everything except persistence.
    pub async fn build_draft(&self, upload: Option<UploadedFile>) -> Result<ReportDraft, LabsightError> {
        let upload = upload.ok_or(LabsightError::MissingFile)?;

        if upload.size() > self.max_upload_bytes {
            return Err(LabsightError::FileTooLarge {
                size: upload.size(),
                limit: self.max_upload_bytes,
            });
        }

        // Reject before handing the bytes to a worker thread.
        extraction::classify(&upload.media_type)?;

        let UploadedFile { media_type, bytes, .. } = upload;
        let content = tokio::task::spawn_blocking(move || extraction::extract(&bytes, &media_type))
            .await
            .map_err(|e| LabsightError::Internal(format!("Extraction task failed: {}", e)))??;

        let raw = self.interpreter.interpret(&content).await?;

        let outcome = ParseOutcome::parse(&raw);
        if let ParseOutcome::Fallback(reason) = &outcome {
            warn!(%reason, "Model answer unusable, storing default report");
        }
        Ok(outcome.into_draft())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatRequest, LLMProvider, LLMResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        answer: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LLMProvider for Fixed {
        async fn complete_chat(&self, _request: &ChatRequest) -> Result<LLMResponse, LabsightError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LLMResponse {
                content: self.answer.clone(),
                input_tokens: None,
                output_tokens: None,
                model: "fixed".into(),
            })
        }
        fn provider_name(&self) -> &str { "fixed" }
        fn model_name(&self) -> &str { "fixed" }
    }

    fn analyzer(answer: &str, limit: usize) -> (ReportAnalyzer, Arc<Fixed>, Database) {
        let provider = Arc::new(Fixed { answer: answer.to_string(), calls: AtomicUsize::new(0) });
        let db = Database::in_memory().unwrap();
        let interpreter = Interpreter::new(provider.clone(), "", 1024);
        (ReportAnalyzer::new(db.clone(), interpreter, limit), provider, db)
    }

    fn png(bytes: &[u8]) -> Option<UploadedFile> {
        Some(UploadedFile::new(Some("scan.png".into()), "image/png", bytes.to_vec()))
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (analyzer, provider, db) = analyzer("{}", 1024);
        let err = analyzer.analyze(None).await.unwrap_err();
        assert!(matches!(err, LabsightError::MissingFile));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(db.count_reports().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_skips_model() {
        let (analyzer, provider, db) = analyzer("{}", 1024);
        let upload = UploadedFile::new(None, "text/plain", b"Hemoglobin 14.5".to_vec());
        let err = analyzer.analyze(Some(upload)).await.unwrap_err();
        assert!(matches!(err, LabsightError::UnsupportedMediaType(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(db.count_reports().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload() {
        let (analyzer, provider, _db) = analyzer("{}", 4);
        let err = analyzer.analyze(png(b"12345")).await.unwrap_err();
        assert!(matches!(err, LabsightError::FileTooLarge { size: 5, limit: 4 }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_image_upload_creates_report() {
        let (analyzer, provider, db) = analyzer(r#"{"title": "Urinalysis", "summary": "All clear."}"#, 1024);
        let report = analyzer.analyze(png(b"\x89PNG")).await.unwrap();
        assert_eq!(report.title, "Urinalysis");
        assert_eq!(report.summary, "All clear.");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(db.get_report(report.id).unwrap().unwrap(), report);
    }

    #[tokio::test]
    async fn test_malformed_answer_stores_defaults() {
        let (analyzer, _provider, _db) = analyzer("not json at all", 1024);
        let report = analyzer.analyze(png(b"\x89PNG")).await.unwrap();
        assert_eq!(report.draft(), ReportDraft::default());
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_fatal() {
        let (analyzer, provider, db) = analyzer("{}", 1024);
        let upload = UploadedFile::new(None, "application/pdf", b"%PDF-garbage".to_vec());
        let err = analyzer.analyze(Some(upload)).await.unwrap_err();
        assert!(matches!(err, LabsightError::Extraction(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(db.count_reports().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_uploads_are_not_merged() {
        let (analyzer, provider, db) = analyzer("{}", 1024);
        analyzer.analyze(png(b"same")).await.unwrap();
        analyzer.analyze(png(b"same")).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(db.count_reports().unwrap(), 2);
    }
}
