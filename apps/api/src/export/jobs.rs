//! Export job registry.
//!
//! A job captures an owned input snapshot when it starts, so later session edits
//! never leak into a running export. Rendering happens on a spawned task; the
//! registry lock is only held to record the outcome.
//!
//! Finished jobs hold their document bytes, so retention is bounded: each new
//! export first drops finished jobs older than the TTL, then the oldest finished
//! jobs beyond the cap. Pending jobs are never evicted.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::report::{build_report, ReportRenderer};
use crate::roi::{Calculation, InputSnapshot};

/// How long a finished job stays downloadable.
const FINISHED_JOB_TTL_MINUTES: i64 = 30;
/// Finished jobs kept at most, across all sessions.
const MAX_FINISHED_JOBS: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportStatus {
    Pending,
    Ready,
    Failed { message: String },
}

#[derive(Debug, Clone)]
struct ExportJob {
    id: Uuid,
    session_id: Uuid,
    status: ExportStatus,
    file_name: String,
    content_type: &'static str,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    bytes: Option<Bytes>,
}

/// What clients see of a job; never includes the document bytes.
#[derive(Debug, Clone, Serialize)]
pub struct ExportJobView {
    pub job_id: Uuid,
    pub session_id: Uuid,
    #[serde(flatten)]
    pub status: ExportStatus,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub size_bytes: Option<usize>,
}

impl From<&ExportJob> for ExportJobView {
    fn from(job: &ExportJob) -> Self {
        Self {
            job_id: job.id,
            session_id: job.session_id,
            status: job.status.clone(),
            file_name: job.file_name.clone(),
            created_at: job.created_at,
            completed_at: job.completed_at,
            size_bytes: job.bytes.as_ref().map(Bytes::len),
        }
    }
}

/// A finished document ready to send.
#[derive(Debug, Clone)]
pub struct ExportDownload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct ExportRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, ExportJob>>>,
    ttl: Duration,
    max_finished: usize,
}

impl Default for ExportRegistry {
    fn default() -> Self {
        Self::with_retention(Duration::minutes(FINISHED_JOB_TTL_MINUTES), MAX_FINISHED_JOBS)
    }
}

impl ExportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(ttl: Duration, max_finished: usize) -> Self {
        Self {
            jobs: Arc::default(),
            ttl,
            max_finished,
        }
    }

    /// Registers a pending job and spawns its rendering.
    ///
    /// The returned handle may be dropped; the job finishes regardless.
    pub async fn start(
        &self,
        renderer: Arc<dyn ReportRenderer>,
        session_id: Uuid,
        snapshot: InputSnapshot,
    ) -> (ExportJobView, JoinHandle<()>) {
        let calculation = Calculation::from_snapshot(snapshot);
        let document = build_report(&calculation);
        let job = ExportJob {
            id: Uuid::new_v4(),
            session_id,
            status: ExportStatus::Pending,
            file_name: document.file_name.clone(),
            content_type: renderer.content_type(),
            created_at: Utc::now(),
            completed_at: None,
            bytes: None,
        };
        let job_id = job.id;
        let view = ExportJobView::from(&job);
        {
            let mut jobs = self.jobs.write().await;
            let evicted = evict_finished(&mut jobs, job.created_at - self.ttl, self.max_finished);
            if evicted > 0 {
                debug!(evicted, "Dropped finished exports");
            }
            jobs.insert(job_id, job);
        }
        info!(%job_id, %session_id, "Export started");

        let registry = self.clone();
        let handle = tokio::spawn(async move {
            let result = renderer.render(document).await;
            registry.complete(job_id, result).await;
        });
        (view, handle)
    }

    pub async fn view(&self, job_id: Uuid) -> Result<ExportJobView, AppError> {
        let jobs = self.jobs.read().await;
        jobs.get(&job_id)
            .map(ExportJobView::from)
            .ok_or_else(|| not_found(job_id))
    }

    /// The finished document, or `Conflict` while pending or after a failure.
    pub async fn download(&self, job_id: Uuid) -> Result<ExportDownload, AppError> {
        let jobs = self.jobs.read().await;
        let job = jobs.get(&job_id).ok_or_else(|| not_found(job_id))?;
        match (&job.status, &job.bytes) {
            (ExportStatus::Ready, Some(bytes)) => Ok(ExportDownload {
                file_name: job.file_name.clone(),
                content_type: job.content_type,
                bytes: bytes.clone(),
            }),
            (ExportStatus::Failed { message }, _) => Err(AppError::Conflict(format!(
                "Export {job_id} failed ({message}); start a new export"
            ))),
            _ => Err(AppError::Conflict(format!(
                "Export {job_id} is not ready yet"
            ))),
        }
    }

    /// Drops every job of a deleted session, finished or not.
    pub async fn remove_for_session(&self, session_id: Uuid) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| job.session_id != session_id);
        let removed = before - jobs.len();
        if removed > 0 {
            info!(%session_id, removed, "Removed exports of deleted session");
        }
        removed
    }

    pub async fn count(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn complete(&self, job_id: Uuid, result: Result<Bytes, AppError>) {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&job_id) else {
            warn!(%job_id, "Export finished for an unknown job");
            return;
        };
        job.completed_at = Some(Utc::now());
        match result {
            Ok(bytes) => {
                info!(%job_id, size = bytes.len(), "Export ready");
                job.status = ExportStatus::Ready;
                job.bytes = Some(bytes);
            }
            Err(e) => {
                warn!(%job_id, error = %e, "Export failed");
                job.status = ExportStatus::Failed {
                    message: e.to_string(),
                };
            }
        }
    }
}

/// Removes finished jobs completed at or before `cutoff`, then the oldest
/// finished jobs above `max_finished`. Returns how many were removed.
fn evict_finished(
    jobs: &mut HashMap<Uuid, ExportJob>,
    cutoff: DateTime<Utc>,
    max_finished: usize,
) -> usize {
    let before = jobs.len();
    jobs.retain(|_, job| job.completed_at.map_or(true, |done| done > cutoff));

    let mut finished: Vec<(DateTime<Utc>, Uuid)> = jobs
        .values()
        .filter_map(|job| job.completed_at.map(|done| (done, job.id)))
        .collect();
    if finished.len() > max_finished {
        finished.sort();
        let surplus = finished.len() - max_finished;
        for (_, id) in finished.into_iter().take(surplus) {
            jobs.remove(&id);
        }
    }
    before - jobs.len()
}

fn not_found(job_id: Uuid) -> AppError {
    AppError::NotFound(format!("Export {job_id} not found"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::report::document::{document_text, ReportDocument};

    /// Records the document it was given and returns its text as the "PDF".
    #[derive(Default)]
    pub(crate) struct RecordingRenderer {
        pub seen: Mutex<Vec<ReportDocument>>,
    }

    #[async_trait]
    impl ReportRenderer for RecordingRenderer {
        async fn render(&self, document: ReportDocument) -> Result<Bytes, AppError> {
            let text = document_text(&document).join("\n");
            self.seen.lock().unwrap().push(document);
            Ok(Bytes::from(text))
        }
    }

    pub(crate) struct FailingRenderer;

    #[async_trait]
    impl ReportRenderer for FailingRenderer {
        async fn render(&self, _document: ReportDocument) -> Result<Bytes, AppError> {
            Err(AppError::Export("printer on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_job_starts_pending_then_becomes_ready() {
        let registry = ExportRegistry::new();
        let renderer = Arc::new(RecordingRenderer::default());
        let session_id = Uuid::new_v4();
        let (view, handle) = registry
            .start(renderer.clone(), session_id, InputSnapshot::default())
            .await;

        assert_eq!(view.status, ExportStatus::Pending);
        assert_eq!(view.session_id, session_id);
        assert_eq!(view.file_name, "GovEagle_ROI_Analysis.pdf");

        handle.await.unwrap();
        let done = registry.view(view.job_id).await.unwrap();
        assert_eq!(done.status, ExportStatus::Ready);
        assert!(done.completed_at.is_some());

        let download = registry.download(view.job_id).await.unwrap();
        assert_eq!(download.content_type, "application/pdf");
        let text = String::from_utf8(download.bytes.to_vec()).unwrap();
        assert!(text.contains("$1,104,040"));
        assert_eq!(Some(download.bytes.len()), done.size_bytes);
    }

    #[tokio::test]
    async fn test_failed_render_is_terminal_for_that_job_only() {
        let registry = ExportRegistry::new();
        let session_id = Uuid::new_v4();
        let (failed, handle) = registry
            .start(Arc::new(FailingRenderer), session_id, InputSnapshot::default())
            .await;
        handle.await.unwrap();

        let view = registry.view(failed.job_id).await.unwrap();
        assert!(matches!(view.status, ExportStatus::Failed { ref message } if message.contains("printer on fire")));
        assert!(matches!(
            registry.download(failed.job_id).await,
            Err(AppError::Conflict(_))
        ));

        // Retrying is simply another export.
        let (retry, handle) = registry
            .start(
                Arc::new(RecordingRenderer::default()),
                session_id,
                InputSnapshot::default(),
            )
            .await;
        handle.await.unwrap();
        assert_eq!(registry.view(retry.job_id).await.unwrap().status, ExportStatus::Ready);
        assert!(matches!(
            registry.view(failed.job_id).await.unwrap().status,
            ExportStatus::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let registry = ExportRegistry::new();
        assert!(matches!(
            registry.view(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            registry.download(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_export_uses_snapshot_taken_at_start() {
        let registry = ExportRegistry::new();
        let renderer = Arc::new(RecordingRenderer::default());
        let mut snapshot = InputSnapshot::default();
        let (_, handle) = registry
            .start(renderer.clone(), Uuid::new_v4(), snapshot.clone())
            .await;
        // Caller keeps editing its own copy; the job already owns its inputs.
        snapshot.hourly_rate = "999".to_string();
        handle.await.unwrap();

        let seen = renderer.seen.lock().unwrap();
        let text = document_text(&seen[0]);
        assert!(text.contains(&"75".to_string()));
        assert!(!text.contains(&"999".to_string()));
    }

    async fn run_export(registry: &ExportRegistry, session_id: Uuid) -> Uuid {
        let (view, handle) = registry
            .start(
                Arc::new(RecordingRenderer::default()),
                session_id,
                InputSnapshot::default(),
            )
            .await;
        handle.await.unwrap();
        view.job_id
    }

    #[tokio::test]
    async fn test_finished_jobs_are_capped() {
        let registry = ExportRegistry::with_retention(Duration::hours(1), 2);
        let session_id = Uuid::new_v4();
        let mut last = Uuid::nil();
        for _ in 0..5 {
            last = run_export(&registry, session_id).await;
        }
        // Two older finished jobs plus the newest one.
        assert_eq!(registry.count().await, 3);
        assert_eq!(registry.view(last).await.unwrap().status, ExportStatus::Ready);
    }

    #[tokio::test]
    async fn test_many_exports_do_not_accumulate() {
        let registry = ExportRegistry::new();
        let session_id = Uuid::new_v4();
        for _ in 0..50 {
            run_export(&registry, session_id).await;
        }
        assert_eq!(registry.count().await, MAX_FINISHED_JOBS + 1);
    }

    #[tokio::test]
    async fn test_expired_jobs_are_dropped_on_next_export() {
        let registry = ExportRegistry::with_retention(Duration::zero(), 100);
        let first = run_export(&registry, Uuid::new_v4()).await;
        let second = run_export(&registry, Uuid::new_v4()).await;
        assert!(matches!(registry.view(first).await, Err(AppError::NotFound(_))));
        assert!(registry.view(second).await.is_ok());
        assert_eq!(registry.count().await, 1);
    }

    #[test]
    fn test_pending_jobs_are_never_evicted() {
        let now = Utc::now();
        let mut jobs = HashMap::new();
        for completed_at in [None, Some(now - Duration::hours(2))] {
            let job = ExportJob {
                id: Uuid::new_v4(),
                session_id: Uuid::new_v4(),
                status: if completed_at.is_some() {
                    ExportStatus::Ready
                } else {
                    ExportStatus::Pending
                },
                file_name: "r.pdf".to_string(),
                content_type: "application/pdf",
                created_at: now - Duration::hours(3),
                completed_at,
                bytes: None,
            };
            jobs.insert(job.id, job);
        }
        assert_eq!(evict_finished(&mut jobs, now - Duration::hours(1), 0), 1);
        assert!(jobs.values().all(|job| job.completed_at.is_none()));
    }

    #[tokio::test]
    async fn test_remove_for_session_only_drops_that_session() {
        let registry = ExportRegistry::new();
        let (gone, kept) = (Uuid::new_v4(), Uuid::new_v4());
        run_export(&registry, gone).await;
        run_export(&registry, gone).await;
        let survivor = run_export(&registry, kept).await;

        assert_eq!(registry.remove_for_session(gone).await, 2);
        assert_eq!(registry.count().await, 1);
        assert!(registry.view(survivor).await.is_ok());
        assert_eq!(registry.remove_for_session(gone).await, 0);
    }

    #[tokio::test]
    async fn test_view_serializes_flat_status() {
        let registry = ExportRegistry::new();
        let (view, handle) = registry
            .start(Arc::new(FailingRenderer), Uuid::new_v4(), InputSnapshot::default())
            .await;
        handle.await.unwrap();
        let view = registry.view(view.job_id).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json["message"].as_str().unwrap().contains("printer on fire"));
        assert!(json["size_bytes"].is_null());
    }
}
