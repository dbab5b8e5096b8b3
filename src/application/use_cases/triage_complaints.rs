use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::application::{Categorizer, ComplaintRepository};
use crate::domain::{Complaint, ComplaintStatus, DomainError};

/// Upper bound on categorizer calls in flight during one triage run.
pub const DEFAULT_TRIAGE_CONCURRENCY: usize = 4;

/// Builds the administrator's working list.
///
/// Complaints without a meaningful category are categorized concurrently, at
/// most `concurrency` at a time, and the label is written back before the list
/// is returned. Completed complaints are hidden and the rest are ordered
/// `Pending` first.
pub struct TriageComplaintsUseCase {
    complaint_repo: Arc<dyn ComplaintRepository>,
    categorizer: Arc<dyn Categorizer>,
    concurrency: usize,
}

impl TriageComplaintsUseCase {
    pub fn new(
        complaint_repo: Arc<dyn ComplaintRepository>,
        categorizer: Arc<dyn Categorizer>,
    ) -> Self {
        Self {
            complaint_repo,
            categorizer,
            concurrency: DEFAULT_TRIAGE_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn execute(&self) -> Result<Vec<Complaint>, DomainError> {
        let start_time = Instant::now();
        let complaints = self.complaint_repo.list().await?;
        let pending_labels = complaints.iter().filter(|c| c.needs_categorization()).count();

        info!(
            "Triaging {} complaints ({} need categorization)",
            complaints.len(),
            pending_labels
        );

        let mut categorized: Vec<(usize, Result<Complaint, DomainError>)> =
            stream::iter(complaints.into_iter().enumerate())
                .map(|(idx, c)| async move { (idx, self.categorize_one(c).await) })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        categorized.sort_by_key(|(idx, _)| *idx);

        let mut open = Vec::with_capacity(categorized.len());
        for (_, complaint) in categorized {
            let complaint = complaint?;
            if complaint.status() != ComplaintStatus::Completed {
                open.push(complaint);
            }
        }

        // Stable sort keeps newest-first order within each status
        open.sort_by_key(|c| c.status().priority());

        info!(
            "Triage produced {} open complaints in {:?}",
            open.len(),
            start_time.elapsed()
        );

        Ok(open)
    }

    async fn categorize_one(&self, mut complaint: Complaint) -> Result<Complaint, DomainError> {
        if !complaint.needs_categorization() {
            return Ok(complaint);
        }

        let label = self
            .categorizer
            .categorize(&complaint.categorization_text())
            .await;
        debug!(
            complaint = complaint.complaint_id(),
            category = %label,
            "Categorized complaint"
        );

        if let Err(e) = self
            .complaint_repo
            .update_category(complaint.id(), &label)
            .await
        {
            warn!(
                "Failed to store category for {}: {}",
                complaint.complaint_id(),
                e
            );
            return Err(e);
        }

        complaint.set_category(label);
        Ok(complaint)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::connector::InMemoryComplaintRepository;

    struct FixedCategorizer {
        label: &'static str,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Categorizer for FixedCategorizer {
        async fn categorize(&self, _text: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.label.to_string()
        }
    }

    fn complaint(id: &str, category: &str, status: ComplaintStatus, created_at: i64) -> Complaint {
        Complaint::reconstitute(
            id.to_string(),
            format!("CMP{id}"),
            "student-1".to_string(),
            format!("title {id}"),
            format!("description {id}"),
            category.to_string(),
            String::new(),
            String::new(),
            None,
            status,
            created_at,
        )
    }

    #[derive(Default)]
    struct SlowCategorizer {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Categorizer for SlowCategorizer {
        async fn categorize(&self, _text: &str) -> String {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            "Electrical".to_string()
        }
    }

    #[tokio::test]
    async fn categorizes_only_unlabelled_complaints_and_persists_labels() {
        let repo = Arc::new(InMemoryComplaintRepository::new());
        repo.save(&complaint("1", "", ComplaintStatus::Pending, 10)).await.unwrap();
        repo.save(&complaint("2", "Other", ComplaintStatus::Pending, 20)).await.unwrap();
        repo.save(&complaint("3", "Furniture", ComplaintStatus::Pending, 30)).await.unwrap();

        let categorizer = Arc::new(FixedCategorizer {
            label: "Plumbing",
            calls: AtomicU32::new(0),
        });
        let use_case = TriageComplaintsUseCase::new(repo.clone(), categorizer.clone());

        let list = use_case.execute().await.unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(categorizer.calls.load(Ordering::SeqCst), 2);
        let stored = repo.find_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored.category(), "Plumbing");
        let untouched = repo.find_by_id("3").await.unwrap().unwrap();
        assert_eq!(untouched.category(), "Furniture");
    }

    #[tokio::test]
    async fn hides_completed_and_orders_by_status() {
        let repo = Arc::new(InMemoryComplaintRepository::new());
        repo.save(&complaint("a", "Network", ComplaintStatus::InProgress, 40)).await.unwrap();
        repo.save(&complaint("b", "Network", ComplaintStatus::Completed, 30)).await.unwrap();
        repo.save(&complaint("c", "Network", ComplaintStatus::Pending, 20)).await.unwrap();
        repo.save(&complaint("d", "Network", ComplaintStatus::Pending, 50)).await.unwrap();

        let categorizer = Arc::new(FixedCategorizer {
            label: "Other",
            calls: AtomicU32::new(0),
        });
        let use_case = TriageComplaintsUseCase::new(repo, categorizer);

        let ids: Vec<String> = use_case
            .execute()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id().to_string())
            .collect();

        assert_eq!(ids, vec!["d", "c", "a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn caps_categorizer_calls_in_flight() {
        let repo = Arc::new(InMemoryComplaintRepository::new());
        for i in 0..10 {
            repo.save(&complaint(&i.to_string(), "", ComplaintStatus::Pending, i))
                .await
                .unwrap();
        }

        let categorizer = Arc::new(SlowCategorizer::default());
        let use_case =
            TriageComplaintsUseCase::new(repo.clone(), categorizer.clone()).with_concurrency(2);

        let list = use_case.execute().await.unwrap();

        assert_eq!(list.len(), 10);
        assert!(list.iter().all(|c| c.category() == "Electrical"));
        assert_eq!(categorizer.peak.load(Ordering::SeqCst), 2);
        let ids: Vec<&str> = list.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["9", "8", "7", "6", "5", "4", "3", "2", "1", "0"]);
    }

    #[test]
    fn zero_concurrency_is_raised_to_one() {
        let use_case = TriageComplaintsUseCase::new(
            Arc::new(InMemoryComplaintRepository::new()),
            Arc::new(SlowCategorizer::default()),
        )
        .with_concurrency(0);
        assert_eq!(use_case.concurrency, 1);
    }
}
