//! Integration tests for the JSON-file complaint store and the triage flow
//! running on top of it.

use std::sync::Arc;

use tempfile::TempDir;

use campusfix::{
    Complaint, ComplaintRepository, ComplaintStatus, JsonFileComplaintRepository, LlmCategorizer,
    MockChatClient, NewComplaint, SubmitComplaintUseCase, TriageComplaintsUseCase,
    UpdateComplaintStatusUseCase,
};

fn stored(id: &str, title: &str, category: &str, status: ComplaintStatus, at: i64) -> Complaint {
    Complaint::reconstitute(
        id.to_string(),
        format!("CMP{}", 100_000 + at),
        "student-1".to_string(),
        title.to_string(),
        format!("{title} reported by a student"),
        category.to_string(),
        String::new(),
        String::new(),
        None,
        status,
        at,
    )
}

#[tokio::test]
async fn test_missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complaints.json");
    let repo = JsonFileComplaintRepository::open(&path).await.unwrap();

    assert!(repo.list().await.unwrap().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_writes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complaints.json");

    {
        let repo = JsonFileComplaintRepository::open(&path).await.unwrap();
        repo.save(&stored("a", "Broken chair", "Furniture", ComplaintStatus::Pending, 10))
            .await
            .unwrap();
        repo.save(&stored("b", "Dusty corridor", "", ComplaintStatus::Pending, 20))
            .await
            .unwrap();
        repo.update_category("b", "Cleanliness").await.unwrap();
        repo.update_status("a", ComplaintStatus::InProgress)
            .await
            .unwrap();
    }

    let reopened = JsonFileComplaintRepository::open(&path).await.unwrap();
    let all = reopened.list().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id(), "b", "newest complaint comes first");
    assert_eq!(all[0].category(), "Cleanliness");
    assert_eq!(all[1].status(), ComplaintStatus::InProgress);
    assert!(!dir.path().join("complaints.json.tmp").exists());
}

#[tokio::test]
async fn test_stored_document_uses_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complaints.json");
    let repo = JsonFileComplaintRepository::open(&path).await.unwrap();

    repo.save(&stored("a", "Tap leak", "Plumbing", ComplaintStatus::InProgress, 5))
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["complaintId"], "CMP100005");
    assert_eq!(raw[0]["userId"], "student-1");
    assert_eq!(raw[0]["status"], "In Progress");
    assert_eq!(raw[0]["createdAt"], 5);
}

#[tokio::test]
async fn test_failed_write_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir(&data_dir).unwrap();
    let repo = JsonFileComplaintRepository::open(data_dir.join("complaints.json"))
        .await
        .unwrap();
    repo.save(&stored("a", "Fan", "Electrical", ComplaintStatus::Pending, 1))
        .await
        .unwrap();

    std::fs::remove_dir_all(&data_dir).unwrap();

    assert!(repo
        .update_status("a", ComplaintStatus::Completed)
        .await
        .is_err());
    assert!(repo.update_category("a", "Furniture").await.is_err());
    assert!(repo
        .save(&stored("b", "Leak", "Plumbing", ComplaintStatus::Pending, 2))
        .await
        .is_err());

    let a = repo.find_by_id("a").await.unwrap().unwrap();
    assert_eq!(a.status(), ComplaintStatus::Pending);
    assert_eq!(a.category(), "Electrical");
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileComplaintRepository::open(dir.path().join("complaints.json"))
        .await
        .unwrap();

    let err = repo.update_category("missing", "Network").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_corrupt_file_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complaints.json");
    std::fs::write(&path, "[{ not json").unwrap();

    let err = JsonFileComplaintRepository::open(&path)
        .await
        .err()
        .expect("corrupt file should not open");
    assert_eq!(err.kind(), "storage");
}

#[tokio::test]
async fn test_illegal_transition_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complaints.json");
    let repo = Arc::new(JsonFileComplaintRepository::open(&path).await.unwrap());
    repo.save(&stored("a", "Fan", "Electrical", ComplaintStatus::Completed, 1))
        .await
        .unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let use_case = UpdateComplaintStatusUseCase::new(repo.clone());
    let err = use_case
        .execute("a", ComplaintStatus::Pending)
        .await
        .unwrap_err();

    assert!(err.is_invalid_input());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_triage_persists_labels_and_hides_completed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("complaints.json");
    let repo = Arc::new(JsonFileComplaintRepository::open(&path).await.unwrap());

    repo.save(&stored("old", "Leaking pipe needs plumbing", "", ComplaintStatus::InProgress, 1))
        .await
        .unwrap();
    repo.save(&stored("mid", "Network down in lab", "Other", ComplaintStatus::Pending, 2))
        .await
        .unwrap();
    repo.save(&stored("done", "Broken bench", "Furniture", ComplaintStatus::Completed, 3))
        .await
        .unwrap();
    repo.save(&stored("new", "Flickering light", "Electrical", ComplaintStatus::Pending, 4))
        .await
        .unwrap();

    let categorizer = Arc::new(LlmCategorizer::new(Arc::new(MockChatClient::new())));
    let triage = TriageComplaintsUseCase::new(repo.clone(), categorizer);
    let open = triage.execute().await.unwrap();

    let ids: Vec<&str> = open.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
    assert_eq!(open[1].category(), "Network");
    assert_eq!(open[2].category(), "Plumbing");

    let reopened = JsonFileComplaintRepository::open(&path).await.unwrap();
    let mid = reopened.find_by_id("mid").await.unwrap().unwrap();
    assert_eq!(mid.category(), "Network");
}

#[tokio::test]
async fn test_submitted_complaints_are_listed_per_user() {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(
        JsonFileComplaintRepository::open(dir.path().join("complaints.json"))
            .await
            .unwrap(),
    );
    let submit = SubmitComplaintUseCase::new(repo.clone());

    let filed = submit
        .execute(NewComplaint {
            user_id: "student-7".to_string(),
            title: "Projector broken".to_string(),
            description: "Classroom projector shows no image".to_string(),
            category: Some("Classroom".to_string()),
            room: Some("B-204".to_string()),
            which_lab: Some("ignored".to_string()),
            image_url: Some("https://files.example.edu/evidence/1.jpg".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(filed.room(), "B-204");
    assert_eq!(filed.which_lab(), "");

    let mine = submit.list_for_user("student-7").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id(), filed.id());
    assert!(submit.list_for_user("someone-else").await.unwrap().is_empty());
    assert!(submit.list_for_user("").await.unwrap().is_empty());
}
