mod common;

use chrono::{TimeDelta, TimeZone, Utc};
use std::error::Error;
use tracker_core::{Job, JobId, JobState};

use db::{DbError, repositories::JobRepository};

async fn reset_db() -> Result<(), DbError> {
    let db_conn = db::get_db()?;
    db_conn
        .query("DELETE job_state_history; DELETE job;")
        .await?;
    Ok(())
}

// One test body: the in-memory engine lives on the runtime that opened it.
#[tokio::test]
async fn test_job_repository() -> Result<(), Box<dyn Error>> {
    let _guard = common::setup_db().await?;

    // upsert/get
    let job = Job::new("acme-1", "Rust Developer", "Acme", "https://acme.example/1")
        .with_description("Build things")
        .with_country("Finland");
    let stored = JobRepository::upsert(&job).await?;
    assert_eq!(stored.id, JobId::from("acme-1"));
    assert_eq!(stored.stage(), JobState::New);
    assert!(stored.updated_at.is_some(), "new jobs get a timestamp");

    let loaded = JobRepository::get(&job.id).await?;
    assert_eq!(loaded.title, "Rust Developer");
    assert_eq!(loaded.description.as_deref(), Some("Build things"));
    assert_eq!(loaded.country.as_deref(), Some("Finland"));
    assert_eq!(loaded.notes, None);

    let missing = JobRepository::get(&JobId::from("missing")).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));

    // set_state/set_notes write history
    let moved = JobRepository::set_state(&job.id, JobState::Applied).await?;
    assert_eq!(moved.stage(), JobState::Applied);
    assert!(moved.updated_at >= stored.updated_at);

    let noted = JobRepository::set_notes(&job.id, "Recruiter: Jane").await?;
    assert_eq!(noted.notes.as_deref(), Some("Recruiter: Jane"));
    assert_eq!(noted.stage(), JobState::Applied);

    let interviewing = JobRepository::set_state(&job.id, JobState::Interview).await?;
    assert_eq!(interviewing.notes.as_deref(), Some("Recruiter: Jane"));

    let history = JobRepository::history(&job.id).await?;
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|entry| entry.job_id == job.id));
    let states: Vec<JobState> = history.iter().map(|entry| entry.state).collect();
    assert_eq!(
        states,
        vec![JobState::Applied, JobState::Applied, JobState::Interview]
    );
    // Only the notes edit carries notes; stage moves do not repeat them.
    let notes: Vec<Option<&str>> = history.iter().map(|entry| entry.notes.as_deref()).collect();
    assert_eq!(notes, vec![None, Some("Recruiter: Jane"), None]);
    assert!(history[0].timestamp <= history[1].timestamp);
    assert!(history[1].timestamp <= history[2].timestamp);

    let missing_state = JobRepository::set_state(&JobId::from("missing"), JobState::Offer).await;
    assert!(matches!(missing_state, Err(DbError::NotFound(_))));
    let missing_notes = JobRepository::set_notes(&JobId::from("missing"), "x").await;
    assert!(matches!(missing_notes, Err(DbError::NotFound(_))));

    // Re-importing a listing keeps the pipeline fields
    let relisted = Job::new("acme-1", "Senior Rust Developer", "Acme", "https://acme.example/1");
    let refreshed = JobRepository::upsert(&relisted).await?;
    assert_eq!(refreshed.title, "Senior Rust Developer");
    assert_eq!(refreshed.stage(), JobState::Interview);
    assert_eq!(refreshed.notes.as_deref(), Some("Recruiter: Jane"));
    assert_eq!(refreshed.updated_at, interviewing.updated_at);

    // list with and without a cutoff
    reset_db().await?;
    let now = Utc::now();
    let hours_ago = |h| now - TimeDelta::hours(h);
    JobRepository::upsert(&Job::new("fresh", "Fresh", "A", "").with_updated_at(hours_ago(1))).await?;
    JobRepository::upsert(&Job::new("day", "Day", "B", "").with_updated_at(hours_ago(20))).await?;
    JobRepository::upsert(&Job::new("week", "Week", "C", "").with_updated_at(hours_ago(100))).await?;
    JobRepository::upsert(
        &Job::new("old", "Old", "D", "")
            .with_updated_at(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
    )
    .await?;

    let all = JobRepository::list(None).await?;
    let ids: Vec<&str> = all.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["fresh", "day", "week", "old"]);

    let recent = JobRepository::list(Some(hours_ago(24))).await?;
    let ids: Vec<&str> = recent.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["fresh", "day"]);

    let none = JobRepository::list(Some(now + TimeDelta::hours(1))).await?;
    assert!(none.is_empty());

    // stored unknown stages read back as unset
    db::get_db()?
        .query("UPDATE job:old SET state = 'archived'")
        .await?
        .check()?;
    let odd = JobRepository::get(&JobId::from("old")).await?;
    assert_eq!(odd.state, None);
    assert_eq!(odd.stage(), JobState::New);

    Ok(())
}
