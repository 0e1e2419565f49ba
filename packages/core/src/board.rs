//! Grouping of the job collection into ordered board columns.

use crate::{Job, JobId, JobState};

/// One column of the board: a stage and the jobs currently placed in it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub stage: JobState,
    pub jobs: Vec<Job>,
}

impl BoardColumn {
    pub fn count(&self) -> usize {
        self.jobs.len()
    }
}

/// Partition jobs into one column per stage, in column order.
///
/// Each column is sorted by `updated_at`, newest first. Jobs without a
/// timestamp sort after every job that has one; ties keep input order.
pub fn group_by_stage(jobs: &[Job]) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = JobState::ALL
        .into_iter()
        .map(|stage| BoardColumn {
            stage,
            jobs: Vec::new(),
        })
        .collect();

    for job in jobs {
        // ALL is in declaration order, so the discriminant is the column index.
        columns[job.stage() as usize].jobs.push(job.clone());
    }

    for column in &mut columns {
        // `None` orders below every timestamp, so untimed jobs end up last.
        column.jobs.sort_by_key(|job| std::cmp::Reverse(job.updated_at));
    }

    columns
}

/// A requested move of one job into a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChange {
    pub id: JobId,
    pub to: JobState,
}

/// Translate the end of a drag into a stage change.
///
/// `destination` is the column id the card was dropped on, or `None` when
/// the drag ended outside every column. Unknown column ids are ignored.
pub fn resolve_drop(id: &JobId, destination: Option<&str>) -> Option<StageChange> {
    let to = destination?.parse::<JobState>().ok()?;
    Some(StageChange { id: id.clone(), to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn job(id: &str, state: Option<JobState>, minute: Option<u32>) -> Job {
        let mut job = Job::new(id, format!("title {id}"), "Acme", "https://example.com");
        job.state = state;
        job.updated_at = minute.map(|m| Utc.with_ymd_and_hms(2025, 3, 1, 10, m, 0).unwrap());
        job
    }

    fn ids(column: &BoardColumn) -> Vec<&str> {
        column.jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn unknown_and_missing_states_land_in_new() {
        let jobs: Vec<Job> = serde_json::from_str(
            r#"[{"id":1,"state":"new"},{"id":2,"state":"bogus"},{"id":3,"state":"applied"}]"#,
        )
        .unwrap();

        let columns = group_by_stage(&jobs);
        let new = &columns[0];
        let applied = &columns[2];

        assert_eq!(new.stage, JobState::New);
        assert_eq!(ids(new), vec!["1", "2"]);
        assert_eq!(applied.stage, JobState::Applied);
        assert_eq!(ids(applied), vec!["3"]);
    }

    #[test]
    fn columns_follow_stage_order_and_counts_match() {
        let jobs = vec![
            job("a", Some(JobState::Trash), None),
            job("b", None, None),
            job("c", Some(JobState::Offer), None),
            job("d", Some(JobState::Trash), None),
        ];

        let columns = group_by_stage(&jobs);
        let stages: Vec<JobState> = columns.iter().map(|c| c.stage).collect();
        assert_eq!(stages, JobState::ALL.to_vec());

        let total: usize = columns.iter().map(BoardColumn::count).sum();
        assert_eq!(total, jobs.len());
        assert_eq!(columns[6].count(), 2);
        assert_eq!(columns[4].count(), 1);
        assert_eq!(columns[0].count(), 1);
    }

    #[test]
    fn columns_sort_newest_first_with_untimed_last() {
        let jobs = vec![
            job("old", Some(JobState::Saved), Some(1)),
            job("untimed-1", Some(JobState::Saved), None),
            job("newest", Some(JobState::Saved), Some(30)),
            job("untimed-2", Some(JobState::Saved), None),
            job("mid", Some(JobState::Saved), Some(15)),
        ];

        let columns = group_by_stage(&jobs);
        assert_eq!(
            ids(&columns[1]),
            vec!["newest", "mid", "old", "untimed-1", "untimed-2"]
        );
    }

    #[test]
    fn drop_outside_columns_is_ignored() {
        let id = JobId::from("42");
        assert_eq!(resolve_drop(&id, None), None);
        assert_eq!(resolve_drop(&id, Some("nowhere")), None);
        assert_eq!(
            resolve_drop(&id, Some("interview")),
            Some(StageChange {
                id: id.clone(),
                to: JobState::Interview
            })
        );
    }
}
