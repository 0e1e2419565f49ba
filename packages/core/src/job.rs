//! Job posting types and the pipeline stages a posting moves through.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Server-assigned identifier of a job posting.
///
/// The backend hands these out as opaque strings, but older exports use
/// integers, so both are accepted when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => JobId(s),
            RawId::Signed(n) => JobId(n.to_string()),
            RawId::Unsigned(n) => JobId(n.to_string()),
        })
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job state: {0:?}")]
pub struct ParseStateError(pub String);

/// Pipeline stage of a job. Declaration order is board column order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[default]
    New,
    Saved,
    Applied,
    Interview,
    Offer,
    Rejected,
    Trash,
}

impl JobState {
    /// All stages in column order.
    pub const ALL: [JobState; 7] = [
        JobState::New,
        JobState::Saved,
        JobState::Applied,
        JobState::Interview,
        JobState::Offer,
        JobState::Rejected,
        JobState::Trash,
    ];

    /// Wire name, also used as the column id.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::New => "new",
            JobState::Saved => "saved",
            JobState::Applied => "applied",
            JobState::Interview => "interview",
            JobState::Offer => "offer",
            JobState::Rejected => "rejected",
            JobState::Trash => "trash",
        }
    }

    /// Column heading shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            JobState::New => "Inbox",
            JobState::Saved => "Saved",
            JobState::Applied => "Applied",
            JobState::Interview => "Interview",
            JobState::Offer => "Offer",
            JobState::Rejected => "Rejected",
            JobState::Trash => "Trash",
        }
    }

    /// The board is free-form: any stage may follow any other.
    pub fn can_transition_to(&self, _next: JobState) -> bool {
        true
    }
}

impl std::str::FromStr for JobState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown recency window: {0:?}")]
pub struct ParseWindowError(pub String);

/// Restricts the job collection to postings updated within a time range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecencyWindow {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "12h")]
    Hours12,
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "48h")]
    Hours48,
    #[serde(rename = "7d")]
    Days7,
}

impl RecencyWindow {
    pub const ALL: [RecencyWindow; 5] = [
        RecencyWindow::All,
        RecencyWindow::Hours12,
        RecencyWindow::Hours24,
        RecencyWindow::Hours48,
        RecencyWindow::Days7,
    ];

    /// Value of the `range` query parameter; `None` means unrestricted.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            RecencyWindow::All => None,
            RecencyWindow::Hours12 => Some("12h"),
            RecencyWindow::Hours24 => Some("24h"),
            RecencyWindow::Hours48 => Some("48h"),
            RecencyWindow::Days7 => Some("7d"),
        }
    }

    /// Value used by `<select>` options.
    pub fn as_str(&self) -> &'static str {
        self.as_param().unwrap_or("all")
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecencyWindow::All => "All time",
            RecencyWindow::Hours12 => "Last 12 hours",
            RecencyWindow::Hours24 => "Last 24 hours",
            RecencyWindow::Hours48 => "Last 48 hours",
            RecencyWindow::Days7 => "Last 7 days",
        }
    }

    pub fn duration(&self) -> Option<TimeDelta> {
        match self {
            RecencyWindow::All => None,
            RecencyWindow::Hours12 => Some(TimeDelta::hours(12)),
            RecencyWindow::Hours24 => Some(TimeDelta::hours(24)),
            RecencyWindow::Hours48 => Some(TimeDelta::hours(48)),
            RecencyWindow::Days7 => Some(TimeDelta::days(7)),
        }
    }

    /// Oldest `updated_at` still inside the window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|d| now - d)
    }
}

impl std::str::FromStr for RecencyWindow {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(RecencyWindow::All),
            other => RecencyWindow::ALL
                .into_iter()
                .find(|w| w.as_param() == Some(other))
                .ok_or_else(|| ParseWindowError(other.to_string())),
        }
    }
}

impl std::fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting under tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: JobId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Stage as received; unrecognized values decode to `None`.
    #[serde(default, deserialize_with = "lenient_state")]
    pub state: Option<JobState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a job in the `new` stage with no optional fields set.
    pub fn new(
        id: impl Into<JobId>,
        title: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: company.into(),
            url: url.into(),
            description: None,
            long_description: None,
            full_description: None,
            content: None,
            country: None,
            state: Some(JobState::New),
            notes: None,
            updated_at: None,
        }
    }

    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Stage used for board placement. Missing or unknown states show as `new`.
    pub fn stage(&self) -> JobState {
        self.state.unwrap_or(JobState::New)
    }

    /// First non-blank description among the fields ingestion may fill.
    pub fn description_text(&self) -> Option<&str> {
        [
            &self.description,
            &self.long_description,
            &self.full_description,
            &self.content,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|text| !text.trim().is_empty())
    }

    /// Notes, treating an empty string as absent.
    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }

    pub fn flag(&self) -> Option<String> {
        self.country.as_deref().and_then(flag_for_country)
    }
}

/// Parse the timestamp formats the backend has produced over time.
///
/// Naive timestamps are taken to be UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn lenient_state<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<JobState>, D::Error> {
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(JsonValue::as_str)
        .and_then(|s| s.parse().ok()))
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(JsonValue::as_str)
        .and_then(parse_timestamp))
}

/// Flag emoji for an ISO 3166 alpha-2 code or a handful of country names.
pub fn flag_for_country(country: &str) -> Option<String> {
    let country = country.trim();
    let code = match country.to_ascii_lowercase().as_str() {
        "finland" | "suomi" => "FI",
        "sweden" => "SE",
        "norway" => "NO",
        "denmark" => "DK",
        "estonia" => "EE",
        "germany" => "DE",
        "netherlands" => "NL",
        "united kingdom" | "uk" => "GB",
        "ireland" => "IE",
        "france" => "FR",
        "spain" => "ES",
        "poland" => "PL",
        _ => country,
    };

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stage_falls_back_to_new() {
        let json = r#"[
            {"id": 1, "title": "a", "company": "x", "url": "u", "state": "applied"},
            {"id": 2, "title": "b", "company": "x", "url": "u", "state": "bogus"},
            {"id": "3", "title": "c", "company": "x", "url": "u"}
        ]"#;
        let jobs: Vec<Job> = serde_json::from_str(json).unwrap();

        assert_eq!(jobs[0].stage(), JobState::Applied);
        assert_eq!(jobs[1].state, None);
        assert_eq!(jobs[1].stage(), JobState::New);
        assert_eq!(jobs[2].stage(), JobState::New);
        assert_eq!(jobs[0].id.as_str(), "1");
        assert_eq!(jobs[2].id.as_str(), "3");
    }

    #[test]
    fn description_prefers_first_non_blank_field() {
        let mut job = Job::new("1", "Dev", "Acme", "https://example.com");
        assert_eq!(job.description_text(), None);

        job.description = Some("   ".into());
        job.full_description = Some("full text".into());
        job.content = Some("content".into());
        assert_eq!(job.description_text(), Some("full text"));

        job.long_description = Some("long".into());
        assert_eq!(job.description_text(), Some("long"));
    }

    #[test]
    fn timestamps_accept_naive_and_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2025-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-02T05:04:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-02T03:04:05"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-02 03:04:05"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);

        let job: Job =
            serde_json::from_str(r#"{"id": 9, "updated_at": "not a date"}"#).unwrap();
        assert_eq!(job.updated_at, None);
    }

    #[test]
    fn states_parse_from_wire_names() {
        for state in JobState::ALL {
            assert_eq!(state.as_str().parse::<JobState>(), Ok(state));
        }
        assert!("archived".parse::<JobState>().is_err());
        assert!(JobState::Trash.can_transition_to(JobState::New));
        assert_eq!(JobState::New.label(), "Inbox");
    }

    #[test]
    fn recency_window_params() {
        assert_eq!(RecencyWindow::All.as_param(), None);
        assert_eq!(RecencyWindow::Hours24.as_param(), Some("24h"));
        assert_eq!("7d".parse::<RecencyWindow>(), Ok(RecencyWindow::Days7));
        assert_eq!("all".parse::<RecencyWindow>(), Ok(RecencyWindow::All));
        assert!("3w".parse::<RecencyWindow>().is_err());

        let now = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();
        assert_eq!(
            RecencyWindow::Hours12.cutoff(now),
            Some(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(RecencyWindow::All.cutoff(now), None);
    }

    #[test]
    fn flags_from_codes_and_names() {
        assert_eq!(flag_for_country("fi").as_deref(), Some("🇫🇮"));
        assert_eq!(flag_for_country("Finland").as_deref(), Some("🇫🇮"));
        assert_eq!(flag_for_country("Atlantis"), None);
        assert_eq!(flag_for_country(""), None);
    }
}
