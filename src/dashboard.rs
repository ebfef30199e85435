// dashboard.rs
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::models::{Poll, PollStatus};
use crate::services::ApiClient;
use crate::session::Session;
use crate::storage::Storage;

pub const DELETE_FAILED: &str = "Failed to delete poll. It may still appear in the list.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [Self::All, Self::Draft, Self::Active, Self::Completed];

    /// Unknown or missing values fall back to `All`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("draft") => Self::Draft,
            Some("active") => Self::Active,
            Some("completed") => Self::Completed,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Polls",
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn matches(self, status: PollStatus) -> bool {
        match self {
            Self::All => true,
            Self::Draft => status == PollStatus::NotStarted,
            Self::Active => status == PollStatus::Open,
            Self::Completed => status == PollStatus::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The API rejected the token; see [`LoadOutcome::apply_to`].
    SessionExpired,
    /// Logged and swallowed; the previous list is kept.
    Failed,
}

impl LoadOutcome {
    /// Forget the stored credential if the API rejected it.
    pub fn apply_to<S: Storage>(self, session: &mut Session<S>) -> Self {
        if self == Self::SessionExpired {
            session.clear();
        }
        self
    }
}

/// The admin's poll list for one page load.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    polls: Vec<Poll>,
    filter: StatusFilter,
    delete_target: Option<String>,
    notice: Option<&'static str>,
}

impl Dashboard {
    pub fn new(filter: StatusFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Replace the list with the polls owned by `token`.
    pub async fn load(&mut self, api: &ApiClient, token: &str) -> LoadOutcome {
        match api.my_questions(token).await {
            Ok(polls) => {
                self.polls = polls;
                LoadOutcome::Loaded
            }
            Err(ApiError::Unauthorized(status)) => {
                warn!(%status, "Session expired. Please login again.");
                LoadOutcome::SessionExpired
            }
            Err(e) => {
                error!("Error fetching polls: {e}");
                LoadOutcome::Failed
            }
        }
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Poll> {
        self.polls
            .iter()
            .filter(move |poll| self.filter.matches(poll.status))
    }

    /// Open the confirmation gate for `id`.
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.delete_target = Some(id.into());
    }

    /// Delete the poll behind the confirmation gate, then reload the list.
    ///
    /// The gate closes and the reload runs whether or not the delete went
    /// through; a failed delete leaves [`DELETE_FAILED`] as the notice.
    /// Returns `None` when no delete was pending.
    pub async fn confirm_delete(&mut self, api: &ApiClient, token: &str) -> Option<LoadOutcome> {
        let id = self.delete_target.take()?;

        match api.delete_question(token, &id).await {
            Ok(()) => {
                info!(poll_id = %id, "poll deleted");
                self.notice = None;
            }
            Err(e) => {
                error!(poll_id = %id, "Error deleting poll: {e}");
                self.notice = Some(DELETE_FAILED);
            }
        }

        Some(self.load(api, token).await)
    }

    /// Message for an empty (filtered) list, `None` when there is something to show.
    pub fn empty_message(&self) -> Option<String> {
        if self.filtered().next().is_some() {
            return None;
        }
        Some(match self.filter {
            StatusFilter::All => {
                "You haven't created any polls yet. Start by creating your first poll!".to_string()
            }
            other => format!(
                "No {} polls found. Try changing the filter or create a new poll.",
                other.as_str()
            ),
        })
    }
}

/// Parse an API timestamp. Zoned values are taken as-is, bare
/// `datetime-local` values are read in the server's zone.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.with_timezone(&Local));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(at) => at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// "Starts in ..." using the coarsest whole unit, `None` once the start has passed.
pub fn time_until_start(raw: &str, now: DateTime<Utc>) -> Option<String> {
    let start = parse_timestamp(raw)?;
    let diff = start.with_timezone(&Utc) - now;
    if diff.num_milliseconds() <= 0 {
        return None;
    }

    let minutes = diff.num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    let plural = |n: i64| if n > 1 { "s" } else { "" };
    Some(if days > 0 {
        format!("Starts in {days} day{}", plural(days))
    } else if hours > 0 {
        format!("Starts in {hours} hour{}", plural(hours))
    } else if minutes > 0 {
        format!("Starts in {minutes} minute{}", plural(minutes))
    } else {
        "Starting soon".to_string()
    })
}
