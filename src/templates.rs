// templates.rs
use askama::Template;
use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::dashboard::{format_date, time_until_start, Dashboard, StatusFilter};
use crate::form::CreatePollForm;
use crate::layout::Shell;
use crate::models::PollStatus;
use crate::poll::{format_percentage, VotingWidget};
use crate::routes::DASHBOARD;

/// Site-relative link with escaped path segments.
pub fn local_href(segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return "/".to_string();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

pub fn delete_action(id: &str) -> String {
    local_href(&["admin", "dashboard", "polls", id, "delete"])
}

pub struct OptionView {
    pub id: String,
    pub text: String,
    pub logo: String,
    pub primary: String,
    pub secondary: String,
    pub votes: u64,
    pub percentage: String,
    pub selected: bool,
    pub leader: bool,
}

#[derive(Template)]
#[template(path = "vote.html")]
pub struct VoteTemplate {
    pub question: String,
    pub options: Vec<OptionView>,
    pub has_voted: bool,
    pub can_submit: bool,
    pub total_votes: u64,
}

impl VoteTemplate {
    pub fn new(widget: &VotingWidget) -> Self {
        let selected = widget.selected_option();
        let options = widget
            .results()
            .into_iter()
            .map(|result| OptionView {
                id: result.option.id.clone(),
                text: result.option.text.clone(),
                logo: result.option.logo.clone(),
                primary: result.option.colors.primary.clone(),
                secondary: result.option.colors.secondary.clone(),
                votes: result.option.votes,
                percentage: format_percentage(result.percentage),
                selected: selected == Some(result.option.id.as_str()),
                leader: result.leader,
            })
            .collect();

        Self {
            question: widget.question().to_string(),
            options,
            has_voted: widget.has_voted(),
            can_submit: widget.can_submit(),
            total_votes: widget.total_votes(),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: String,
    /// Empty when there is nothing to report.
    pub message: String,
}

pub struct FilterView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct PollCard {
    /// Fragment id of the card's delete confirmation.
    pub dialog_id: String,
    pub question: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub starts_in: String,
    pub start: String,
    pub duration: u32,
    pub options: Vec<String>,
    pub delete_action: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub shell: Shell,
    pub filters: Vec<FilterView>,
    pub cards: Vec<PollCard>,
    pub empty_message: String,
    pub notice: &'static str,
    pub filter_value: &'static str,
}

impl DashboardTemplate {
    pub fn new(dashboard: &Dashboard, shell: Shell, now: DateTime<Utc>) -> Self {
        let filter = dashboard.filter();
        let filters = StatusFilter::ALL
            .into_iter()
            .map(|f| FilterView {
                value: f.as_str(),
                label: f.label(),
                selected: f == filter,
            })
            .collect();

        let cards = dashboard
            .filtered()
            .enumerate()
            .map(|(index, poll)| PollCard {
                dialog_id: format!("confirm-{}", index + 1),
                question: poll.question_text.clone(),
                status_label: poll.status.label(),
                status_class: status_class(poll.status),
                starts_in: match poll.status {
                    PollStatus::NotStarted => {
                        time_until_start(&poll.start_time, now).unwrap_or_default()
                    }
                    _ => String::new(),
                },
                start: format_date(&poll.start_time),
                duration: poll.duration,
                options: poll.options.clone(),
                delete_action: delete_action(&poll.id),
            })
            .collect();

        Self {
            shell,
            filters,
            cards,
            empty_message: dashboard.empty_message().unwrap_or_default(),
            notice: dashboard.notice().unwrap_or_default(),
            filter_value: filter.as_str(),
        }
    }
}

fn status_class(status: PollStatus) -> &'static str {
    match status {
        PollStatus::NotStarted => "badge badge-draft",
        PollStatus::Open => "badge badge-active",
        PollStatus::Closed => "badge badge-completed",
    }
}

pub struct OptionInput {
    pub index: usize,
    pub value: String,
}

#[derive(Template)]
#[template(path = "create_poll.html")]
pub struct CreatePollTemplate {
    pub shell: Shell,
    pub question: String,
    pub options: Vec<OptionInput>,
    pub start_time: String,
    pub duration: String,
    pub can_remove: bool,
    pub is_submitting: bool,
    /// A submit was refused because the form is incomplete.
    pub invalid_attempt: bool,
}

impl CreatePollTemplate {
    pub fn new(form: &CreatePollForm, shell: Shell, invalid_attempt: bool) -> Self {
        Self {
            shell,
            question: form.question_text.clone(),
            options: form
                .options()
                .iter()
                .enumerate()
                .map(|(index, value)| OptionInput {
                    index,
                    value: value.clone(),
                })
                .collect(),
            start_time: form.start_time.clone(),
            duration: form.duration.clone(),
            can_remove: form.can_remove_option(),
            is_submitting: form.is_submitting(),
            invalid_attempt,
        }
    }
}

#[derive(Template)]
#[template(path = "created.html")]
pub struct CreatedTemplate {
    pub shell: Shell,
    pub redirect_to: &'static str,
    pub delay_secs: u64,
}

impl CreatedTemplate {
    pub fn new(shell: Shell, delay_secs: u64) -> Self {
        Self {
            shell,
            redirect_to: DASHBOARD,
            delay_secs,
        }
    }
}
