// form.rs
use std::str::FromStr;

use tracing::{error, info};

use crate::error::{ApiError, AppError};
use crate::models::CreatePollRequest;

pub const MIN_OPTIONS: usize = 2;

/// State of the "create poll" form for one browser.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePollForm {
    pub question_text: String,
    options: Vec<String>,
    pub start_time: String,
    pub duration: String,
    is_submitting: bool,
}

impl Default for CreatePollForm {
    fn default() -> Self {
        Self {
            question_text: String::new(),
            options: vec![String::new(); MIN_OPTIONS],
            start_time: String::new(),
            duration: String::new(),
            is_submitting: false,
        }
    }
}

impl CreatePollForm {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn can_remove_option(&self) -> bool {
        self.options.len() > MIN_OPTIONS
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Drop the option at `index`. Never goes below [`MIN_OPTIONS`].
    pub fn remove_option(&mut self, index: usize) -> bool {
        if !self.can_remove_option() || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    pub fn update_option(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Overwrite the editable fields with what the browser posted.
    pub fn load_fields(&mut self, fields: PollFormFields) {
        self.question_text = fields.question_text;
        self.options
            .resize(fields.options.len().max(MIN_OPTIONS), String::new());
        for (index, value) in fields.options.into_iter().enumerate() {
            self.update_option(index, value);
        }
        self.start_time = fields.start_time;
        self.duration = fields.duration;
    }

    /// Positive whole minutes, or `None`.
    pub fn parsed_duration(&self) -> Option<u32> {
        self.duration.trim().parse::<u32>().ok().filter(|d| *d > 0)
    }

    /// Options with something other than whitespace in them, as typed.
    pub fn filled_options(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| !o.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.question_text.trim().is_empty()
            && self.filled_options().len() >= MIN_OPTIONS
            && !self.start_time.is_empty()
            && self.parsed_duration().is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_submitting
    }

    /// Mark the form in flight and build the upload body. `None` when the
    /// form is invalid or a submission is already running.
    pub fn begin_submit(&mut self) -> Option<CreatePollRequest> {
        if !self.can_submit() {
            return None;
        }
        let duration = self.parsed_duration()?;
        self.is_submitting = true;

        Some(CreatePollRequest {
            question: self.question_text.clone(),
            options: self.filled_options(),
            start_time: self.start_time.clone(),
            duration,
        })
    }

    /// Settle a submission and report whether the poll was created.
    ///
    /// Success resets the form; failures are logged and leave it as it was.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> bool {
        self.is_submitting = false;
        match result {
            Ok(()) => {
                info!(question = %self.question_text, "poll created");
                *self = Self::default();
                true
            }
            Err(e) => {
                error!("Error creating poll: {e}");
                false
            }
        }
    }
}

/// Editable fields as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollFormFields {
    pub question_text: String,
    pub options: Vec<String>,
    pub start_time: String,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    AddOption,
    RemoveOption(usize),
    Submit,
}

impl FromStr for FormAction {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "add" => Ok(Self::AddOption),
            "submit" => Ok(Self::Submit),
            _ => raw
                .strip_prefix("remove:")
                .and_then(|index| index.parse().ok())
                .map(Self::RemoveOption)
                .ok_or_else(|| AppError::MalformedForm(format!("unknown action {raw:?}"))),
        }
    }
}

/// Split a posted create-poll form into its fields and the button pressed.
/// Options arrive as repeated `option` pairs in display order.
pub fn parse_submission(pairs: Vec<(String, String)>) -> Result<(PollFormFields, FormAction), AppError> {
    let mut fields = PollFormFields::default();
    let mut action = None;

    for (key, value) in pairs {
        match key.as_str() {
            "question" => fields.question_text = value,
            "option" => fields.options.push(value),
            "start_time" => fields.start_time = value,
            "duration" => fields.duration = value,
            "action" => action = Some(value.parse()?),
            _ => {}
        }
    }

    // Enter in a text field submits without naming a button
    Ok((fields, action.unwrap_or(FormAction::Submit)))
}
