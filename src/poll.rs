// poll.rs
use tracing::info;

use crate::models::{PollOption, TeamColors};

/// Share of `votes` in `total`, as a percentage. Zero when nobody has voted.
pub fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    votes as f64 / total as f64 * 100.0
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// The public voting widget: pick one option, then submit once.
#[derive(Debug, Clone)]
pub struct VotingWidget {
    question: String,
    options: Vec<PollOption>,
    selected_option: Option<String>,
    has_voted: bool,
}

/// One row of the results view.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionResult<'a> {
    pub option: &'a PollOption,
    pub percentage: f64,
    /// Award badge. Always the first configured option, whatever the tallies say.
    pub leader: bool,
}

impl VotingWidget {
    pub fn new(question: impl Into<String>, options: Vec<PollOption>) -> Self {
        Self {
            question: question.into(),
            options,
            selected_option: None,
            has_voted: false,
        }
    }

    /// The sample poll shown on the landing page.
    pub fn fixture() -> Self {
        Self::new(
            "Who will win the AFC Championship?",
            vec![
                PollOption {
                    id: "bills".to_string(),
                    text: "Buffalo Bills".to_string(),
                    votes: 3259,
                    logo: "/static/logos/bills.svg".to_string(),
                    colors: TeamColors {
                        primary: "#00338D".to_string(),
                        secondary: "#C60C30".to_string(),
                    },
                },
                PollOption {
                    id: "chiefs".to_string(),
                    text: "Kansas City Chiefs".to_string(),
                    votes: 1247,
                    logo: "/static/logos/chiefs.svg".to_string(),
                    colors: TeamColors {
                        primary: "#E31837".to_string(),
                        secondary: "#FFB81C".to_string(),
                    },
                },
            ],
        )
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    /// Choose an option, replacing any earlier choice. Ignored once the vote
    /// is in, or when `option_id` is not one of this poll's options.
    pub fn select(&mut self, option_id: &str) -> bool {
        if self.has_voted || !self.options.iter().any(|o| o.id == option_id) {
            return false;
        }
        self.selected_option = Some(option_id.to_string());
        true
    }

    pub fn can_submit(&self) -> bool {
        self.selected_option.is_some() && !self.has_voted
    }

    /// Latch the vote. Returns whether this call flipped the latch.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.has_voted = true;
        info!(option = ?self.selected_option, "vote submitted");
        true
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes).sum()
    }

    pub fn results(&self) -> Vec<OptionResult<'_>> {
        let total = self.total_votes();
        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| OptionResult {
                option,
                percentage: percentage(option.votes, total),
                leader: index == 0,
            })
            .collect()
    }
}
