// layout.rs
use crate::routes::{CREATE_POLL, DASHBOARD, LOGIN};
use crate::session::Session;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Header shared by the admin pages: navigation, greeting, logout.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub nav: Vec<NavEntry>,
    pub greeting: String,
    pub signed_in: bool,
}

impl Shell {
    pub fn new<S: Storage>(current_path: &str, session: &Session<S>) -> Self {
        let nav = [("Dashboard", DASHBOARD), ("Create Poll", CREATE_POLL)]
            .into_iter()
            .map(|(label, href)| NavEntry {
                label,
                href,
                active: current_path == href,
            })
            .collect();

        Self {
            nav,
            greeting: session.greeting_name().unwrap_or_default(),
            signed_in: session.is_signed_in(),
        }
    }
}

/// Forget the stored credential. Returns where to send the browser.
pub fn logout<S: Storage>(session: &mut Session<S>) -> &'static str {
    session.clear();
    LOGIN
}
