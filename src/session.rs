// session.rs
use tracing::debug;

use crate::storage::Storage;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

/// The one place that reads or writes the stored credential.
///
/// Every page and API call goes through this holder; nothing else touches the
/// `token` / `username` storage keys.
#[derive(Debug, Default, Clone)]
pub struct Session<S> {
    storage: S,
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<&str> {
        self.storage.get_item(TOKEN_KEY)
    }

    /// Token for the `Authorization: Bearer` header. Empty when signed out;
    /// the API answers that with 401.
    pub fn bearer(&self) -> &str {
        self.token().unwrap_or_default()
    }

    pub fn username(&self) -> Option<&str> {
        self.storage.get_item(USERNAME_KEY)
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&mut self, token: String, username: String) {
        debug!(%username, "storing session");
        self.storage.set_item(TOKEN_KEY, token);
        self.storage.set_item(USERNAME_KEY, username);
    }

    pub fn clear(&mut self) {
        debug!("clearing session");
        self.storage.remove_item(TOKEN_KEY);
        self.storage.remove_item(USERNAME_KEY);
    }

    /// Name for the shell greeting.
    ///
    /// The stored `username` value is read as a record carrying its own
    /// `username` field. A bare string has no such field and yields `None`.
    pub fn greeting_name(&self) -> Option<String> {
        let raw = self.username()?;
        let record: serde_json::Value = serde_json::from_str(raw).ok()?;
        record.get("username")?.as_str().map(str::to_owned)
    }
}
