// browser.rs
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::form::CreatePollForm;
use crate::poll::VotingWidget;
use crate::session::Session;
use crate::state::AppState;
use crate::storage::MemoryStorage;

pub const BROWSER_COOKIE: &str = "sid";

/// Everything one browser would keep client-side.
#[derive(Debug)]
pub struct Browser {
    pub session: Session<MemoryStorage>,
    pub voting: VotingWidget,
    pub create_form: CreatePollForm,
}

impl Default for Browser {
    fn default() -> Self {
        Self {
            session: Session::new(MemoryStorage::new()),
            voting: VotingWidget::fixture(),
            create_form: CreatePollForm::default(),
        }
    }
}

/// Request extension handed to every handler.
#[derive(Debug, Clone)]
pub struct BrowserHandle(Arc<Mutex<Browser>>);

impl BrowserHandle {
    pub async fn lock(&self) -> MutexGuard<'_, Browser> {
        self.0.lock().await
    }
}

#[derive(Debug)]
struct Entry {
    handle: BrowserHandle,
    last_seen: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct Browsers {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl Browsers {
    /// The record behind `id`, or a fresh one under a newly minted id when
    /// `id` is missing or was never issued here. The flag is `true` when the
    /// id is new and the browser has to be told about it.
    pub async fn resolve(&self, id: Option<Uuid>) -> (Uuid, BrowserHandle, bool) {
        let mut browsers = self.inner.write().await;

        if let Some(id) = id {
            if let Some(entry) = browsers.get_mut(&id) {
                entry.last_seen = Instant::now();
                return (id, entry.handle.clone(), false);
            }
        }

        let id = Uuid::new_v4();
        let handle = BrowserHandle(Arc::new(Mutex::new(Browser::default())));
        browsers.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(%id, "new browser");
        (id, handle, true)
    }

    /// Drop records not seen for `idle` or longer. Returns how many went.
    pub async fn prune(&self, idle: Duration) -> usize {
        let mut browsers = self.inner.write().await;
        let before = browsers.len();
        browsers.retain(|_, entry| entry.last_seen.elapsed() < idle);
        before - browsers.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Prune idle browser records every `idle / 4` for the life of the process.
pub fn spawn_pruner(browsers: Browsers, idle: Duration) {
    let period = (idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let pruned = browsers.prune(idle).await;
            if pruned > 0 {
                info!(pruned, "dropped idle browsers");
            }
        }
    });
}

pub fn browser_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(BROWSER_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Resolve (or mint) the browser id cookie and attach that browser's record.
pub async fn attach_browser(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let (id, handle, minted) = state.browsers.resolve(browser_id(&jar)).await;
    req.extensions_mut().insert(handle);

    let response = next.run(req).await;
    if !minted {
        return response;
    }

    let cookie = Cookie::build((BROWSER_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure);
    (jar.add(cookie), response).into_response()
}
