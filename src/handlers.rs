// handlers.rs
use askama::Template;
use axum::{
    extract::{Extension, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::browser::BrowserHandle;
use crate::dashboard::{Dashboard, LoadOutcome, StatusFilter};
use crate::error::{ApiError, AppResult};
use crate::form::{parse_submission, FormAction};
use crate::layout::{self, Shell};
use crate::routes::{CREATE_POLL, DASHBOARD, HOME, SESSION_EXPIRED_LOGIN};
use crate::state::AppState;
use crate::templates::{
    CreatePollTemplate, CreatedTemplate, DashboardTemplate, LoginTemplate, VoteTemplate,
};

const SESSION_EXPIRED: &str = "Session expired. Please login again.";

fn render<T: Template>(page: T) -> AppResult<Html<String>> {
    Ok(Html(page.render()?))
}

/// Public voting page
pub async fn home(Extension(handle): Extension<BrowserHandle>) -> AppResult<Html<String>> {
    let browser = handle.lock().await;
    render(VoteTemplate::new(&browser.voting))
}

#[derive(Deserialize)]
pub struct SelectForm {
    option: String,
}

pub async fn select_option(
    Extension(handle): Extension<BrowserHandle>,
    Form(form): Form<SelectForm>,
) -> Redirect {
    handle.lock().await.voting.select(&form.option);
    Redirect::to(HOME)
}

pub async fn submit_vote(Extension(handle): Extension<BrowserHandle>) -> Redirect {
    handle.lock().await.voting.submit();
    Redirect::to(HOME)
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    expired: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> AppResult<Html<String>> {
    let message = if query.expired.is_some() { SESSION_EXPIRED } else { "" };
    render(LoginTemplate {
        username: String::new(),
        message: message.to_string(),
    })
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// Exchange credentials for a bearer token and keep it in the browser's session.
pub async fn login(
    State(state): State<AppState>,
    Extension(handle): Extension<BrowserHandle>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() {
        return login_failed(username, "Username and password are required");
    }

    match state.api.login(&username, &form.password).await {
        Ok(token) => {
            info!(%username, "signed in");
            handle.lock().await.session.sign_in(token, username);
            Ok(Redirect::to(DASHBOARD).into_response())
        }
        Err(ApiError::Transport(e)) => {
            error!("Error signing in: {e}");
            login_failed(username, "Unable to reach the server")
        }
        Err(e) => {
            warn!(%username, "login rejected: {e}");
            login_failed(username, "Invalid username or password")
        }
    }
}

fn login_failed(username: String, message: &str) -> AppResult<Response> {
    let page = render(LoginTemplate {
        username,
        message: message.to_string(),
    })?;
    Ok(page.into_response())
}

pub async fn logout(Extension(handle): Extension<BrowserHandle>) -> Redirect {
    let mut browser = handle.lock().await;
    Redirect::to(layout::logout(&mut browser.session))
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    filter: Option<String>,
}

/// Bearer token of the browser, copied out so no API call runs under its lock.
async fn bearer_of(handle: &BrowserHandle) -> String {
    handle.lock().await.session.bearer().to_string()
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(handle): Extension<BrowserHandle>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Response> {
    let token = bearer_of(&handle).await;
    let mut dashboard = Dashboard::new(StatusFilter::parse(query.filter.as_deref()));

    let outcome = dashboard.load(&state.api, &token).await;
    render_dashboard(&dashboard, Some(outcome), &handle).await
}

/// Confirmed delete from a card's confirmation dialog.
pub async fn delete_poll(
    State(state): State<AppState>,
    Extension(handle): Extension<BrowserHandle>,
    Path(id): Path<String>,
    Form(form): Form<DashboardQuery>,
) -> AppResult<Response> {
    let token = bearer_of(&handle).await;
    let mut dashboard = Dashboard::new(StatusFilter::parse(form.filter.as_deref()));
    dashboard.request_delete(id);

    let reloaded = dashboard.confirm_delete(&state.api, &token).await;
    render_dashboard(&dashboard, reloaded, &handle).await
}

async fn render_dashboard(
    dashboard: &Dashboard,
    outcome: Option<LoadOutcome>,
    handle: &BrowserHandle,
) -> AppResult<Response> {
    let mut browser = handle.lock().await;
    if let Some(outcome) = outcome {
        if outcome.apply_to(&mut browser.session) == LoadOutcome::SessionExpired {
            return Ok(Redirect::to(SESSION_EXPIRED_LOGIN).into_response());
        }
    }

    let shell = Shell::new(DASHBOARD, &browser.session);
    let page = render(DashboardTemplate::new(dashboard, shell, Utc::now()))?;
    Ok(page.into_response())
}

pub async fn create_poll_page(Extension(handle): Extension<BrowserHandle>) -> AppResult<Html<String>> {
    let browser = handle.lock().await;
    let shell = Shell::new(CREATE_POLL, &browser.session);
    render(CreatePollTemplate::new(&browser.create_form, shell, false))
}

/// Every button on the create form posts here with the current field values.
pub async fn create_poll(
    State(state): State<AppState>,
    Extension(handle): Extension<BrowserHandle>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let (fields, action) = parse_submission(pairs)?;
    let mut invalid_attempt = false;

    let submission = {
        let mut guard = handle.lock().await;
        let browser = &mut *guard;
        let form = &mut browser.create_form;

        // values of an in-flight submission stay put
        if !form.is_submitting() {
            form.load_fields(fields);
        }

        match action {
            FormAction::AddOption => {
                form.add_option();
                None
            }
            FormAction::RemoveOption(index) => {
                form.remove_option(index);
                None
            }
            FormAction::Submit => {
                let request = form.begin_submit();
                invalid_attempt = request.is_none() && !form.is_submitting();
                request.map(|request| (request, browser.session.bearer().to_string()))
            }
        }
    };

    // the browser stays unlocked while the upload is in flight
    let mut created = false;
    if let Some((request, token)) = submission {
        let result = state.api.upload_question(&token, &request).await;
        created = handle.lock().await.create_form.finish_submit(result);
    }

    let browser = handle.lock().await;
    let shell = Shell::new(CREATE_POLL, &browser.session);

    let page = if created {
        render(CreatedTemplate::new(shell, state.config.redirect_delay.as_secs()))?
    } else {
        render(CreatePollTemplate::new(&browser.create_form, shell, invalid_attempt))?
    };
    Ok(page.into_response())
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime": format_uptime(state.started_at.elapsed().as_secs()),
    }))
}

fn format_uptime(seconds: u64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
