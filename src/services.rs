// services.rs
use http::{header::CONTENT_TYPE, StatusCode};
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::error::ApiError;
use crate::models::{CreatePollRequest, LoginRequest, LoginResponse, Poll};

const UPLOAD_QUESTION: &[&str] = &["admin", "questionUpload"];
const MY_QUESTIONS: &[&str] = &["admin", "myQuestions"];
const DELETE_QUESTION: &[&str] = &["admin", "deleteQuestion"];
const LOGIN: &[&str] = &["admin", "login"];

/// Client for the polls REST API. One best-effort request per call: no
/// retries, no timeouts beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: Client::new(),
            base,
        }
    }

    fn endpoint(&self, path: &[&str], id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path to extend
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path).extend(id);
        }
        url
    }

    /// `POST /admin/questionUpload`. Any 2xx counts as created.
    pub async fn upload_question(
        &self,
        token: &str,
        request: &CreatePollRequest,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint(UPLOAD_QUESTION, None))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        ensure_success(response).map(drop)
    }

    /// `GET /admin/myQuestions`. A 404 means the caller has no polls yet.
    pub async fn my_questions(&self, token: &str) -> Result<Vec<Poll>, ApiError> {
        let response = self
            .http
            .get(self.endpoint(MY_QUESTIONS, None))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("no polls for this account");
            return Ok(Vec::new());
        }

        let polls = ensure_success(response)?.json::<Vec<Poll>>().await?;
        debug!(count = polls.len(), "fetched polls");
        Ok(polls)
    }

    /// `POST /admin/deleteQuestion/{id}`. The response body is ignored.
    pub async fn delete_question(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint(DELETE_QUESTION, Some(id)))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        ensure_success(response).map(drop)
    }

    /// `POST /admin/login`, returning the issued bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.endpoint(LOGIN, None))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let body = ensure_success(response)?.json::<LoginResponse>().await?;
        Ok(body.token)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_status(status))
    }
}
