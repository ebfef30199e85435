// routes.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::browser::attach_browser;
use crate::handlers;
use crate::state::AppState;

pub const HOME: &str = "/";
pub const LOGIN: &str = "/admin/login";
pub const SESSION_EXPIRED_LOGIN: &str = "/admin/login?expired=1";
pub const LOGOUT: &str = "/admin/logout";
pub const DASHBOARD: &str = "/admin/dashboard";
pub const CREATE_POLL: &str = "/admin/create-poll";

pub fn create_routes(state: AppState) -> Router {
    // pages that read or write per-browser state
    let pages = Router::new()
        .route(HOME, get(handlers::home))
        .route("/vote/select", post(handlers::select_option))
        .route("/vote/submit", post(handlers::submit_vote))
        .route(LOGIN, get(handlers::login_page).post(handlers::login))
        .route(LOGOUT, post(handlers::logout))
        .route(DASHBOARD, get(handlers::dashboard))
        .route("/admin/dashboard/polls/{id}/delete", post(handlers::delete_poll))
        .route(CREATE_POLL, get(handlers::create_poll_page).post(handlers::create_poll))
        .layer(middleware::from_fn_with_state(state.clone(), attach_browser));

    Router::new()
        .merge(pages)
        .route("/healthz", get(handlers::health))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::DELETE_FAILED;
    use axum::body::{to_bytes, Body};
    use axum::http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    };
    use axum::response::Response;
    use serde_json::json;
    use tower::ServiceExt;

    fn state(api_url: &str) -> AppState {
        let api_url = api_url.to_string();
        let config = Config::from_source(move |key| match key {
            "API_BASE_URL" => Some(api_url.clone()),
            "STATIC_DIR" => Some(concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string()),
            _ => None,
        })
        .unwrap();
        AppState::new(config)
    }

    fn app(api_url: &str) -> Router {
        create_routes(state(api_url))
    }

    fn get_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, cookie: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn cookie_of(response: &Response) -> String {
        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn sign_in(app: &Router, server: &mut mockito::ServerGuard) -> String {
        let _login = server
            .mock("POST", "/admin/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"test-token"}"#)
            .create_async()
            .await;

        let first = app.clone().oneshot(get_req(LOGIN, None)).await.unwrap();
        let cookie = cookie_of(&first);

        let response = app
            .clone()
            .oneshot(post_form(LOGIN, &cookie, "username=coach&password=pw"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], DASHBOARD);
        cookie
    }

    #[tokio::test]
    async fn first_visit_gets_browser_cookie() {
        let app = app("http://127.0.0.1:9");
        let response = app.oneshot(get_req(HOME, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_of(&response).starts_with("sid="));
        assert!(body_text(response).await.contains("Buffalo Bills"));
    }

    #[tokio::test]
    async fn vote_flow_shows_results() {
        let app = app("http://127.0.0.1:9");
        let first = app.clone().oneshot(get_req(HOME, None)).await.unwrap();
        let cookie = cookie_of(&first);

        let response = app
            .clone()
            .oneshot(post_form("/vote/select", &cookie, "option=bills"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        app.clone()
            .oneshot(post_form("/vote/submit", &cookie, ""))
            .await
            .unwrap();

        let page = body_text(app.oneshot(get_req(HOME, Some(&cookie))).await.unwrap()).await;
        assert!(page.contains("27.7%"));
        assert!(page.contains("Thanks for voting!"));
    }

    #[tokio::test]
    async fn forbidden_list_signs_out() {
        let mut server = mockito::Server::new_async().await;
        let app = app(&server.url());
        let cookie = sign_in(&app, &mut server).await;

        let _list = server
            .mock("GET", "/admin/myQuestions")
            .with_status(403)
            .create_async()
            .await;

        let response = app
            .clone()
            .oneshot(get_req(DASHBOARD, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], SESSION_EXPIRED_LOGIN);

        let login = body_text(
            app.oneshot(get_req(SESSION_EXPIRED_LOGIN, Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(login.contains("Session expired. Please login again."));
    }

    #[tokio::test]
    async fn dashboard_confirmation_needs_no_extra_requests() {
        let mut server = mockito::Server::new_async().await;
        let app = app(&server.url());
        let cookie = sign_in(&app, &mut server).await;

        let list = server
            .mock("GET", "/admin/myQuestions")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                json!([{
                    "id": "p1",
                    "questionText": "Who wins the AFC?",
                    "options": ["Bills", "Chiefs"],
                    "startTime": "2026-10-20T18:30",
                    "duration": 60,
                    "status": "active"
                }])
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let page = body_text(
            app.oneshot(get_req("/admin/dashboard?filter=active", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(page.contains("Who wins the AFC?"));
        assert!(page.contains("60 minutes"));
        assert!(page.contains("2 options"));

        // opening and cancelling the dialog stay inside the page
        assert!(page.contains(r##"href="#confirm-1""##));
        assert!(page.contains(r#"id="confirm-1""#));
        assert!(page.contains(r##"<a href="#">Cancel</a>"##));
        assert!(page.contains(r#"action="/admin/dashboard/polls/p1/delete""#));
        assert!(page.contains(r#"name="filter" value="active""#));
        list.assert_async().await;
    }

    #[tokio::test]
    async fn failed_delete_reloads_and_reports() {
        let mut server = mockito::Server::new_async().await;
        let app = app(&server.url());
        let cookie = sign_in(&app, &mut server).await;

        let delete = server
            .mock("POST", "/admin/deleteQuestion/p1")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let reload = server
            .mock("GET", "/admin/myQuestions")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let response = app
            .oneshot(post_form(
                "/admin/dashboard/polls/p1/delete",
                &cookie,
                "filter=all",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains(DELETE_FAILED));
        assert!(!page.contains("Confirm Deletion"));
        assert!(page.contains("You haven"));
        delete.assert_async().await;
        reload.assert_async().await;
    }

    #[tokio::test]
    async fn create_poll_add_then_submit() {
        let mut server = mockito::Server::new_async().await;
        let app = app(&server.url());
        let cookie = sign_in(&app, &mut server).await;

        let page = body_text(
            app.clone()
                .oneshot(post_form(
                    CREATE_POLL,
                    &cookie,
                    "question=Who+wins%3F&option=Bills&option=Chiefs&start_time=&duration=&action=add",
                ))
                .await
                .unwrap(),
        )
        .await;
        assert!(page.contains("Option 3"));
        assert!(page.contains("value=\"Chiefs\""));

        let upload = server
            .mock("POST", "/admin/questionUpload")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::Json(json!({
                "question": "Who wins?",
                "options": ["Bills", "Chiefs"],
                "startTime": "2026-10-20T18:30",
                "duration": 60
            })))
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let page = body_text(
            app.oneshot(post_form(
                CREATE_POLL,
                &cookie,
                "question=Who+wins%3F&option=Bills&option=Chiefs&option=&start_time=2026-10-20T18%3A30&duration=60&action=submit",
            ))
            .await
            .unwrap(),
        )
        .await;
        assert!(page.contains("Poll Created Successfully!"));
        assert!(page.contains("2;url=/admin/dashboard"));
        upload.assert_async().await;
    }

    #[tokio::test]
    async fn incomplete_form_is_not_sent() {
        let mut server = mockito::Server::new_async().await;
        let app = app(&server.url());
        let cookie = sign_in(&app, &mut server).await;

        let upload = server
            .mock("POST", "/admin/questionUpload")
            .expect(0)
            .create_async()
            .await;

        let page = body_text(
            app.oneshot(post_form(
                CREATE_POLL,
                &cookie,
                "question=Who+wins%3F&option=Bills&option=&start_time=2026-10-20T18%3A30&duration=0&action=submit",
            ))
            .await
            .unwrap(),
        )
        .await;
        assert!(page.contains("Create New Poll"));
        assert!(page.contains("positive duration"));
        upload.assert_async().await;
    }

    #[tokio::test]
    async fn logout_clears_and_redirects() {
        let mut server = mockito::Server::new_async().await;
        let app = app(&server.url());
        let cookie = sign_in(&app, &mut server).await;

        let response = app
            .oneshot(post_form(LOGOUT, &cookie, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], LOGIN);
    }

    #[tokio::test]
    async fn stateless_routes_leave_no_browser_records() {
        let state = state("http://127.0.0.1:9");
        let app = create_routes(state.clone());

        for _ in 0..50 {
            let response = app.clone().oneshot(get_req("/healthz", None)).await.unwrap();
            assert!(response.headers().get(SET_COOKIE).is_none());
        }
        let logo = app
            .clone()
            .oneshot(get_req("/static/logos/bills.svg", None))
            .await
            .unwrap();
        assert_eq!(logo.status(), StatusCode::OK);
        assert!(logo.headers().get(SET_COOKIE).is_none());
        assert_eq!(state.browsers.len().await, 0);

        app.oneshot(get_req(HOME, None)).await.unwrap();
        assert_eq!(state.browsers.len().await, 1);
    }

    #[tokio::test]
    async fn unissued_browser_id_is_replaced() {
        let state = state("http://127.0.0.1:9");
        let app = create_routes(state.clone());
        let forged = format!("sid={}", uuid::Uuid::new_v4());

        let response = app.oneshot(get_req(HOME, Some(&forged))).await.unwrap();
        let issued = cookie_of(&response);
        assert!(issued.starts_with("sid="));
        assert_ne!(issued, forged);
        assert_eq!(state.browsers.len().await, 1);
    }

    #[tokio::test]
    async fn stalled_api_does_not_block_other_pages() {
        // accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let app = app(&format!("http://{addr}"));
        let first = app.clone().oneshot(get_req(HOME, None)).await.unwrap();
        let cookie = cookie_of(&first);

        let stalled = tokio::spawn(app.clone().oneshot(get_req(DASHBOARD, Some(&cookie))));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let home = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            app.oneshot(get_req(HOME, Some(&cookie))),
        )
        .await
        .expect("voting page waited on the dashboard request")
        .unwrap();
        assert_eq!(home.status(), StatusCode::OK);
        stalled.abort();
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app("http://127.0.0.1:9");
        let body = body_text(app.oneshot(get_req("/healthz", None)).await.unwrap()).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "ok");
    }
}
