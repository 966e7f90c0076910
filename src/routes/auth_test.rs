use axum::http::Method;
use serde_json::json;

use super::*;
use crate::routes::test_support::send;
use crate::state::test_helpers::{
    ADMIN_EMAIL, PASSWORD, SALES_EMAIL, SALES_REFRESH, SALES_TOKEN, test_app_state, unconfigured_app_state,
};

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookies_are_http_only_and_lax() {
    let cookie = auth_cookie(SESSION_COOKIE, "tok".into(), true, Duration::days(COOKIE_MAX_AGE_DAYS));
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::days(30)));
}

// =============================================================================
// setup / session
// =============================================================================

#[tokio::test]
async fn setup_reports_missing_vars() {
    let res = send(unconfigured_app_state(), Method::GET, "/api/setup", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "configured": false, "missing": ["SUPABASE_URL", "SUPABASE_ANON_KEY"] }));
}

#[tokio::test]
async fn setup_reports_configured() {
    let (state, _mock) = test_app_state();
    let res = send(state, Method::GET, "/api/setup", None, None).await;
    assert_eq!(res.json()["configured"], true);
}

#[tokio::test]
async fn session_without_backend_is_setup_required() {
    let res = send(unconfigured_app_state(), Method::GET, "/api/session", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["state"], "setup_required");
    assert_eq!(body["missing"][0], "SUPABASE_URL");
}

#[tokio::test]
async fn session_without_cookie_is_signed_out() {
    let (state, _mock) = test_app_state();
    let res = send(state, Method::GET, "/api/session", None, None).await;
    assert_eq!(res.json(), json!({ "state": "signed_out" }));
}

#[tokio::test]
async fn session_with_stale_token_is_signed_out() {
    let (state, _mock) = test_app_state();
    let res = send(state, Method::GET, "/api/session", Some("session_token=expired"), None).await;
    assert_eq!(res.json()["state"], "signed_out");
}

#[tokio::test]
async fn session_with_valid_token_is_signed_in() {
    let (state, _mock) = test_app_state();
    let cookie = format!("{SESSION_COOKIE}={SALES_TOKEN}");
    let res = send(state, Method::GET, "/api/session", Some(&cookie), None).await;
    let body = res.json();
    assert_eq!(body["state"], "signed_in");
    assert_eq!(body["user"]["email"], SALES_EMAIL);
    assert_eq!(body["user"]["display_name"], "Ali");
    assert_eq!(body["user"]["is_admin"], false);
}

// =============================================================================
// login / refresh / logout / me
// =============================================================================

#[tokio::test]
async fn login_sets_session_cookies() {
    let (state, _mock) = test_app_state();
    let body = json!({ "email": format!("  {SALES_EMAIL} "), "password": PASSWORD });
    let res = send(state, Method::POST, "/api/auth/login", None, Some(body)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["user"]["email"], SALES_EMAIL);

    let cookies = res.set_cookies();
    assert!(cookies.iter().any(|c| c.starts_with("session_token=sales-token")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=sales-refresh")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
}

#[tokio::test]
async fn login_flags_admin() {
    let (state, _mock) = test_app_state();
    let body = json!({ "email": ADMIN_EMAIL, "password": PASSWORD });
    let res = send(state, Method::POST, "/api/auth/login", None, Some(body)).await;
    assert_eq!(res.json()["user"]["is_admin"], true);
}

#[tokio::test]
async fn login_rejection_passes_backend_message_through() {
    let (state, _mock) = test_app_state();
    let body = json!({ "email": SALES_EMAIL, "password": "wrong" });
    let res = send(state, Method::POST, "/api/auth/login", None, Some(body)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["message"], "Invalid login credentials");
    assert!(res.set_cookies().is_empty());
}

#[tokio::test]
async fn login_without_backend_is_setup_required() {
    let body = json!({ "email": SALES_EMAIL, "password": PASSWORD });
    let res = send(unconfigured_app_state(), Method::POST, "/api/auth/login", None, Some(body)).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json()["code"], "E_SETUP_REQUIRED");
}

#[tokio::test]
async fn refresh_reissues_cookies() {
    let (state, _mock) = test_app_state();
    let cookie = format!("{REFRESH_COOKIE}={SALES_REFRESH}");
    let res = send(state, Method::POST, "/api/auth/refresh", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.set_cookies().iter().any(|c| c.starts_with("session_token=sales-token")));
}

#[tokio::test]
async fn refresh_with_bad_token_is_unauthorized() {
    let (state, _mock) = test_app_state();
    let res = send(state.clone(), Method::POST, "/api/auth/refresh", Some("refresh_token=nope"), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let res = send(state, Method::POST, "/api/auth/refresh", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_cookies() {
    let (state, _mock) = test_app_state();
    let cookie = format!("{SESSION_COOKIE}={SALES_TOKEN}");
    let res = send(state, Method::POST, "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    let cookies = res.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn me_requires_session() {
    let (state, _mock) = test_app_state();
    let res = send(state.clone(), Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["code"], "E_UNAUTHORIZED");

    let cookie = format!("{SESSION_COOKIE}={SALES_TOKEN}");
    let res = send(state, Method::GET, "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["email"], SALES_EMAIL);
}

#[tokio::test]
async fn login_with_missing_password_is_json_bad_request() {
    let (state, _mock) = test_app_state();
    let body = json!({ "email": SALES_EMAIL });
    let res = send(state, Method::POST, "/api/auth/login", None, Some(body)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.headers[axum::http::header::CONTENT_TYPE], "application/json");
    assert_eq!(res.json()["code"], "E_BAD_REQUEST");
}
