//! Integration tests for the account REST flow.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_status_and_health() {
    let app = helpers::TestApp::new();

    let status = app.request("GET", "/api/status", None, None).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.text, "Server is live");

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.body["online_users"], 0);
}

#[tokio::test]
async fn test_signup_check_login_flow() {
    let app = helpers::TestApp::new();
    let (identity, token) = app.sign_up("ada@example.com", "analytical").await;

    let check = app.request("GET", "/api/auth/check", None, Some(&token)).await;
    assert_eq!(check.status, StatusCode::OK);
    assert_eq!(check.body["success"], true);
    assert_eq!(check.body["user"]["_id"], identity.as_str());
    assert_eq!(check.body["user"]["email"], "ada@example.com");
    assert!(check.body["user"].get("passwordHash").is_none());

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "ada@example.com",
                "password": "analytical",
            })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["userData"]["_id"], identity.as_str());
    assert!(login.body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_signup_missing_details() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "fullName": "No Bio",
                "email": "nobio@example.com",
                "password": "pw",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = helpers::TestApp::new();
    app.sign_up("dup@example.com", "pw").await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "fullName": "Again",
                "email": "dup@example.com",
                "password": "pw",
                "bio": "second",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_login_failures() {
    let app = helpers::TestApp::new();
    app.sign_up("bob@example.com", "right").await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": "bob@example.com", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": "nobody@example.com", "password": "x" })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile_and_logout() {
    let app = helpers::TestApp::new();
    let (_, token) = app.sign_up("carol@example.com", "pw").await;

    let updated = app
        .request(
            "POST",
            "/api/auth/update-profile",
            Some(serde_json::json!({
                "bio": "new bio",
                "profilePic": "https://cdn.example.com/carol.png",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["user"]["bio"], "new bio");
    assert_eq!(updated.body["user"]["fullName"], "Test User");
    assert_eq!(
        updated.body["user"]["profilePic"],
        "https://cdn.example.com/carol.png"
    );

    let logout = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["success"], true);
}

#[tokio::test]
async fn test_check_for_token_without_account() {
    let app = helpers::TestApp::new();
    let token = app.token_for("ghost");

    let response = app.request("GET", "/api/auth/check", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
