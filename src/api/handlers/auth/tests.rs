use anyhow::Result;
use axum::http::StatusCode;

use super::lookup_login_record;
use crate::api::{
    flash::Level,
    handlers::test_support::{body_text, flash, flash_message, location, set_cookie, TestApp},
};

#[tokio::test]
async fn register_then_login_opens_a_session() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app
        .post_form(
            "/register",
            "name=Ana&email=Ana%40Example.com&password=hunter22",
            None,
        )
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("Registered successfully! You can now login.")
    );

    // Emails are stored normalized.
    let record = lookup_login_record(&app.pool, "ana@example.com").await?;
    assert!(record.is_some_and(|record| {
        record.name == "Ana" && record.password_hash.starts_with("$argon2id$")
    }));

    let response = app
        .post_form("/login", "email=ana%40example.com&password=hunter22", None)
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/university-tracker"));
    assert_eq!(flash_message(&response).as_deref(), Some("Login successful!"));
    let token = set_cookie(&response, "gradpath_session").unwrap_or_default();
    assert!(!token.is_empty());

    let response = app.get("/dashboard", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await?.contains("Welcome, Ana"));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_creates_no_row() -> Result<()> {
    let app = TestApp::new().await?;
    app.register("Ana", "ana@example.com", "first-pass").await?;

    let response = app
        .post_form(
            "/register",
            "name=Other&email=ANA%40example.com&password=second-pass",
            None,
        )
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/register"));
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("Email already registered. Please login.")
    );
    assert_eq!(app.count("users").await?, 1);
    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_forms() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app
        .post_form("/register", "name=Ana&email=not-an-email&password=x", None)
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/register"));

    let response = app.post_form("/register", "name=Ana", None).await?;
    assert_eq!(location(&response).as_deref(), Some("/register"));
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("Please fill in all required fields.")
    );

    assert_eq!(app.count("users").await?, 0);
    Ok(())
}

#[tokio::test]
async fn login_reports_unknown_email_and_bad_password() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app
        .post_form("/login", "email=nobody%40example.com&password=whatever", None)
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    let unknown = flash(&response);
    assert_eq!(
        unknown.as_ref().map(|flash| flash.message.as_str()),
        Some("Email not registered. Please register first.")
    );
    assert_eq!(unknown.map(|flash| flash.level), Some(Level::Warning));

    app.register("Ana", "ana@example.com", "right-pass").await?;
    let response = app
        .post_form("/login", "email=ana%40example.com&password=wrong-pass", None)
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("Incorrect password. Try again.")
    );
    assert!(set_cookie(&response, "gradpath_session").is_none());
    assert_eq!(app.count("sessions").await?, 0);
    Ok(())
}

#[tokio::test]
async fn logout_invalidates_the_session() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.signed_in("Ana", "ana@example.com").await?;
    assert_eq!(app.count("sessions").await?, 1);

    let response = app.get("/logout", Some(&token)).await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("You have been logged out.")
    );
    assert_eq!(set_cookie(&response, "gradpath_session").as_deref(), Some(""));
    assert_eq!(app.count("sessions").await?, 0);

    // Replaying the old cookie no longer works.
    let response = app.get("/dashboard", Some(&token)).await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    Ok(())
}

#[tokio::test]
async fn session_of_deleted_user_is_signed_out() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.signed_in("Ana", "ana@example.com").await?;

    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&app.pool)
        .await?;
    sqlx::query("DELETE FROM users").execute(&app.pool).await?;

    let response = app.get("/dashboard", Some(&token)).await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("Please log in first.")
    );
    Ok(())
}

#[tokio::test]
async fn expired_session_is_signed_out() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.signed_in("Ana", "ana@example.com").await?;

    sqlx::query("UPDATE sessions SET created_at = created_at - 30 * 24 * 3600")
        .execute(&app.pool)
        .await?;

    let response = app.get("/dashboard", Some(&token)).await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));
    Ok(())
}

#[tokio::test]
async fn login_prunes_expired_sessions() -> Result<()> {
    let app = TestApp::new().await?;
    app.signed_in("Ana", "ana@example.com").await?;
    let bob = app.signed_in("Bob", "bob@example.com").await?;

    for _ in 0..2 {
        app.login("ana@example.com", "s3cret-pass").await?;
    }
    sqlx::query(
        "UPDATE sessions SET created_at = created_at - 30 * 24 * 3600 \
         WHERE user_id = (SELECT id FROM users WHERE email = 'ana@example.com')",
    )
    .execute(&app.pool)
    .await?;

    let live = app.login("ana@example.com", "s3cret-pass").await?;
    assert_eq!(app.count("sessions").await?, 2);

    // Other users keep their sessions.
    let response = app.get("/dashboard", Some(&bob)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.get("/dashboard", Some(&live)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn gated_paths_require_a_session() -> Result<()> {
    let app = TestApp::new().await?;

    for path in [
        "/university-tracker",
        "/dashboard",
        "/i20-process",
        "/visa-process",
        "/travel-ready",
        "/post-arrival-guide",
        "/subjects",
        "/opt-guide",
        "/skills",
    ] {
        let response = app.get(path, None).await?;
        assert_eq!(location(&response).as_deref(), Some("/login"), "{path}");
        let gate = flash(&response);
        assert_eq!(gate.map(|flash| flash.level), Some(Level::Warning), "{path}");
    }

    let forms = [
        ("/university-tracker", "university=MIT&program=CS&status=Pending"),
        ("/subjects", "semester=Fall&subject=Math&grade=A"),
        ("/mark-final/1", ""),
        ("/opt-guide", "graduation_date=2025-05-15&preferred_start_date=2025-03-01"),
    ];
    for (path, body) in forms {
        let response = app.post_form(path, body, Some("forged-token")).await?;
        assert_eq!(location(&response).as_deref(), Some("/login"), "{path}");
    }

    assert_eq!(app.count("university_applications").await?, 0);
    assert_eq!(app.count("subject_grades").await?, 0);
    Ok(())
}

#[tokio::test]
async fn login_page_renders_and_clears_flash() -> Result<()> {
    let app = TestApp::new().await?;
    let response = app.get("/", None).await?;
    assert_eq!(location(&response).as_deref(), Some("/login"));

    let response = app.get("/login", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, "gradpath_flash").is_none());
    assert!(body_text(response).await?.contains("name=\"email\""));
    Ok(())
}
