use anyhow::Result;
use axum::http::StatusCode;

use super::storage::list_grades;
use crate::api::handlers::test_support::{body_text, flash_message, location, TestApp};

#[tokio::test]
async fn each_create_appends_one_row() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.signed_in("Ana", "ana@example.com").await?;
    let ana: i64 = sqlx::query_scalar("SELECT id FROM users")
        .fetch_one(&app.pool)
        .await?;

    // Duplicates are kept.
    let bodies = [
        "semester=Fall+2024&subject=Algorithms&grade=A",
        "semester=Fall+2024&subject=Algorithms&grade=A",
        "semester=Spring+2025&subject=Databases&grade=B%2B",
    ];
    for (index, body) in bodies.into_iter().enumerate() {
        let response = app.post_form("/subjects", body, Some(&token)).await?;
        assert_eq!(location(&response).as_deref(), Some("/subjects"));
        assert_eq!(
            flash_message(&response).as_deref(),
            Some("Subject & grade added!")
        );
        assert_eq!(list_grades(&app.pool, ana).await?.len(), index + 1);
    }

    let grades = list_grades(&app.pool, ana).await?;
    assert_eq!(grades[2].semester, "Spring 2025");
    assert_eq!(grades[2].grade, "B+");
    Ok(())
}

#[tokio::test]
async fn grades_are_scoped_to_their_owner() -> Result<()> {
    let app = TestApp::new().await?;
    let ana = app.signed_in("Ana", "ana@example.com").await?;
    let bob = app.signed_in("Bob", "bob@example.com").await?;

    app.post_form(
        "/subjects",
        "semester=Fall&subject=Linear+Algebra&grade=A",
        Some(&ana),
    )
    .await?;

    let response = app.get("/subjects", Some(&bob)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await?.contains("Linear Algebra"));

    let response = app.get("/subjects", Some(&ana)).await?;
    assert!(body_text(response).await?.contains("Linear Algebra"));
    Ok(())
}

#[tokio::test]
async fn blank_or_oversized_grade_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.signed_in("Ana", "ana@example.com").await?;

    let response = app
        .post_form("/subjects", "semester=Fall&subject=Math&grade=", Some(&token))
        .await?;
    assert_eq!(location(&response).as_deref(), Some("/subjects"));
    assert_eq!(flash_message(&response).as_deref(), Some("Grade is required."));

    let response = app
        .post_form(
            "/subjects",
            "semester=Fall&subject=Math&grade=ABCDEFGHIJK",
            Some(&token),
        )
        .await?;
    assert_eq!(
        flash_message(&response).as_deref(),
        Some("Grade must be at most 10 characters.")
    );

    assert_eq!(app.count("subject_grades").await?, 0);
    Ok(())
}
