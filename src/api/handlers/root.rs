use axum::response::Redirect;

// Landing page is the login form.
pub async fn root() -> Redirect {
    Redirect::to("/login")
}
