//! Signup form page and submission handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::session::{self, Flash, FLASH_COOKIE};

/// Template for the signup page.
///
/// Renders `templates/index.html` with:
/// - The pending one-shot status message, if any
/// - The email form with its hidden CSRF token
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub site_name: String,
    pub flash: Option<Flash>,
    pub csrf_token: String,
}

/// Submitted form body.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Renders the signup page.
///
/// # Endpoint
///
/// `GET /`
///
/// # Cookies
///
/// - Consumes the `flash` cookie, so each message is shown once
/// - Reuses a valid `csrf_token` cookie or issues a new one
pub async fn index_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let flash = state.session.read_flash(&headers);

    let csrf_token = match state.session.read_csrf(&headers) {
        Some(token) => token,
        None => session::new_csrf_token()?,
    };

    let mut cookies = vec![(SET_COOKIE, state.session.csrf_cookie(&csrf_token))];
    if session::cookie_value(&headers, FLASH_COOKIE).is_some() {
        cookies.push((SET_COOKIE, session::clear_flash_cookie()));
    }

    let template = IndexTemplate {
        site_name: state.site_name.to_string(),
        flash,
        csrf_token,
    };

    Ok((AppendHeaders(cookies), template).into_response())
}

/// Runs the signup workflow for a submitted email.
///
/// # Endpoint
///
/// `POST /`
///
/// # Request Body
///
/// Form-encoded `email` and `csrf_token`.
///
/// # Response
///
/// `303 See Other` to `/` with the outcome stored in the `flash` cookie.
/// Workflow failures never change the status code.
///
/// # Errors
///
/// Returns 400 Bad Request without running the workflow if the CSRF token
/// is missing or does not match the signed cookie.
pub async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if !state.session.csrf_matches(&headers, &form.csrf_token) {
        warn!("Rejected signup submission with missing or invalid CSRF token");
        return Err(AppError::bad_request(
            "The CSRF token is missing or invalid.",
        ));
    }

    let outcome = state.signup_service.submit(&form.email).await;
    let cookie = state.session.flash_cookie(&Flash::from(outcome))?;

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response())
}
