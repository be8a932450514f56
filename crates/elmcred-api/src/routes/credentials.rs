//! # Credential Builder Endpoint
//!
//! Generates ELMv3 credentials on demand. Nothing is stored: every call
//! rebuilds the documents with a fresh credential id and issuance time.
//!
//! ## Endpoint
//!
//! - `GET /platform-plugin-elm-credentials/{course_id}/api/credential-builder/`
//!
//! With `username`, returns that learner's credential: a ZIP holding the
//! one document, or the bare JSON when `to_file=false`. Without it,
//! returns a ZIP of the credentials of every enrolled learner who holds a
//! certificate. Every ZIP is named `credentials-{course_id}.zip`.
//!
//! ## Processing Order
//!
//! course key → course exists → caller access → query parameters →
//! learner and certificate lookup. The first failing step decides the
//! response.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use elmcred_core::{archive_filename, CourseKey, CourseRecord};
use elmcred_vc::{CredentialArchive, CredentialBuilder};

use crate::access::require_course_access;
use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::CredentialQuery;
use crate::state::AppState;

pub const CREDENTIAL_BUILDER_PATH: &str =
    "/platform-plugin-elm-credentials/{course_id}/api/credential-builder/";

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new().route(CREDENTIAL_BUILDER_PATH, get(build_credentials))
}

/// GET: Generate one credential or the course's credential archive.
#[utoipa::path(
    get,
    path = "/platform-plugin-elm-credentials/{course_id}/api/credential-builder/",
    params(
        ("course_id" = String, Path, description = "Course key, e.g. course-v1:edX+DemoX+Demo_Course"),
        ("username" = Option<String>, Query, description = "Learner username or email; omit for the whole course"),
        ("expires_at" = Option<String>, Query, description = "Expiry date written to validUntil and expirationDate"),
        ("to_file" = Option<bool>, Query, description = "Return the single credential inside a ZIP attachment (default true); false returns the JSON inline"),
    ),
    responses(
        (status = 200, description = "ZIP archive of the credential(s), or inline credential JSON when to_file=false"),
        (status = 400, description = "Invalid course key or query parameters", body = crate::error::FieldErrorsBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 403, description = "Caller may not generate credentials for this course", body = crate::error::ErrorBody),
        (status = 404, description = "Course, learner, certificate or credentials not found", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
async fn build_credentials(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(course_id): Path<String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, AppError> {
    let key = CourseKey::parse(&course_id).map_err(|_| {
        AppError::field(
            StatusCode::BAD_REQUEST,
            "course_id",
            format!("The supplied course_id='{course_id}' key is not valid."),
        )
    })?;

    let course = state.directory.get_course(&key).ok_or_else(|| {
        AppError::field(
            StatusCode::NOT_FOUND,
            "course_id",
            format!("The course with course_id='{course_id}' is not found."),
        )
    })?;

    require_course_access(state.directory.as_ref(), &caller, &key)?;

    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let params = CredentialQuery::from_params(&params).map_err(AppError::invalid_fields)?;

    match params.username.as_deref() {
        Some(username) => single_credential(&state, &course, username, &params).await,
        None => course_archive(&state, &course, &params).await,
    }
}

async fn single_credential(
    state: &AppState,
    course: &CourseRecord,
    username: &str,
    params: &CredentialQuery,
) -> Result<Response, AppError> {
    let course_id = course.key.as_str();

    let user = state.directory.find_user(username).ok_or_else(|| {
        AppError::field(
            StatusCode::NOT_FOUND,
            "username",
            format!("The username='{username}' does not exist."),
        )
    })?;

    let certificate = state
        .directory
        .certificate_for(&user, &course.key)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "The user {} does not have certificate for course_id='{course_id}'.",
                user.username
            ))
        })?;

    let credential = CredentialBuilder::new(course, &user, &certificate, &state.defaults)
        .expires_at(params.expires_at)
        .build();

    tracing::info!(course_id, username = %user.username, "issued ELM credential");
    metrics::counter!("elmcred_credentials_issued_total", "mode" => "single").increment(1);

    if params.to_file {
        let mut archive = CredentialArchive::new();
        archive.add_credential(user.username.as_str(), course_id, &credential)?;
        zip_response(course_id, archive).await
    } else {
        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            credential.to_json_pretty()?,
        )
            .into_response())
    }
}

async fn course_archive(
    state: &AppState,
    course: &CourseRecord,
    params: &CredentialQuery,
) -> Result<Response, AppError> {
    let course_id = course.key.as_str();
    let mut archive = CredentialArchive::new();

    for learner in state.directory.enrolled_learners(&course.key) {
        let Some(certificate) = state.directory.certificate_for(&learner, &course.key) else {
            continue;
        };
        let credential = CredentialBuilder::new(course, &learner, &certificate, &state.defaults)
            .expires_at(params.expires_at)
            .build();
        archive.add_credential(learner.username.as_str(), course_id, &credential)?;
    }

    if archive.is_empty() {
        return Err(AppError::NotFound(format!(
            "No credentials found for course_id='{course_id}'."
        )));
    }

    let count = archive.len();
    tracing::info!(course_id, count, "issued ELM credential archive");
    metrics::counter!("elmcred_credentials_issued_total", "mode" => "bulk").increment(count as u64);

    zip_response(course_id, archive).await
}

/// Pack the archive on the blocking pool and return it as
/// `credentials-{course_id}.zip`.
async fn zip_response(course_id: &str, archive: CredentialArchive) -> Result<Response, AppError> {
    let bytes = tokio::task::spawn_blocking(move || archive.finish())
        .await
        .map_err(|e| AppError::Internal(format!("archive task failed: {e}")))??;

    tracing::debug!(course_id, size = bytes.len(), "packed credential archive");
    attachment("application/zip", &archive_filename(course_id), Body::from(bytes))
}

fn attachment(content_type: &'static str, filename: &str, body: Body) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(filename))
        .map_err(|e| AppError::Internal(format!("invalid attachment filename {filename:?}: {e}")))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// `attachment; filename="…"` with the name as an RFC 7230 quoted-string.
///
/// `"` and `\` are backslash-escaped. Characters a header value cannot
/// carry (controls and non-ASCII) become `_`.
pub fn content_disposition(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            ' '..='~' => quoted.push(c),
            _ => quoted.push('_'),
        }
    }
    format!("attachment; filename=\"{quoted}\"")
}
