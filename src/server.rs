use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::delivery::{process_upload, Acknowledgement};
use crate::error::SummaryError;
use crate::importer::Upload;
use crate::mailer::Mailer;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub today: fn() -> NaiveDate,
}

impl AppState {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer,
            today: local_today,
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Errors → uniform `{"error": ...}` responses
// ---------------------------------------------------------------------------

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("upload failed: {}", self.message);
        } else {
            log::warn!("upload rejected ({}): {}", self.status, self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Pull the receiver and the spreadsheet out of the form. `receiver_email`
/// wins over `email`; a file part without a name counts as no file.
async fn read_form(multipart: &mut Multipart) -> Result<(Option<String>, Option<Upload>), ApiError> {
    let mut receiver_email = None;
    let mut email = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "receiver_email" | "email" => {
                let value = field.text().await?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                if name == "receiver_email" {
                    receiver_email = value;
                } else {
                    email = value;
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() {
                    upload = Some(Upload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok((receiver_email.or(email), upload))
}

async fn upload_timesheet(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Acknowledgement>, ApiError> {
    let (receiver, upload) = read_form(&mut multipart).await?;
    let (Some(receiver), Some(upload)) = (receiver, upload) else {
        return Err(SummaryError::MissingInput.into());
    };
    log::info!(
        "summary requested for {receiver}: {} ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    let today = (state.today)();
    let mailer = Arc::clone(&state.mailer);
    let ack = tokio::task::spawn_blocking(move || {
        process_upload(
            &upload,
            &receiver,
            today,
            mailer.as_ref(),
            Local::now().naive_local(),
        )
    })
    .await
    .map_err(|e| SummaryError::Other(format!("worker failed: {e}")))??;

    Ok(Json(ack))
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(index))
        .route("/upload_timesheet", post(upload_timesheet))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::info!("shutting down");
    }
}

pub async fn serve(addr: &str, state: AppState, max_upload_bytes: usize) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state, max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
