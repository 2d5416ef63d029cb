use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::id_extractor::FigureId;
use crate::logic::FigureService;
use crate::model::{Figure, FigureInput};
use crate::store::traits::FigureStore;

/// Shared state handed to every handler.
pub struct AppContext<S: FigureStore> {
    pub figures: FigureService<S>,
    pub environment: String,
}

impl<S: FigureStore> AppContext<S> {
    pub fn new(store: Arc<S>, environment: impl Into<String>) -> Self {
        Self {
            figures: FigureService::new(store),
            environment: environment.into(),
        }
    }
}

pub type AppState<S> = Arc<AppContext<S>>;

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub system_info: SystemInfo,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct FigureEnvelope {
    pub figure: Figure,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn health_check<S: FigureStore>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "available".to_string(),
        system_info: SystemInfo {
            environment: state.environment.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn create_figure<S: FigureStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<FigureInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(rejection_to_error)?;
    // Version is store-assigned on create.
    let (new_figure, _) = input.into_parts();

    let figure = state.figures.create_figure(new_figure).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, figure.location())],
        Json(FigureEnvelope { figure }),
    ))
}

pub async fn show_figure<S: FigureStore>(
    State(state): State<AppState<S>>,
    FigureId(id): FigureId,
) -> Result<Json<FigureEnvelope>, ApiError> {
    let figure = state.figures.get_figure(id).await?;
    Ok(Json(FigureEnvelope { figure }))
}

pub async fn update_figure<S: FigureStore>(
    State(state): State<AppState<S>>,
    FigureId(id): FigureId,
    payload: Result<Json<FigureInput>, JsonRejection>,
) -> Result<Json<FigureEnvelope>, ApiError> {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            // A missing record takes precedence over a malformed body.
            state.figures.get_figure(id).await?;
            return Err(rejection_to_error(rejection));
        }
    };
    let (changes, expected_version) = input.into_parts();

    let figure = state
        .figures
        .update_figure(id, changes, expected_version)
        .await?;
    Ok(Json(FigureEnvelope { figure }))
}

pub async fn delete_figure<S: FigureStore>(
    State(state): State<AppState<S>>,
    FigureId(id): FigureId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.figures.delete_figure(id).await?;
    Ok(Json(MessageResponse {
        message: "figure successfully deleted".to_string(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    log::debug!("Rejected request body: {}", rejection.body_text());
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ApiError::UnsupportedMediaType(rejection.body_text()),
        _ => ApiError::BadRequest(rejection.body_text()),
    }
}
