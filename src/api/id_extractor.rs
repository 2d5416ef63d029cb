use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::api::error::ApiError;

/// The `:id` segment of a figure URL.
///
/// Anything that does not parse as an integer is answered with 404, the
/// same as an id that matches no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for FigureId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;

        parse_id(&raw).map(FigureId).ok_or(ApiError::NotFound)
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}
