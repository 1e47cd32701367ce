use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use loam_shared::{Dimension, GameVersion};

use crate::config::{CLASSIFICATION_AREA_CEILING, FEATURES_AREA_CEILING};
use crate::generator;
use crate::state::AppState;

fn default_version() -> String {
    "120".to_string()
}

fn default_dimension() -> String {
    "overworld".to_string()
}

fn default_classification_span() -> i64 {
    256
}

fn default_features_span() -> i64 {
    1024
}

fn default_scale() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ClassificationQuery {
    #[serde(default)]
    seed: i64,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default = "default_dimension")]
    dimension: String,
    #[serde(default)]
    x: i64,
    #[serde(default)]
    z: i64,
    #[serde(default = "default_classification_span")]
    sx: i64,
    #[serde(default = "default_classification_span")]
    sz: i64,
    #[serde(default = "default_scale")]
    scale: i64,
}

#[derive(Debug, Deserialize)]
pub struct FeaturesQuery {
    #[serde(default)]
    seed: i64,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default = "default_dimension")]
    dimension: String,
    #[serde(default)]
    x: i64,
    #[serde(default)]
    z: i64,
    #[serde(default = "default_features_span")]
    sx: i64,
    #[serde(default = "default_features_span")]
    sz: i64,
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn generator_failure(err: generator::GeneratorError) -> Response {
    tracing::error!(error = %err, "generator run failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Shared query validation: spans positive, area under the ceiling, and
/// version/dimension drawn from the known sets.
fn validate_request(
    version: &str,
    dimension: &str,
    sx: i64,
    sz: i64,
    ceiling: i64,
) -> Result<(), String> {
    if GameVersion::from_query(version).is_none() {
        return Err(format!("unknown version '{version}'"));
    }
    if Dimension::from_query(dimension).is_none() {
        return Err(format!("unknown dimension '{dimension}'"));
    }
    if sx <= 0 || sz <= 0 {
        return Err(format!("invalid span {sx}x{sz}"));
    }
    if sx * sz > ceiling {
        return Err(format!("request area {} exceeds ceiling {ceiling}", sx * sz));
    }
    Ok(())
}

/// `GET /api/classification`: a row-major JSON array of `sx*sz`
/// classification codes sampled at `scale`-block spacing.
pub async fn get_classification(
    State(state): State<AppState>,
    Query(query): Query<ClassificationQuery>,
) -> Response {
    if query.scale <= 0 {
        return bad_request(format!("invalid scale {}", query.scale));
    }
    if let Err(message) = validate_request(
        &query.version,
        &query.dimension,
        query.sx,
        query.sz,
        CLASSIFICATION_AREA_CEILING,
    ) {
        return bad_request(message);
    }

    match generator::classification(
        &state.classification_bin,
        state.generator_timeout,
        query.seed,
        &query.version,
        query.scale,
        query.x,
        query.z,
        query.sx,
        query.sz,
        &query.dimension,
    )
    .await
    {
        Ok(codes) => Json(codes).into_response(),
        Err(err) => generator_failure(err),
    }
}

/// `GET /api/features`: a JSON array of `{kind, x, z}` covering the
/// requested block rectangle.
pub async fn get_features(
    State(state): State<AppState>,
    Query(query): Query<FeaturesQuery>,
) -> Response {
    if let Err(message) = validate_request(
        &query.version,
        &query.dimension,
        query.sx,
        query.sz,
        FEATURES_AREA_CEILING,
    ) {
        return bad_request(message);
    }

    match generator::features(
        &state.features_bin,
        state.generator_timeout,
        query.seed,
        &query.version,
        query.x,
        query.z,
        query.sx,
        query.sz,
        &query.dimension,
    )
    .await
    {
        Ok(features) => Json(features).into_response(),
        Err(err) => generator_failure(err),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_full_tile_request() {
        assert!(validate_request("120", "overworld", 128, 128, CLASSIFICATION_AREA_CEILING).is_ok());
    }

    #[test]
    fn rejects_area_over_ceiling() {
        let err = validate_request("120", "overworld", 512, 512, CLASSIFICATION_AREA_CEILING)
            .unwrap_err();
        assert!(err.contains("exceeds ceiling"), "{err}");
    }

    #[test]
    fn rejects_unknown_version_and_dimension() {
        assert!(validate_request("121", "overworld", 16, 16, CLASSIFICATION_AREA_CEILING).is_err());
        assert!(validate_request("120", "aether", 16, 16, CLASSIFICATION_AREA_CEILING).is_err());
    }

    #[test]
    fn rejects_non_positive_spans() {
        assert!(validate_request("120", "overworld", 0, 16, CLASSIFICATION_AREA_CEILING).is_err());
        assert!(validate_request("120", "overworld", 16, -4, CLASSIFICATION_AREA_CEILING).is_err());
    }

    #[test]
    fn feature_ceiling_admits_the_default_marker_extent() {
        assert!(
            validate_request("120", "overworld", 20_000, 20_000, FEATURES_AREA_CEILING).is_ok()
        );
        assert!(
            validate_request("120", "overworld", 20_001, 20_001, FEATURES_AREA_CEILING).is_err()
        );
    }
}
