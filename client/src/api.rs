use loam_shared::{Feature, GenerationParams};

/// Hard ceiling on classification request area (samples), enforced by the
/// server. Requests that would exceed it are rejected here, before
/// dispatch; the server would only refuse them anyway.
pub const CLASSIFICATION_AREA_CEILING: i64 = 250_000;
/// Feature queries cover whole regions at block granularity, so the
/// ceiling is far larger.
pub const FEATURES_AREA_CEILING: i64 = 400_000_001;

/// Build the classification request URL. `x0`/`z0` are the region origin
/// in world blocks; the wire protocol addresses samples, so the origin is
/// divided by `scale`. Fails without dispatching if the sample area
/// exceeds the ceiling.
pub fn classification_url(
    params: &GenerationParams,
    x0: i32,
    z0: i32,
    sx: i32,
    sz: i32,
    scale: i32,
) -> Result<String, String> {
    let area = sx as i64 * sz as i64;
    if area > CLASSIFICATION_AREA_CEILING {
        return Err(format!(
            "classification request of {area} samples exceeds ceiling {CLASSIFICATION_AREA_CEILING}"
        ));
    }
    Ok(format!(
        "/api/classification?seed={}&version={}&dimension={}&x={}&z={}&sx={sx}&sz={sz}&scale={scale}",
        params.seed,
        params.version.as_query(),
        params.dimension.as_query(),
        x0 / scale,
        z0 / scale,
    ))
}

/// Build the feature request URL for a block-space rectangle.
pub fn features_url(
    params: &GenerationParams,
    x0: i32,
    z0: i32,
    sx: i32,
    sz: i32,
) -> Result<String, String> {
    let area = sx as i64 * sz as i64;
    if area > FEATURES_AREA_CEILING {
        return Err(format!(
            "feature request of {area} blocks exceeds ceiling {FEATURES_AREA_CEILING}"
        ));
    }
    Ok(format!(
        "/api/features?seed={}&version={}&dimension={}&x={x0}&z={z0}&sx={sx}&sz={sz}",
        params.seed,
        params.version.as_query(),
        params.dimension.as_query(),
    ))
}

/// Fetch the classification raster for a region: `sx × sz` samples at
/// `scale`-block spacing starting at world block `(x0, z0)`, row-major.
pub async fn fetch_region_classification(
    params: &GenerationParams,
    x0: i32,
    z0: i32,
    sx: i32,
    sz: i32,
    scale: i32,
) -> Result<Vec<i32>, String> {
    let url = classification_url(params, x0, z0, sx, sz, scale)?;
    let resp = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<Vec<i32>>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Fetch all features inside a block-space rectangle.
pub async fn fetch_region_features(
    params: &GenerationParams,
    x0: i32,
    z0: i32,
    sx: i32,
    sz: i32,
) -> Result<Vec<Feature>, String> {
    let url = features_url(params, x0, z0, sx, sz)?;
    let resp = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<Vec<Feature>>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_shared::{Dimension, GameVersion};

    fn params() -> GenerationParams {
        GenerationParams {
            seed: -42,
            version: GameVersion::V1_19,
            dimension: Dimension::Nether,
        }
    }

    #[test]
    fn classification_url_addresses_samples() {
        let url = classification_url(&params(), -512, 1024, 128, 128, 4).unwrap();
        assert_eq!(
            url,
            "/api/classification?seed=-42&version=119&dimension=nether&x=-128&z=256&sx=128&sz=128&scale=4"
        );
    }

    #[test]
    fn oversized_classification_request_is_rejected_before_dispatch() {
        let err = classification_url(&params(), 0, 0, 512, 512, 1).unwrap_err();
        assert!(err.contains("exceeds ceiling"), "{err}");
        // One tile's worth sits comfortably under the ceiling.
        assert!(classification_url(&params(), 0, 0, 128, 128, 4).is_ok());
    }

    #[test]
    fn features_url_addresses_blocks() {
        let url = features_url(&params(), -10_000, -10_000, 20_000, 20_000).unwrap();
        assert_eq!(
            url,
            "/api/features?seed=-42&version=119&dimension=nether&x=-10000&z=-10000&sx=20000&sz=20000"
        );
    }

    #[test]
    fn oversized_feature_request_is_rejected() {
        assert!(features_url(&params(), 0, 0, 20_001, 20_001).is_err());
        assert!(features_url(&params(), 0, 0, 20_000, 20_000).is_ok());
    }
}
