use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::process::Command;

use loam_shared::Feature;

/// Failure modes of one generator run. None of these are fatal to the
/// process; handlers map them to a 500 with a short description.
#[derive(Debug)]
pub enum GeneratorError {
    Spawn(std::io::Error),
    Timeout(Duration),
    Failed { code: Option<i32>, stderr: String },
    Parse(serde_json::Error),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to launch generator: {e}"),
            Self::Timeout(limit) => write!(f, "generator exceeded {}s time limit", limit.as_secs()),
            Self::Failed { code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                write!(f, "generator exited with {code}: {}", stderr.trim())
            }
            Self::Parse(e) => write!(f, "generator produced invalid JSON: {e}"),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Run a generator binary and parse its stdout as JSON. The binaries are
/// opaque: this layer knows their argument order and output shape, nothing
/// about how the world is derived.
async fn run_json<T: DeserializeOwned>(
    bin: &Path,
    args: &[String],
    time_limit: Duration,
) -> Result<T, GeneratorError> {
    let output = tokio::time::timeout(
        time_limit,
        Command::new(bin).args(args).kill_on_drop(true).output(),
    )
    .await
    .map_err(|_| GeneratorError::Timeout(time_limit))?
    .map_err(GeneratorError::Spawn)?;

    if !output.status.success() {
        return Err(GeneratorError::Failed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    if !output.stderr.is_empty() {
        tracing::warn!(
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "generator wrote to stderr"
        );
    }

    serde_json::from_slice(&output.stdout).map_err(GeneratorError::Parse)
}

/// Classification raster: `sx × sz` codes, row-major, sampled every
/// `scale` blocks from sample origin `(x, z)`. Emitted by the binary as a
/// bare JSON array.
#[allow(clippy::too_many_arguments)]
pub async fn classification(
    bin: &Path,
    time_limit: Duration,
    seed: i64,
    version: &str,
    scale: i64,
    x: i64,
    z: i64,
    sx: i64,
    sz: i64,
    dimension: &str,
) -> Result<Vec<i32>, GeneratorError> {
    let args = vec![
        seed.to_string(),
        version.to_string(),
        scale.to_string(),
        x.to_string(),
        z.to_string(),
        sx.to_string(),
        sz.to_string(),
        dimension.to_string(),
    ];
    run_json(bin, &args, time_limit).await
}

/// Features inside the block rectangle starting at `(x, z)`, emitted as a
/// bare JSON array of `{kind, x, z}`.
#[allow(clippy::too_many_arguments)]
pub async fn features(
    bin: &Path,
    time_limit: Duration,
    seed: i64,
    version: &str,
    x: i64,
    z: i64,
    sx: i64,
    sz: i64,
    dimension: &str,
) -> Result<Vec<Feature>, GeneratorError> {
    let args = vec![
        seed.to_string(),
        version.to_string(),
        x.to_string(),
        z.to_string(),
        sx.to_string(),
        sz.to_string(),
        dimension.to_string(),
    ];
    run_json(bin, &args, time_limit).await
}
