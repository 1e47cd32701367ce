use std::path::PathBuf;
use std::time::Duration;

pub const SERVER_PORT: u16 = 3000;

/// Hard ceiling on classification request area, in samples. A 512-block
/// tile at 1:4 scale is 16 384 samples, so this allows generous margins
/// while keeping a single generator run bounded.
pub const CLASSIFICATION_AREA_CEILING: i64 = 250_000;

/// Feature queries address whole block rectangles; one query covers the
/// client's entire marker extent, hence the much larger ceiling.
pub const FEATURES_AREA_CEILING: i64 = 400_000_001;

pub const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 10;

const DEFAULT_CLASSIFICATION_BIN: &str = "generator/classification_json";
const DEFAULT_FEATURES_BIN: &str = "generator/features_json";

pub fn classification_bin() -> PathBuf {
    std::env::var("LOAM_CLASSIFICATION_BIN")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CLASSIFICATION_BIN))
}

pub fn features_bin() -> PathBuf {
    std::env::var("LOAM_FEATURES_BIN")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FEATURES_BIN))
}

pub fn generator_timeout() -> Duration {
    std::env::var("LOAM_GENERATOR_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_timeout_env_override() {
        temp_env::with_var("LOAM_GENERATOR_TIMEOUT_SECS", Some("3"), || {
            assert_eq!(generator_timeout(), Duration::from_secs(3));
        });
        temp_env::with_var("LOAM_GENERATOR_TIMEOUT_SECS", Some("0"), || {
            assert_eq!(
                generator_timeout(),
                Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS)
            );
        });
        temp_env::with_var("LOAM_GENERATOR_TIMEOUT_SECS", None::<&str>, || {
            assert_eq!(
                generator_timeout(),
                Duration::from_secs(DEFAULT_GENERATOR_TIMEOUT_SECS)
            );
        });
    }

    #[test]
    fn binary_paths_env_override() {
        temp_env::with_var("LOAM_CLASSIFICATION_BIN", Some("/opt/gen/classify"), || {
            assert_eq!(classification_bin(), PathBuf::from("/opt/gen/classify"));
        });
        temp_env::with_var("LOAM_CLASSIFICATION_BIN", Some("  "), || {
            assert_eq!(
                classification_bin(),
                PathBuf::from(DEFAULT_CLASSIFICATION_BIN)
            );
        });
        temp_env::with_var("LOAM_FEATURES_BIN", None::<&str>, || {
            assert_eq!(features_bin(), PathBuf::from(DEFAULT_FEATURES_BIN));
        });
    }
}
