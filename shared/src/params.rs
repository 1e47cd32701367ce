use serde::{Deserialize, Serialize};

/// Game version the generator is asked to emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVersion {
    V1_18,
    V1_19,
    V1_20,
}

impl GameVersion {
    /// Wire encoding used in query strings and generator arguments.
    pub fn as_query(self) -> &'static str {
        match self {
            Self::V1_18 => "118",
            Self::V1_19 => "119",
            Self::V1_20 => "120",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::V1_18 => "1.18",
            Self::V1_19 => "1.19",
            Self::V1_20 => "1.20",
        }
    }

    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "118" => Some(Self::V1_18),
            "119" => Some(Self::V1_19),
            "120" => Some(Self::V1_20),
            _ => None,
        }
    }

    pub const ALL: [GameVersion; 3] = [Self::V1_18, Self::V1_19, Self::V1_20];
}

/// World dimension. Classification codes and feature kinds both depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

impl Dimension {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Nether => "nether",
            Self::End => "end",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overworld => "Overworld",
            Self::Nether => "Nether",
            Self::End => "End",
        }
    }

    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "overworld" => Some(Self::Overworld),
            "nether" => Some(Self::Nether),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    pub const ALL: [Dimension; 3] = [Self::Overworld, Self::Nether, Self::End];
}

/// The full parameter set the generated world is a pure function of.
/// Any change invalidates every previously fetched tile and feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub seed: i64,
    pub version: GameVersion,
    pub dimension: Dimension,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            version: GameVersion::V1_20,
            dimension: Dimension::Overworld,
        }
    }
}

/// Parse a seed from user text input. Accepts any signed 64-bit integer.
pub fn parse_seed(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_query_round_trip() {
        for v in GameVersion::ALL {
            assert_eq!(GameVersion::from_query(v.as_query()), Some(v));
        }
        assert_eq!(GameVersion::from_query("117"), None);
    }

    #[test]
    fn dimension_query_round_trip() {
        for d in Dimension::ALL {
            assert_eq!(Dimension::from_query(d.as_query()), Some(d));
        }
        assert_eq!(Dimension::from_query("aether"), None);
    }

    #[test]
    fn parses_signed_64_bit_seeds() {
        assert_eq!(parse_seed("12345"), Some(12345));
        assert_eq!(parse_seed("  -98765  "), Some(-98765));
        assert_eq!(parse_seed("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_seed("9223372036854775808"), None);
        assert_eq!(parse_seed("not a seed"), None);
    }
}
