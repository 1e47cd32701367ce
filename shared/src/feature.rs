use serde::{Deserialize, Serialize};

use crate::params::Dimension;

/// A generated point of interest, as reported by the feature generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: String,
    pub x: i32,
    pub z: i32,
}

/// Display metadata for a feature kind.
#[derive(Debug, Clone, Copy)]
pub struct FeatureKindInfo {
    pub kind: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    /// Marker accent color, packed 0xRRGGBB.
    pub color: u32,
    pub dimensions: &'static [Dimension],
    pub default_visible: bool,
}

const OVERWORLD: &[Dimension] = &[Dimension::Overworld];
const NETHER: &[Dimension] = &[Dimension::Nether];
const END: &[Dimension] = &[Dimension::End];
const OVERWORLD_NETHER: &[Dimension] = &[Dimension::Overworld, Dimension::Nether];

const KINDS: &[FeatureKindInfo] = &[
    FeatureKindInfo {
        kind: "village",
        name: "Village",
        glyph: "\u{1F3E0}",
        color: 0xc9a227,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "stronghold",
        name: "Stronghold",
        glyph: "\u{1F9ED}",
        color: 0x8f7ad1,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "mansion",
        name: "Woodland Mansion",
        glyph: "\u{1F3DA}",
        color: 0x6d4c2f,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "monument",
        name: "Ocean Monument",
        glyph: "\u{1F531}",
        color: 0x2fa4a8,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "outpost",
        name: "Pillager Outpost",
        glyph: "\u{1F6A9}",
        color: 0xb04a3a,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "desert_pyramid",
        name: "Desert Pyramid",
        glyph: "\u{1F3DC}",
        color: 0xd8c06a,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "jungle_temple",
        name: "Jungle Temple",
        glyph: "\u{1F5FF}",
        color: 0x5d8f3c,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "ancient_city",
        name: "Ancient City",
        glyph: "\u{1F3DB}",
        color: 0x37556a,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "treasure",
        name: "Buried Treasure",
        glyph: "\u{1F4B0}",
        color: 0xd6a431,
        dimensions: OVERWORLD,
        default_visible: false,
    },
    FeatureKindInfo {
        kind: "ruined_portal",
        name: "Ruined Portal",
        glyph: "\u{1F300}",
        color: 0x7c52c7,
        dimensions: OVERWORLD_NETHER,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "trail_ruins",
        name: "Trail Ruins",
        glyph: "\u{1F3FA}",
        color: 0x9c6f4e,
        dimensions: OVERWORLD,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "fortress",
        name: "Fortress",
        glyph: "\u{1F3EF}",
        color: 0x8c2c2c,
        dimensions: NETHER,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "bastion",
        name: "Bastion Remnant",
        glyph: "\u{2694}",
        color: 0x4a4048,
        dimensions: NETHER,
        default_visible: true,
    },
    FeatureKindInfo {
        kind: "end_city",
        name: "End City",
        glyph: "\u{1F307}",
        color: 0xb59ad6,
        dimensions: END,
        default_visible: true,
    },
];

/// All known feature kinds, in display order.
pub fn feature_kinds() -> &'static [FeatureKindInfo] {
    KINDS
}

pub fn feature_kind_info(kind: &str) -> Option<&'static FeatureKindInfo> {
    KINDS.iter().find(|info| info.kind == kind)
}

impl FeatureKindInfo {
    pub fn occurs_in(&self, dimension: Dimension) -> bool {
        self.dimensions.contains(&dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_kinds() {
        let village = feature_kind_info("village").unwrap();
        assert_eq!(village.name, "Village");
        assert!(village.occurs_in(Dimension::Overworld));
        assert!(!village.occurs_in(Dimension::Nether));
    }

    #[test]
    fn unknown_kind_is_none() {
        assert!(feature_kind_info("woodland_shed").is_none());
    }

    #[test]
    fn ruined_portal_spans_two_dimensions() {
        let portal = feature_kind_info("ruined_portal").unwrap();
        assert!(portal.occurs_in(Dimension::Overworld));
        assert!(portal.occurs_in(Dimension::Nether));
        assert!(!portal.occurs_in(Dimension::End));
    }

    #[test]
    fn every_dimension_has_at_least_one_kind() {
        for dim in Dimension::ALL {
            assert!(KINDS.iter().any(|info| info.occurs_in(dim)), "{dim:?}");
        }
    }

    #[test]
    fn buried_treasure_hidden_by_default() {
        assert!(!feature_kind_info("treasure").unwrap().default_visible);
        assert!(feature_kind_info("village").unwrap().default_visible);
    }

    #[test]
    fn feature_wire_format_round_trips() {
        let f = Feature {
            kind: "village".into(),
            x: -1024,
            z: 2048,
        };
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(serde_json::from_str::<Feature>(&json).unwrap(), f);
    }
}
