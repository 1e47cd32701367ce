/// Static lookup from generator classification codes to display names and
/// map colors. Codes follow the generator's numbering; anything the table
/// does not know renders as "Unknown" in a neutral gray.
///
/// Colors are packed 0xRRGGBB.
const REGIONS: &[(i32, &str, u32)] = &[
    (0, "Ocean", 0x000070),
    (1, "Plains", 0x8db360),
    (2, "Desert", 0xfa9418),
    (3, "Windswept Hills", 0x606060),
    (4, "Forest", 0x056621),
    (5, "Taiga", 0x0b6659),
    (6, "Swamp", 0x07f9b2),
    (7, "River", 0x0000ff),
    (8, "Nether Wastes", 0x572526),
    (9, "The End", 0x8080ff),
    (10, "Frozen Ocean", 0x7070d6),
    (11, "Frozen River", 0xa0a0ff),
    (12, "Snowy Plains", 0xffffff),
    (14, "Mushroom Fields", 0xff00ff),
    (16, "Beach", 0xfade55),
    (21, "Jungle", 0x537b09),
    (23, "Sparse Jungle", 0x628b17),
    (24, "Deep Ocean", 0x000030),
    (25, "Stony Shore", 0xa2a284),
    (26, "Snowy Beach", 0xfaf0c0),
    (27, "Birch Forest", 0x307444),
    (29, "Dark Forest", 0x40511a),
    (30, "Snowy Taiga", 0x31554a),
    (32, "Old Growth Pine Taiga", 0x596651),
    (34, "Windswept Forest", 0x5b7352),
    (35, "Savanna", 0xbdb25f),
    (36, "Savanna Plateau", 0xa79d64),
    (37, "Badlands", 0xd94515),
    (38, "Wooded Badlands", 0xb09765),
    (40, "Small End Islands", 0x4b4bab),
    (41, "End Midlands", 0xc9c959),
    (42, "End Highlands", 0xb5b536),
    (43, "End Barrens", 0x7070cc),
    (44, "Warm Ocean", 0x0000ac),
    (45, "Lukewarm Ocean", 0x000090),
    (46, "Cold Ocean", 0x202070),
    (48, "Deep Lukewarm Ocean", 0x000040),
    (49, "Deep Cold Ocean", 0x202038),
    (50, "Deep Frozen Ocean", 0x404090),
    (129, "Sunflower Plains", 0xb5db88),
    (132, "Flower Forest", 0x2d8e49),
    (140, "Ice Spikes", 0xb4dcdc),
    (149, "Bamboo Jungle", 0x768e14),
    (160, "Old Growth Spruce Taiga", 0x818e79),
    (163, "Windswept Savanna", 0xe5da87),
    (165, "Eroded Badlands", 0xff6d3d),
    (170, "Soul Sand Valley", 0x5e3830),
    (171, "Crimson Forest", 0xdd0808),
    (172, "Warped Forest", 0x49907b),
    (173, "Basalt Deltas", 0x403636),
    (174, "Dripstone Caves", 0x7b6254),
    (175, "Lush Caves", 0x283c00),
    (177, "Meadow", 0x60a445),
    (178, "Grove", 0x47726c),
    (179, "Snowy Slopes", 0xc4c4c4),
    (180, "Jagged Peaks", 0xdcdcc8),
    (181, "Frozen Peaks", 0xb0b3ce),
    (182, "Stony Peaks", 0x7b8f74),
    (183, "Deep Dark", 0x031f29),
    (184, "Mangrove Swamp", 0x2ccc8e),
    (185, "Cherry Grove", 0xe9b1cc),
];

const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_COLOR: u32 = 0x3f3f3f;

pub fn classification_name(code: i32) -> &'static str {
    REGIONS
        .iter()
        .find(|(id, _, _)| *id == code)
        .map(|(_, name, _)| *name)
        .unwrap_or(UNKNOWN_NAME)
}

/// Map color for a classification code as RGB bytes.
pub fn classification_color(code: i32) -> (u8, u8, u8) {
    let packed = REGIONS
        .iter()
        .find(|(id, _, _)| *id == code)
        .map(|(_, _, color)| *color)
        .unwrap_or(UNKNOWN_COLOR);
    unpack_rgb(packed)
}

/// Split a packed 0xRRGGBB color into bytes.
pub fn unpack_rgb(packed: u32) -> (u8, u8, u8) {
    (
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(classification_name(1), "Plains");
        assert_eq!(classification_name(185), "Cherry Grove");
        assert_eq!(classification_color(7), (0x00, 0x00, 0xff));
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(classification_name(-1), "Unknown");
        assert_eq!(classification_name(9999), "Unknown");
        assert_eq!(classification_color(9999), unpack_rgb(0x3f3f3f));
    }

    #[test]
    fn unpacks_color_channels() {
        assert_eq!(unpack_rgb(0x8db360), (0x8d, 0xb3, 0x60));
        assert_eq!(unpack_rgb(0x000000), (0, 0, 0));
        assert_eq!(unpack_rgb(0xffffff), (255, 255, 255));
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        for (i, (code, _, _)) in REGIONS.iter().enumerate() {
            assert!(
                !REGIONS[i + 1..].iter().any(|(other, _, _)| other == code),
                "duplicate classification code {code}"
            );
        }
    }
}
