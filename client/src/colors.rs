use loam_shared::classification::unpack_rgb;

/// Format RGBA as a CSS color string.
pub fn rgba_css(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({r},{g},{b},{a})")
}

/// CSS color string from a packed 0xRRGGBB registry color.
pub fn packed_css(packed: u32, a: f64) -> String {
    let (r, g, b) = unpack_rgb(packed);
    rgba_css(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_packed_registry_colors() {
        assert_eq!(packed_css(0xc9a227, 1.0), "rgba(201,162,39,1)");
        assert_eq!(packed_css(0x000000, 0.5), "rgba(0,0,0,0.5)");
    }
}
