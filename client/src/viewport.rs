/// Viewport manages the pan/zoom mapping from world block coordinates to
/// screen pixels. The camera is a world-space center plus a zoom factor
/// (blocks-to-pixels scale, 1.0 = one pixel per block).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_x: f64,
    pub center_z: f64,
    pub zoom: f64,
}

pub const ZOOM_MIN: f64 = 0.01;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_STEP: f64 = 1.5;
const DEFAULT_ZOOM: f64 = 0.25;

/// World-space rectangle covered by the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl WorldRect {
    pub fn contains(&self, x: f64, z: f64) -> bool {
        x >= self.left && x <= self.right && z >= self.top && z <= self.bottom
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_z: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    /// Convert world coordinates to screen coordinates on a w×h surface.
    pub fn world_to_screen(&self, w: f64, h: f64, wx: f64, wz: f64) -> (f64, f64) {
        (
            w / 2.0 + (wx - self.center_x) * self.zoom,
            h / 2.0 + (wz - self.center_z) * self.zoom,
        )
    }

    /// Convert screen coordinates to world coordinates.
    pub fn screen_to_world(&self, w: f64, h: f64, px: f64, py: f64) -> (f64, f64) {
        (
            self.center_x + (px - w / 2.0) / self.zoom,
            self.center_z + (py - h / 2.0) / self.zoom,
        )
    }

    /// The world-space rectangle visible on a w×h surface. Bounds tile
    /// enumeration and marker clipping.
    pub fn visible_world_rect(&self, w: f64, h: f64) -> WorldRect {
        let half_w = w / 2.0 / self.zoom;
        let half_h = h / 2.0 / self.zoom;
        WorldRect {
            left: self.center_x - half_w,
            right: self.center_x + half_w,
            top: self.center_z - half_h,
            bottom: self.center_z + half_h,
        }
    }

    /// Pan by a screen-space delta. Dividing by zoom keeps panning speed
    /// resolution-independent.
    pub fn pan_screen(&mut self, dx: f64, dy: f64) {
        self.center_x -= dx / self.zoom;
        self.center_z -= dy / self.zoom;
    }

    /// Wheel zoom: exponential factor per scroll unit.
    pub fn zoom_wheel(&mut self, delta_y: f64) {
        let factor = 1.1f64.powf(-delta_y / 100.0);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Pinch zoom: multiply by the ratio of current to previous
    /// inter-touch distance.
    pub fn zoom_pinch(&mut self, ratio: f64) {
        self.zoom = (self.zoom * ratio).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_screen_round_trip() {
        let vp = Viewport {
            center_x: -300.0,
            center_z: 4120.5,
            zoom: 0.37,
        };
        let (w, h) = (1280.0, 720.0);
        for &(wx, wz) in &[(0.0, 0.0), (-300.0, 4120.5), (12_345.0, -9_876.0)] {
            let (px, py) = vp.world_to_screen(w, h, wx, wz);
            let (rx, rz) = vp.screen_to_world(w, h, px, py);
            assert!((rx - wx).abs() < 1e-9, "{rx} != {wx}");
            assert!((rz - wz).abs() < 1e-9, "{rz} != {wz}");
        }
    }

    #[test]
    fn center_maps_to_surface_center() {
        let vp = Viewport::default();
        assert_eq!(vp.world_to_screen(800.0, 450.0, 0.0, 0.0), (400.0, 225.0));
    }

    #[test]
    fn visible_rect_at_quarter_zoom() {
        let vp = Viewport {
            center_x: 0.0,
            center_z: 0.0,
            zoom: 0.25,
        };
        let rect = vp.visible_world_rect(800.0, 450.0);
        assert_eq!(rect.left, -1600.0);
        assert_eq!(rect.right, 1600.0);
        assert_eq!(rect.top, -900.0);
        assert_eq!(rect.bottom, 900.0);
    }

    #[test]
    fn pan_divides_by_zoom() {
        let mut vp = Viewport {
            center_x: 0.0,
            center_z: 0.0,
            zoom: 0.5,
        };
        vp.pan_screen(100.0, 0.0);
        assert_eq!(vp.center_x, -200.0);
        assert_eq!(vp.center_z, 0.0);
    }

    #[test]
    fn wheel_zoom_clamps_both_ends() {
        let mut vp = Viewport::default();
        for _ in 0..200 {
            vp.zoom_wheel(-120.0);
        }
        assert_eq!(vp.zoom, ZOOM_MAX);
        for _ in 0..500 {
            vp.zoom_wheel(120.0);
        }
        assert_eq!(vp.zoom, ZOOM_MIN);
    }

    #[test]
    fn pinch_ratio_scales_then_clamps() {
        let mut vp = Viewport {
            center_x: 0.0,
            center_z: 0.0,
            zoom: 1.0,
        };
        vp.zoom_pinch(150.0 / 100.0);
        assert!((vp.zoom - 1.5).abs() < 1e-12);
        vp.zoom_pinch(10.0);
        assert_eq!(vp.zoom, ZOOM_MAX);
    }

    #[test]
    fn step_zoom_stays_in_range() {
        let mut vp = Viewport::default();
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, ZOOM_MAX);
        for _ in 0..40 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, ZOOM_MIN);
        vp.reset();
        assert_eq!(vp.zoom, 0.25);
    }
}
