use crate::viewport::Viewport;

/// Input state machine for the map surface.
///
/// Pointer events drive `Idle <-> Panning`; the touch-point list drives
/// `Pinching`. A second touch always wins over a drag in progress, and
/// lifting back to one finger re-anchors a pan at the surviving point so
/// the map does not jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Panning { last_x: f64, last_y: f64 },
    Pinching { distance: f64 },
}

pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        // A pinch in progress owns the input until a finger lifts.
        if !matches!(self.state, GestureState::Pinching { .. }) {
            self.state = GestureState::Panning {
                last_x: x,
                last_y: y,
            };
        }
    }

    /// Advance a drag. Returns true if the viewport moved (callers repaint
    /// and skip hit-testing while dragging).
    pub fn pointer_move(&mut self, vp: &mut Viewport, x: f64, y: f64) -> bool {
        match self.state {
            GestureState::Panning { last_x, last_y } => {
                vp.pan_screen(x - last_x, y - last_y);
                self.state = GestureState::Panning {
                    last_x: x,
                    last_y: y,
                };
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) {
        if matches!(self.state, GestureState::Panning { .. }) {
            self.state = GestureState::Idle;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    pub fn wheel(&mut self, vp: &mut Viewport, delta_y: f64) {
        vp.zoom_wheel(delta_y);
    }

    /// Feed the current touch-point list (touchstart/touchmove/touchend all
    /// report the full list). Two points pinch-zoom; one point pans; none
    /// returns to idle.
    pub fn touch_points(&mut self, vp: &mut Viewport, points: &[(f64, f64)]) {
        match points {
            [a, b, ..] => {
                let dx = b.0 - a.0;
                let dy = b.1 - a.1;
                let distance = (dx * dx + dy * dy).sqrt();
                if let GestureState::Pinching { distance: previous } = self.state
                    && previous > 0.0
                {
                    vp.zoom_pinch(distance / previous);
                }
                self.state = GestureState::Pinching { distance };
            }
            [a] => match self.state {
                GestureState::Panning { last_x, last_y } => {
                    vp.pan_screen(a.0 - last_x, a.1 - last_y);
                    self.state = GestureState::Panning {
                        last_x: a.0,
                        last_y: a.1,
                    };
                }
                _ => {
                    self.state = GestureState::Panning {
                        last_x: a.0,
                        last_y: a.1,
                    };
                }
            },
            [] => {
                self.state = GestureState::Idle;
            }
        }
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}
