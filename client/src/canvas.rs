#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, TouchEvent, WheelEvent};

use loam_shared::{Feature, classification_name, feature_kind_info};

use crate::app::{HoverInfo, HoverReadout, VisibilityFilter};
use crate::colors::packed_css;
use crate::gestures::GestureController;
use crate::render_loop::FrameLoop;
use crate::tiles::{SampleStatus, TILE_SIZE_BLOCKS, TileCache, tile_range};
use crate::viewport::Viewport;

/// Markers scale with zoom but never drop below a legible radius.
const MARKER_RADIUS_MAX: f64 = 12.0;
const MARKER_RADIUS_MIN: f64 = 6.0;
/// Glyph text appears only once the map is zoomed in enough to read it.
const GLYPH_ZOOM_THRESHOLD: f64 = 0.05;

fn marker_radius(zoom: f64) -> f64 {
    (MARKER_RADIUS_MAX * (zoom * 2.0).min(1.0)).max(MARKER_RADIUS_MIN)
}

fn glyph_visible(zoom: f64) -> bool {
    zoom > GLYPH_ZOOM_THRESHOLD
}

fn hover_label(status: SampleStatus) -> String {
    match status {
        SampleStatus::Classified(code) => classification_name(code).to_string(),
        SampleStatus::Pending => "Loading...".to_string(),
        SampleStatus::Unknown => "Unknown".to_string(),
    }
}

/// The map surface: composites cached tiles and feature markers every
/// frame and feeds pointer/touch input through the gesture controller.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let viewport: RwSignal<Viewport> = expect_context();
    let features: RwSignal<Vec<Feature>> = expect_context();
    let VisibilityFilter(visibility) = expect_context();
    let HoverReadout(readout) = expect_context();
    let cache: TileCache = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let gestures = Rc::new(RefCell::new(GestureController::new()));

    let cache_render = cache.clone();
    let frame = FrameLoop::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;
        let vp = viewport.get_untracked();
        features.with_untracked(|feats| {
            visibility.with_untracked(|vis| {
                render_frame(canvas, &cache_render, &vp, feats, vis);
            });
        });
    });

    // The effect owns the loop for the component's lifetime; disposing it
    // drops the `FrameLoop`, which cancels the scheduled continuation.
    Effect::new(move || {
        frame.start();
    });

    // --- Input handlers ---

    let local_coords = move |client_x: f64, client_y: f64| -> (f64, f64) {
        canvas_ref
            .get_untracked()
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                (client_x - rect.left(), client_y - rect.top())
            })
            .unwrap_or((client_x, client_y))
    };

    let report_hover = {
        let cache = cache.clone();
        move |x: f64, y: f64| {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let (w, h) = surface_size(canvas);
            let vp = viewport.get_untracked();
            let (wx, wz) = vp.screen_to_world(w, h, x, y);
            let label = hover_label(cache.status_at(wx, wz));
            readout.set(Some(HoverInfo {
                world_x: wx.floor() as i32,
                world_z: wz.floor() as i32,
                label,
            }));
        }
    };

    let on_pointer_down = {
        let gestures = gestures.clone();
        move |e: PointerEvent| {
            let (x, y) = (e.client_x() as f64, e.client_y() as f64);
            gestures.borrow_mut().pointer_down(x, y);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let gestures = gestures.clone();
        move |e: PointerEvent| {
            let (x, y) = (e.client_x() as f64, e.client_y() as f64);
            viewport.update(|vp| {
                gestures.borrow_mut().pointer_move(vp, x, y);
            });
            // Hover is reported on every move, dragging or not.
            let (lx, ly) = local_coords(x, y);
            report_hover(lx, ly);
        }
    };

    let on_pointer_up = {
        let gestures = gestures.clone();
        move |e: PointerEvent| {
            gestures.borrow_mut().pointer_up();

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    let on_pointer_leave = {
        let gestures = gestures.clone();
        move |_: PointerEvent| {
            gestures.borrow_mut().pointer_leave();
            readout.set(None);
        }
    };

    let on_wheel = {
        let gestures = gestures.clone();
        move |e: WheelEvent| {
            e.prevent_default();
            let delta = e.delta_y();
            viewport.update(|vp| gestures.borrow_mut().wheel(vp, delta));
        }
    };

    let touch_handler = {
        let gestures = gestures.clone();
        Rc::new(move |e: TouchEvent| {
            let touches = e.touches();
            let mut points = Vec::with_capacity(touches.length() as usize);
            for i in 0..touches.length() {
                if let Some(t) = touches.get(i) {
                    points.push((t.client_x() as f64, t.client_y() as f64));
                }
            }
            if points.len() >= 2 {
                e.prevent_default();
            }
            viewport.update(|vp| gestures.borrow_mut().touch_points(vp, &points));
        })
    };
    let on_touch_start = {
        let touch_handler = touch_handler.clone();
        move |e: TouchEvent| touch_handler(e)
    };
    let on_touch_move = {
        let touch_handler = touch_handler.clone();
        move |e: TouchEvent| touch_handler(e)
    };
    let on_touch_end = move |e: TouchEvent| touch_handler(e);

    view! {
        <canvas
            node_ref=canvas_ref
            style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; image-rendering: pixelated; cursor: grab; background: #0c0e17;"
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:wheel=on_wheel
            on:touchstart=on_touch_start
            on:touchmove=on_touch_move
            on:touchend=on_touch_end
        />
    }
}

fn surface_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (rect.width(), rect.height())
}

/// One frame: size the backing store, enumerate the visible tile range,
/// request-and-composite tiles, then draw visible markers on top.
fn render_frame(
    canvas: &HtmlCanvasElement,
    cache: &TileCache,
    vp: &Viewport,
    features: &[Feature],
    visibility: &HashMap<String, bool>,
) {
    let (w, h) = surface_size(canvas);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let dpr = web_sys::window()
        .map(|win| win.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0);
    let pw = (w * dpr).round().max(1.0) as u32;
    let ph = (h * dpr).round().max(1.0) as u32;
    if canvas.width() != pw || canvas.height() != ph {
        canvas.set_width(pw);
        canvas.set_height(ph);
    }

    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    // All drawing below is in CSS pixel coordinates.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
    ctx.clear_rect(0.0, 0.0, w, h);

    let rect = vp.visible_world_rect(w, h);
    let (min_tx, max_tx, min_tz, max_tz) = tile_range(&rect);
    let tile_screen_edge = TILE_SIZE_BLOCKS as f64 * vp.zoom;

    ctx.set_image_smoothing_enabled(false);
    for tx in min_tx..=max_tx {
        for tz in min_tz..=max_tz {
            cache.ensure(tx, tz);
            let Some(surface) = cache.composite_surface(tx, tz) else {
                // Unresolved tiles stay transparent; no placeholder.
                continue;
            };
            let (sx, sy) = vp.world_to_screen(
                w,
                h,
                (tx * TILE_SIZE_BLOCKS) as f64,
                (tz * TILE_SIZE_BLOCKS) as f64,
            );
            ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                &surface,
                sx,
                sy,
                tile_screen_edge,
                tile_screen_edge,
            )
            .ok();
        }
    }
    ctx.set_image_smoothing_enabled(true);

    draw_markers(&ctx, vp, w, h, features, visibility);
}

fn draw_markers(
    ctx: &CanvasRenderingContext2d,
    vp: &Viewport,
    w: f64,
    h: f64,
    features: &[Feature],
    visibility: &HashMap<String, bool>,
) {
    let rect = vp.visible_world_rect(w, h);
    let radius = marker_radius(vp.zoom);
    let show_glyphs = glyph_visible(vp.zoom);

    for feature in features {
        if !visibility.get(&feature.kind).copied().unwrap_or(false) {
            continue;
        }
        let Some(info) = feature_kind_info(&feature.kind) else {
            continue;
        };
        let (fx, fz) = (feature.x as f64, feature.z as f64);
        if !rect.contains(fx, fz) {
            continue;
        }

        let (sx, sy) = vp.world_to_screen(w, h, fx, fz);
        ctx.set_fill_style_str(&packed_css(info.color, 0.92));
        ctx.begin_path();
        ctx.arc(sx, sy, radius, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
        ctx.set_stroke_style_str("rgba(255,255,255,0.9)");
        ctx.set_line_width(1.5);
        ctx.stroke();

        if show_glyphs {
            ctx.set_font(&format!("{radius:.0}px sans-serif"));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_fill_style_str("rgba(255,255,255,0.95)");
            ctx.fill_text(info.glyph, sx, sy).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_radius_clamps_to_legible_minimum() {
        assert_eq!(marker_radius(0.01), 6.0);
        assert_eq!(marker_radius(0.25), 6.0);
        assert!((marker_radius(0.4) - 9.6).abs() < 1e-12);
        assert_eq!(marker_radius(0.5), 12.0);
        assert_eq!(marker_radius(2.0), 12.0);
    }

    #[test]
    fn glyphs_appear_past_legibility_threshold() {
        assert!(!glyph_visible(0.01));
        assert!(!glyph_visible(0.05));
        assert!(glyph_visible(0.06));
    }

    #[test]
    fn hover_labels_cover_all_states() {
        assert_eq!(hover_label(SampleStatus::Classified(1)), "Plains");
        assert_eq!(hover_label(SampleStatus::Pending), "Loading...");
        assert_eq!(hover_label(SampleStatus::Unknown), "Unknown");
    }
}
