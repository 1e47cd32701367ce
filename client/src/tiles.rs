#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use loam_shared::{GenerationParams, classification_color};

use crate::viewport::WorldRect;

/// Tile edge length in world blocks.
pub const TILE_SIZE_BLOCKS: i32 = 512;
/// World blocks per classification sample (1:4 fetch density).
pub const FETCH_SCALE: i32 = 4;
/// Samples (and raster pixels) per tile edge.
pub const TILE_RES: i32 = TILE_SIZE_BLOCKS / FETCH_SCALE;

pub type TileKey = (i32, i32);

/// Tile grid cell owning a world coordinate.
pub fn tile_key(wx: f64, wz: f64) -> TileKey {
    (
        (wx / TILE_SIZE_BLOCKS as f64).floor() as i32,
        (wz / TILE_SIZE_BLOCKS as f64).floor() as i32,
    )
}

/// Inclusive tile coordinate range covering a visible world rect.
pub fn tile_range(rect: &WorldRect) -> (i32, i32, i32, i32) {
    let t = TILE_SIZE_BLOCKS as f64;
    (
        (rect.left / t).floor() as i32,
        (rect.right / t).ceil() as i32,
        (rect.top / t).floor() as i32,
        (rect.bottom / t).ceil() as i32,
    )
}

/// Hover lookup outcome. `Pending` means the owning tile exists but its
/// data has not arrived; `Unknown` covers absent tiles and out-of-range
/// sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    Classified(i32),
    Pending,
    Unknown,
}

struct ResolvedTile {
    classifications: Vec<i32>,
    /// Owned RGBA raster, TILE_RES × TILE_RES × 4.
    pixels: Vec<u8>,
    /// Offscreen surface built from `pixels` on first composite.
    surface: RefCell<Option<web_sys::HtmlCanvasElement>>,
}

enum TileState {
    Pending,
    Resolved(ResolvedTile),
}

struct CacheInner {
    tiles: HashMap<TileKey, TileState>,
    params: GenerationParams,
    /// Advanced on every `clear_for`; in-flight fetches from an older
    /// generation are discarded at resolve time.
    generation: u64,
}

/// Permission to run the one outstanding fetch for a key. Issued by
/// `begin_fetch`, consumed by `resolve`.
pub struct FetchTicket {
    pub key: TileKey,
    pub params: GenerationParams,
    generation: u64,
}

impl FetchTicket {
    /// World-block origin of the tile this ticket covers.
    pub fn origin(&self) -> (i32, i32) {
        (
            self.key.0 * TILE_SIZE_BLOCKS,
            self.key.1 * TILE_SIZE_BLOCKS,
        )
    }
}

/// Keyed store of classification tiles. Entries are pending from the
/// moment they are first requested and resolve atomically once their
/// data returns; resolved entries live for the lifetime of the cache
/// generation. At most one fetch is outstanding per key.
#[derive(Clone)]
pub struct TileCache {
    inner: Rc<RefCell<CacheInner>>,
}

impl TileCache {
    pub fn new(params: GenerationParams) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CacheInner {
                tiles: HashMap::new(),
                params,
                generation: 0,
            })),
        }
    }

    /// Drop every entry and start a new generation for `params`.
    /// Classification is a pure function of the parameter set, so any
    /// change invalidates the whole cache.
    pub fn clear_for(&self, params: GenerationParams) {
        let mut inner = self.inner.borrow_mut();
        inner.tiles.clear();
        inner.params = params;
        inner.generation += 1;
    }

    /// Number of entries (pending + resolved).
    pub fn len(&self) -> usize {
        self.inner.borrow().tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().tiles.is_empty()
    }

    /// Dedup gate: inserts a pending entry and returns a fetch ticket if
    /// the key was absent. Re-requesting a pending or resolved key is a
    /// no-op.
    pub fn begin_fetch(&self, tx: i32, tz: i32) -> Option<FetchTicket> {
        let mut inner = self.inner.borrow_mut();
        if inner.tiles.contains_key(&(tx, tz)) {
            return None;
        }
        inner.tiles.insert((tx, tz), TileState::Pending);
        Some(FetchTicket {
            key: (tx, tz),
            params: inner.params,
            generation: inner.generation,
        })
    }

    /// Flip a pending entry to resolved, decoding the classification array
    /// into the owned raster. Results from a superseded generation are
    /// discarded (the stale-write guard behind `clear_for`).
    pub fn resolve(&self, ticket: FetchTicket, classifications: Vec<i32>) {
        let expected = (TILE_RES * TILE_RES) as usize;
        if classifications.len() != expected {
            web_log_warn(&format!(
                "tile {:?}: expected {expected} samples, got {}; leaving pending",
                ticket.key,
                classifications.len()
            ));
            return;
        }
        let mut inner = self.inner.borrow_mut();
        if ticket.generation != inner.generation {
            return;
        }
        let pixels = decode_raster(&classifications);
        inner.tiles.insert(
            ticket.key,
            TileState::Resolved(ResolvedTile {
                classifications,
                pixels,
                surface: RefCell::new(None),
            }),
        );
    }

    /// Whether a tile is resolved and ready to composite.
    pub fn is_resolved(&self, tx: i32, tz: i32) -> bool {
        matches!(
            self.inner.borrow().tiles.get(&(tx, tz)),
            Some(TileState::Resolved(_))
        )
    }

    /// Classification at a world coordinate, if the owning tile is
    /// resolved and the local sample index is in bounds.
    pub fn sample_at(&self, wx: f64, wz: f64) -> Option<i32> {
        match self.status_at(wx, wz) {
            SampleStatus::Classified(code) => Some(code),
            _ => None,
        }
    }

    /// Tri-state hover lookup; see [`SampleStatus`].
    pub fn status_at(&self, wx: f64, wz: f64) -> SampleStatus {
        let key = tile_key(wx, wz);
        let inner = self.inner.borrow();
        match inner.tiles.get(&key) {
            None => SampleStatus::Unknown,
            Some(TileState::Pending) => SampleStatus::Pending,
            Some(TileState::Resolved(tile)) => {
                let origin_x = (key.0 * TILE_SIZE_BLOCKS) as f64;
                let origin_z = (key.1 * TILE_SIZE_BLOCKS) as f64;
                let lx = ((wx - origin_x) / FETCH_SCALE as f64).floor() as i64;
                let lz = ((wz - origin_z) / FETCH_SCALE as f64).floor() as i64;
                let res = TILE_RES as i64;
                if lx < 0 || lz < 0 || lx >= res || lz >= res {
                    return SampleStatus::Unknown;
                }
                let idx = (lz * res + lx) as usize;
                match tile.classifications.get(idx) {
                    Some(&code) => SampleStatus::Classified(code),
                    None => SampleStatus::Unknown,
                }
            }
        }
    }

    /// Raw raster access, mainly for tests and headless consumers.
    pub fn with_pixels<R>(&self, tx: i32, tz: i32, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        let inner = self.inner.borrow();
        match inner.tiles.get(&(tx, tz)) {
            Some(TileState::Resolved(tile)) => Some(f(&tile.pixels)),
            _ => None,
        }
    }
}

impl TileCache {
    /// Request a tile, fetching and decoding it in the background if this
    /// is the first request for its key. On failure the entry stays
    /// pending (a blank tile) and a console warning is the only signal.
    pub fn ensure(&self, tx: i32, tz: i32) {
        let Some(ticket) = self.begin_fetch(tx, tz) else {
            return;
        };
        let cache = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let (x0, z0) = ticket.origin();
            match crate::api::fetch_region_classification(
                &ticket.params,
                x0,
                z0,
                TILE_RES,
                TILE_RES,
                FETCH_SCALE,
            )
            .await
            {
                Ok(classifications) => cache.resolve(ticket, classifications),
                Err(e) => {
                    web_log_warn(&format!("tile {:?} fetch failed: {e}", ticket.key));
                }
            }
        });
    }

    /// Offscreen surface for compositing, built from the owned raster on
    /// first use. The cache owns the surface; callers only draw from it.
    pub fn composite_surface(&self, tx: i32, tz: i32) -> Option<web_sys::HtmlCanvasElement> {
        let inner = self.inner.borrow();
        let Some(TileState::Resolved(tile)) = inner.tiles.get(&(tx, tz)) else {
            return None;
        };
        let mut surface = tile.surface.borrow_mut();
        if surface.is_none() {
            *surface = build_surface(&tile.pixels);
        }
        surface.clone()
    }
}

/// Decode a classification array into RGBA pixels, one pixel per sample,
/// colors resolved through the classification registry.
fn decode_raster(classifications: &[i32]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(classifications.len() * 4);
    for &code in classifications {
        let (r, g, b) = classification_color(code);
        pixels.extend_from_slice(&[r, g, b, 255]);
    }
    pixels
}

fn build_surface(pixels: &[u8]) -> Option<web_sys::HtmlCanvasElement> {
    use wasm_bindgen::{Clamped, JsCast};

    let document = web_sys::window()?.document()?;
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(TILE_RES as u32);
    canvas.set_height(TILE_RES as u32);
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .ok()?;
    let image = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(pixels),
        TILE_RES as u32,
        TILE_RES as u32,
    )
    .ok()?;
    ctx.put_image_data(&image, 0.0, 0.0).ok()?;
    Some(canvas)
}

#[cfg(target_arch = "wasm32")]
fn web_log_warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn web_log_warn(_msg: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams::default()
    }

    fn full_tile(code: i32) -> Vec<i32> {
        vec![code; (TILE_RES * TILE_RES) as usize]
    }

    #[test]
    fn keys_floor_divide_world_coordinates() {
        assert_eq!(tile_key(0.0, 0.0), (0, 0));
        assert_eq!(tile_key(511.9, 511.9), (0, 0));
        assert_eq!(tile_key(512.0, -0.1), (1, -1));
        assert_eq!(tile_key(-1.0, -513.0), (-1, -2));
    }

    #[test]
    fn range_covers_quarter_zoom_hd_surface() {
        let rect = WorldRect {
            left: -1600.0,
            right: 1600.0,
            top: -900.0,
            bottom: 900.0,
        };
        assert_eq!(tile_range(&rect), (-4, 4, -2, 2));
    }

    #[test]
    fn second_begin_fetch_while_pending_is_deduplicated() {
        let cache = TileCache::new(params());
        assert!(cache.begin_fetch(3, -7).is_some());
        assert!(cache.begin_fetch(3, -7).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn begin_fetch_after_resolve_is_still_a_no_op() {
        let cache = TileCache::new(params());
        let ticket = cache.begin_fetch(0, 0).unwrap();
        cache.resolve(ticket, full_tile(1));
        assert!(cache.begin_fetch(0, 0).is_none());
    }

    #[test]
    fn stale_fetch_does_not_repopulate_cleared_cache() {
        let cache = TileCache::new(params());
        let ticket = cache.begin_fetch(0, 0).unwrap();

        // Seed change mid-flight.
        let mut new_params = params();
        new_params.seed = 999;
        cache.clear_for(new_params);

        cache.resolve(ticket, full_tile(1));
        assert!(cache.is_empty());
        assert_eq!(cache.status_at(10.0, 10.0), SampleStatus::Unknown);
    }

    #[test]
    fn resolve_after_clear_allows_fresh_fetch_for_same_key() {
        let cache = TileCache::new(params());
        let stale = cache.begin_fetch(0, 0).unwrap();
        cache.clear_for(params());
        let fresh = cache.begin_fetch(0, 0).unwrap();
        cache.resolve(stale, full_tile(1));
        assert!(!cache.is_resolved(0, 0));
        cache.resolve(fresh, full_tile(2));
        assert_eq!(cache.sample_at(0.0, 0.0), Some(2));
    }

    #[test]
    fn short_payload_leaves_tile_pending() {
        let cache = TileCache::new(params());
        let ticket = cache.begin_fetch(0, 0).unwrap();
        cache.resolve(ticket, vec![1, 2, 3]);
        assert_eq!(cache.status_at(0.0, 0.0), SampleStatus::Pending);
    }

    #[test]
    fn sample_statuses_track_tile_lifecycle() {
        let cache = TileCache::new(params());
        assert_eq!(cache.status_at(100.0, 100.0), SampleStatus::Unknown);

        let ticket = cache.begin_fetch(0, 0).unwrap();
        assert_eq!(cache.status_at(100.0, 100.0), SampleStatus::Pending);
        assert_eq!(cache.sample_at(100.0, 100.0), None);

        let mut data = full_tile(1);
        // Sample (25, 25) covers world (100, 100) at 1:4 scale.
        data[25 * TILE_RES as usize + 25] = 7;
        cache.resolve(ticket, data);
        assert_eq!(cache.sample_at(100.0, 100.0), Some(7));
        assert_eq!(cache.status_at(101.5, 103.9), SampleStatus::Classified(7));
        assert_eq!(cache.status_at(104.0, 100.0), SampleStatus::Classified(1));
    }

    #[test]
    fn negative_tile_sampling_uses_local_indices() {
        let cache = TileCache::new(params());
        let ticket = cache.begin_fetch(-1, -1).unwrap();
        let mut data = full_tile(4);
        // World (-512, -512) is local sample (0, 0) of tile (-1, -1).
        data[0] = 21;
        cache.resolve(ticket, data);
        assert_eq!(cache.sample_at(-512.0, -512.0), Some(21));
        assert_eq!(cache.sample_at(-1.0, -1.0), Some(4));
    }

    #[test]
    fn raster_decodes_one_pixel_per_sample() {
        let cache = TileCache::new(params());
        let ticket = cache.begin_fetch(0, 0).unwrap();
        cache.resolve(ticket, full_tile(7));
        let (r, g, b) = classification_color(7);
        cache
            .with_pixels(0, 0, |pixels| {
                assert_eq!(pixels.len(), (TILE_RES * TILE_RES * 4) as usize);
                assert_eq!(&pixels[0..4], &[r, g, b, 255]);
                let last = pixels.len() - 4;
                assert_eq!(&pixels[last..], &[r, g, b, 255]);
            })
            .unwrap();
    }
}
