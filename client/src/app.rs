use std::cell::RefCell;
use std::collections::HashMap;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use gloo_storage::Storage;

use loam_shared::{Dimension, Feature, GameVersion, GenerationParams, feature_kinds, parse_seed};

use crate::api;
use crate::canvas::MapCanvas;
use crate::tiles::TileCache;
use crate::viewport::Viewport;

/// Features are fetched once per parameter change over a wide fixed
/// square around the origin, not per-tile.
const FEATURE_FETCH_ORIGIN: i32 = -10_000;
const FEATURE_FETCH_SPAN: i32 = 20_000;

/// Screen-pixel pan distance for arrow-key navigation.
const KEY_PAN_STEP: f64 = 50.0;

/// Hover readout reported on every pointer move over the map.
#[derive(Clone, PartialEq)]
pub(crate) struct HoverInfo {
    pub world_x: i32,
    pub world_z: i32,
    pub label: String,
}

/// Newtype wrappers so same-shaped signals stay distinct in Leptos context.
#[derive(Clone, Copy)]
pub(crate) struct HoverReadout(pub RwSignal<Option<HoverInfo>>);
#[derive(Clone, Copy)]
pub(crate) struct VisibilityFilter(pub RwSignal<HashMap<String, bool>>);

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

fn default_visibility() -> HashMap<String, bool> {
    feature_kinds()
        .iter()
        .map(|info| (info.kind.to_string(), info.default_visible))
        .collect()
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    seed: i64,
    version: GameVersion,
    dimension: Dimension,
    visibility: HashMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            seed: params.seed,
            version: params.version,
            dimension: params.dimension,
            visibility: default_visibility(),
        }
    }
}

/// One wide feature query per parameter set. A late response for a
/// superseded parameter set is dropped rather than applied.
fn fetch_features(
    params_signal: RwSignal<GenerationParams>,
    requested: GenerationParams,
    features: RwSignal<Vec<Feature>>,
) {
    spawn_local(async move {
        match api::fetch_region_features(
            &requested,
            FEATURE_FETCH_ORIGIN,
            FEATURE_FETCH_ORIGIN,
            FEATURE_FETCH_SPAN,
            FEATURE_FETCH_SPAN,
        )
        .await
        {
            Ok(list) => {
                if params_signal.get_untracked() == requested {
                    features.set(list);
                }
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("feature fetch failed: {e}").into());
            }
        }
    });
}

/// Root application component. Owns the viewport, the tile cache, and the
/// feature list; everything below receives them through context.
#[component]
pub fn App() -> impl IntoView {
    let saved: Settings = gloo_storage::LocalStorage::get("loam_settings").unwrap_or_default();

    let params: RwSignal<GenerationParams> = RwSignal::new(GenerationParams {
        seed: saved.seed,
        version: saved.version,
        dimension: saved.dimension,
    });
    let seed_input: RwSignal<String> = RwSignal::new(saved.seed.to_string());
    let seed_invalid: RwSignal<bool> = RwSignal::new(false);
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let features: RwSignal<Vec<Feature>> = RwSignal::new(Vec::new());
    let readout: RwSignal<Option<HoverInfo>> = RwSignal::new(None);
    let visibility: RwSignal<HashMap<String, bool>> = RwSignal::new({
        let mut merged = default_visibility();
        merged.extend(saved.visibility);
        merged
    });

    let cache = TileCache::new(params.get_untracked());

    provide_context(params);
    provide_context(viewport);
    provide_context(features);
    provide_context(HoverReadout(readout));
    provide_context(VisibilityFilter(visibility));
    provide_context(cache.clone());

    // Persist selector state and toggles on any change.
    Effect::new(move || {
        let p = params.get();
        let settings = Settings {
            seed: p.seed,
            version: p.version,
            dimension: p.dimension,
            visibility: visibility.get(),
        };
        let _ = gloo_storage::LocalStorage::set("loam_settings", &settings);
    });

    // The world is a pure function of the parameter set: any change
    // invalidates every tile and the feature list. Runs on mount too,
    // which issues the initial feature fetch.
    Effect::new({
        let cache = cache.clone();
        move || {
            let p = params.get();
            cache.clear_for(p);
            features.set(Vec::new());
            fetch_features(params, p, features);
        }
    });

    // Global keyboard shortcuts.
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler = wasm_bindgen::closure::Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(
            move |e: web_sys::KeyboardEvent| {
                let target_tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();
                if target_tag == "INPUT" || target_tag == "TEXTAREA" {
                    return;
                }

                match e.key().as_str() {
                    "+" | "=" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.zoom_in());
                    }
                    "-" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.zoom_out());
                    }
                    "0" | "r" => {
                        viewport.update(|vp| vp.reset());
                    }
                    "ArrowLeft" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan_screen(KEY_PAN_STEP, 0.0));
                    }
                    "ArrowRight" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan_screen(-KEY_PAN_STEP, 0.0));
                    }
                    "ArrowUp" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan_screen(0.0, KEY_PAN_STEP));
                    }
                    "ArrowDown" => {
                        e.prevent_default();
                        viewport.update(|vp| vp.pan_screen(0.0, -KEY_PAN_STEP));
                    }
                    _ => {}
                }
            },
        );

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    let apply_seed = move || {
        let Some(seed) = parse_seed(&seed_input.get_untracked()) else {
            seed_invalid.set(true);
            return;
        };
        seed_invalid.set(false);
        params.update(|p| p.seed = seed);
    };

    let randomize_seed = move |_| {
        // Uniform over the float-safe integer range, like rolling a fresh
        // world in-game.
        let seed = (js_sys::Math::random() * 9_007_199_254_740_991.0).floor() as i64;
        seed_input.set(seed.to_string());
        seed_invalid.set(false);
        params.update(|p| p.seed = seed);
    };

    let on_seed_input = move |e: leptos::ev::Event| {
        let Some(target) = e.target() else {
            return;
        };
        let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>() else {
            return;
        };
        seed_invalid.set(false);
        seed_input.set(input.value());
    };

    view! {
        <div style="width: 100%; height: 100%; display: flex; flex-direction: column; background: #0c0e17; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif;">
            <header style="display: flex; align-items: center; justify-content: space-between; gap: 12px; padding: 10px 16px; background: #13161f; border-bottom: 1px solid #282c3e; flex-wrap: wrap;">
                <div style="display: flex; align-items: baseline; gap: 8px;">
                    <span style="font-size: 1.05rem; font-weight: 700; letter-spacing: 0.08em; text-transform: uppercase;">"Loam"</span>
                    <span style="font-size: 0.68rem; color: #5a5860; letter-spacing: 0.12em; text-transform: uppercase;">"seed map explorer"</span>
                </div>
                <div style="display: flex; align-items: center; gap: 10px; flex-wrap: wrap;">
                    <div style="display: flex; align-items: center; gap: 6px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 6px; padding: 4px 8px;">
                        <span style="font-size: 0.62rem; color: #5a5860; text-transform: uppercase; letter-spacing: 0.1em;">"Seed"</span>
                        <input
                            type="text"
                            style="width: 150px; background: transparent; border: none; outline: none; font-family: 'JetBrains Mono', monospace; font-size: 0.82rem;"
                            style:color=move || if seed_invalid.get() { "#e06c5a" } else { "#e2e0d8" }
                            prop:value=move || seed_input.get()
                            on:input=on_seed_input
                            on:keydown=move |e: web_sys::KeyboardEvent| {
                                if e.key() == "Enter" {
                                    apply_seed();
                                }
                            }
                        />
                        <button
                            style="background: #f5c542; color: #13161f; border: none; border-radius: 4px; padding: 3px 10px; font-size: 0.7rem; font-weight: 700; cursor: pointer;"
                            on:click=move |_| apply_seed()
                        >
                            "Generate"
                        </button>
                        <button
                            title="Randomize seed"
                            style="background: #282c3e; color: #e2e0d8; border: none; border-radius: 4px; padding: 3px 8px; font-size: 0.7rem; cursor: pointer;"
                            on:click=randomize_seed
                        >
                            "\u{1F3B2}"
                        </button>
                    </div>
                    <SelectorChips />
                </div>
            </header>
            <FeaturePanel />
            <div style="flex: 1; position: relative; overflow: hidden;">
                <MapCanvas />
                <HoverPanel />
                <ZoomControls />
            </div>
        </div>
    }
}

/// Version and dimension selector chips.
#[component]
fn SelectorChips() -> impl IntoView {
    let params: RwSignal<GenerationParams> = expect_context();

    let chip_style = |active: bool| {
        if active {
            "background: rgba(245,197,66,0.16); border: 1px solid rgba(245,197,66,0.5); color: #f5c542; border-radius: 4px; padding: 3px 10px; font-size: 0.7rem; font-weight: 700; cursor: pointer;"
        } else {
            "background: #1a1d2a; border: 1px solid #282c3e; color: #9a9590; border-radius: 4px; padding: 3px 10px; font-size: 0.7rem; cursor: pointer;"
        }
    };

    view! {
        <div style="display: flex; align-items: center; gap: 4px;">
            {GameVersion::ALL
                .into_iter()
                .map(|version| {
                    view! {
                        <button
                            style=move || chip_style(params.get().version == version)
                            on:click=move |_| params.update(|p| p.version = version)
                        >
                            {version.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
        <div style="display: flex; align-items: center; gap: 4px;">
            {Dimension::ALL
                .into_iter()
                .map(|dimension| {
                    view! {
                        <button
                            style=move || chip_style(params.get().dimension == dimension)
                            on:click=move |_| params.update(|p| p.dimension = dimension)
                        >
                            {dimension.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Toggle grid for feature markers, filtered to kinds that occur in the
/// current dimension.
#[component]
fn FeaturePanel() -> impl IntoView {
    let params: RwSignal<GenerationParams> = expect_context();
    let VisibilityFilter(visibility) = expect_context();

    let set_all = move |value: bool| {
        let dimension = params.get_untracked().dimension;
        visibility.update(|map| {
            for info in feature_kinds() {
                if info.occurs_in(dimension) {
                    map.insert(info.kind.to_string(), value);
                }
            }
        });
    };

    view! {
        <div style="display: flex; align-items: center; gap: 6px; padding: 8px 16px; background: #101320; border-bottom: 1px solid #282c3e; flex-wrap: wrap;">
            <span style="font-size: 0.62rem; color: #5a5860; text-transform: uppercase; letter-spacing: 0.1em;">"Features"</span>
            {move || {
                let dimension = params.get().dimension;
                feature_kinds()
                    .iter()
                    .filter(|info| info.occurs_in(dimension))
                    .map(|info| {
                        let kind = info.kind;
                        let active = move || {
                            visibility.with(|map| map.get(kind).copied().unwrap_or(false))
                        };
                        view! {
                            <button
                                title=info.name
                                style=move || {
                                    if active() {
                                        "display: inline-flex; align-items: center; gap: 5px; background: rgba(245,197,66,0.12); border: 1px solid rgba(245,197,66,0.4); color: #e2e0d8; border-radius: 4px; padding: 3px 8px; font-size: 0.68rem; cursor: pointer;"
                                    } else {
                                        "display: inline-flex; align-items: center; gap: 5px; background: #1a1d2a; border: 1px solid #282c3e; color: #5a5860; border-radius: 4px; padding: 3px 8px; font-size: 0.68rem; cursor: pointer;"
                                    }
                                }
                                on:click=move |_| {
                                    visibility
                                        .update(|map| {
                                            let entry = map.entry(kind.to_string()).or_insert(false);
                                            *entry = !*entry;
                                        })
                                }
                            >
                                <span>{info.glyph}</span>
                                <span>{info.name}</span>
                            </button>
                        }
                    })
                    .collect_view()
            }}
            <span style="flex: 1;" />
            <button
                style="background: transparent; border: none; color: #9a9590; font-size: 0.65rem; cursor: pointer; text-decoration: underline;"
                on:click=move |_| set_all(true)
            >
                "All"
            </button>
            <button
                style="background: transparent; border: none; color: #9a9590; font-size: 0.65rem; cursor: pointer; text-decoration: underline;"
                on:click=move |_| set_all(false)
            >
                "None"
            </button>
        </div>
    }
}

/// Coordinate + classification readout, bottom-left of the map.
#[component]
fn HoverPanel() -> impl IntoView {
    let params: RwSignal<GenerationParams> = expect_context();
    let HoverReadout(readout) = expect_context();

    view! {
        <div
            style="position: absolute; bottom: 14px; left: 14px; padding: 8px 12px; background: rgba(19,22,31,0.92); border: 1px solid #282c3e; border-radius: 6px; font-family: 'JetBrains Mono', monospace; font-size: 0.72rem; pointer-events: none; transition: opacity 0.15s;"
            style:opacity=move || if readout.get().is_some() { "1" } else { "0" }
        >
            {move || {
                let info = readout.get();
                let (x, z, label) = match &info {
                    Some(info) => (info.world_x, info.world_z, info.label.clone()),
                    None => (0, 0, String::new()),
                };
                view! {
                    <div style="display: flex; gap: 10px;">
                        <span><span style="color: #5a5860;">"X "</span>{x}</span>
                        <span><span style="color: #5a5860;">"Z "</span>{z}</span>
                    </div>
                    <div style="margin-top: 3px;">
                        <span style="color: #5a5860;">"Region "</span>
                        <span style="color: #f5c542;">{label}</span>
                    </div>
                    <div style="margin-top: 3px; color: #9a9590;">
                        {params.get().dimension.label()}
                    </div>
                }
            }}
        </div>
    }
}

/// Imperative zoom-in / reset / zoom-out controls, bottom-center.
#[component]
fn ZoomControls() -> impl IntoView {
    let viewport: RwSignal<Viewport> = expect_context();

    let button_style = "width: 34px; height: 34px; display: flex; align-items: center; justify-content: center; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; color: #e2e0d8; font-size: 1rem; cursor: pointer;";

    view! {
        <div style="position: absolute; bottom: 14px; left: 50%; transform: translateX(-50%); display: flex; align-items: center; gap: 6px; padding: 6px; background: rgba(19,22,31,0.92); border: 1px solid #282c3e; border-radius: 8px;">
            <button style=button_style on:click=move |_| viewport.update(|vp| vp.zoom_in())>
                "+"
            </button>
            <button
                style="padding: 0 12px; height: 34px; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; color: #9a9590; font-size: 0.65rem; text-transform: uppercase; letter-spacing: 0.1em; cursor: pointer;"
                on:click=move |_| viewport.update(|vp| vp.reset())
            >
                "Reset view"
            </button>
            <button style=button_style on:click=move |_| viewport.update(|vp| vp.zoom_out())>
                "\u{2212}"
            </button>
        </div>
    }
}
