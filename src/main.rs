//! Pixel Greeter entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pixel_greeter::Settings;
    use pixel_greeter::audio::AudioManager;
    use pixel_greeter::platform::assets::fetch_frames;
    use pixel_greeter::platform::input::{HeldKeys, key_events};
    use pixel_greeter::platform::overlay::TextOverlay;
    use pixel_greeter::renderer::{RenderSink, RenderState, SpriteId, WebRenderer, build_draw_list};
    use pixel_greeter::sim::{InputEvent, SceneEvent, SceneState, handle_event, tick};

    /// Game instance holding all state
    struct Game {
        state: SceneState,
        settings: Settings,
        renderer: Option<WebRenderer>,
        audio: AudioManager,
        held: HeldKeys,
    }

    impl Game {
        /// Apply one discrete input and react to what it caused.
        ///
        /// Runs inside the DOM handler so audio starts within the gesture.
        fn apply(&mut self, event: InputEvent) {
            handle_event(&mut self.state, event);
            self.dispatch_events();
        }

        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    SceneEvent::AudioUnlocked => self.audio.play(),
                    SceneEvent::NameSubmitted(name) => log::info!("Name submitted: {:?}", name),
                    other => log::debug!("Scene event: {:?}", other),
                }
            }
        }

        /// Run one display frame
        fn frame(&mut self, time: f64) {
            let input = self.held.to_tick_input(time);
            tick(&mut self.state, &input);
            self.dispatch_events();

            let list = build_draw_list(&self.state, &self.settings);
            if let Some(renderer) = self.renderer.as_mut() {
                match renderer.submit(&list) {
                    Ok(()) => {}
                    Err(pixel_greeter::renderer::RenderError::Surface(
                        wgpu::SurfaceError::OutOfMemory,
                    )) => log::error!("Out of memory!"),
                    Err(e) => log::warn!("Render error: {}", e),
                }
            }
        }

        fn resize(&mut self, css_w: f32, css_h: f32, width: u32, height: u32) {
            self.state.resize(css_w, css_h);
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.gpu.resize(width, height);
            }
        }
    }

    /// Canvas size in CSS pixels and physical pixels
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (client_w as f32, client_h as f32, width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Greeter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (css_w, css_h, width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::default();

        let primary = fetch_frames(&settings.primary_sprite).await;
        let secondary = fetch_frames(&settings.secondary_sprite).await;
        if primary.is_empty() {
            log::warn!("No primary frames loaded; showing placeholder");
        }

        let mut state = SceneState::new(css_w, css_h, primary.info(), secondary.info(), &settings);
        let audio = AudioManager::new(&settings);
        state.audio.available = audio.available();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = match RenderState::new(surface, &adapter, width, height).await {
            Ok(mut gpu) => {
                gpu.upload_sprite(SpriteId::Primary, &primary.frames);
                gpu.upload_sprite(SpriteId::Secondary, &secondary.frames);
                match TextOverlay::new(&document) {
                    Ok(overlay) => Some(WebRenderer::new(gpu, overlay)),
                    Err(e) => {
                        log::error!("Text overlay unavailable: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                log::error!("Renderer unavailable: {}", e);
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            state,
            settings,
            renderer,
            audio,
            held: HeldKeys::default(),
        }));

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas, game.clone());

        // Start frame loop
        request_animation_frame(game);

        log::info!("Pixel Greeter running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down: held movement keys plus discrete events
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                // Keep the page from scrolling or navigating back
                if matches!(
                    key.as_str(),
                    " " | "Backspace" | "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown"
                ) {
                    event.prevent_default();
                }
                // Shortcut chords (Ctrl+R, Cmd+V) are not typing
                let typed = !(event.ctrl_key() || event.meta_key());
                let mut g = game.borrow_mut();
                g.held.set(&key, true);
                for input in key_events(&key, typed) {
                    g.apply(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().held.set(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events are lost, release everything
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().held.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().apply(InputEvent::PointerPressed);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().apply(InputEvent::PointerPressed);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let Some(window) = web_sys::window() else { return };
            let (css_w, css_h, width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(css_w, css_h, width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod harness {
    use std::path::Path;

    use pixel_greeter::Settings;
    use pixel_greeter::platform::assets::load_frames;
    use pixel_greeter::renderer::{RecordingSink, RenderSink, build_draw_list};
    use pixel_greeter::sim::{
        DialogPhase, InputEvent, Key, SceneEvent, SceneState, TickInput, handle_event, tick,
    };

    /// Simulated display frame
    const FRAME_MS: f64 = 16.0;
    /// Give up walking toward the primary after this many frames
    const MAX_APPROACH_FRAMES: u32 = 1000;

    /// Load settings from an optional JSON file, falling back to defaults
    pub fn load_settings(path: Option<&str>) -> Settings {
        let Some(path) = path else {
            return Settings::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings file {}: {}; using defaults", path, e);
                    Settings::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}; using defaults", path, e);
                Settings::default()
            }
        }
    }

    struct Harness {
        state: SceneState,
        settings: Settings,
        sink: RecordingSink,
        now_ms: f64,
    }

    impl Harness {
        fn frame(&mut self, input: TickInput) {
            self.now_ms += FRAME_MS;
            tick(&mut self.state, &TickInput { now_ms: self.now_ms, ..input });
            self.log_events();
            let list = build_draw_list(&self.state, &self.settings);
            if let Err(e) = self.sink.submit(&list) {
                log::warn!("Render error: {}", e);
            }
        }

        fn press(&mut self, event: InputEvent) {
            handle_event(&mut self.state, event);
            self.log_events();
        }

        fn log_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    SceneEvent::AudioUnlocked => log::info!("Audio unlocked (no playback on native)"),
                    other => log::info!("Scene event: {:?}", other),
                }
            }
        }
    }

    /// Walk the secondary character over, answer the prompt, jump once
    pub fn run(asset_dir: &Path, settings: Settings) {
        let primary = load_frames(asset_dir, &settings.primary_sprite);
        let secondary = load_frames(asset_dir, &settings.secondary_sprite);
        let state = SceneState::new(1280.0, 720.0, primary.info(), secondary.info(), &settings);

        let mut h = Harness {
            state,
            settings,
            sink: RecordingSink::default(),
            now_ms: 0.0,
        };

        h.press(InputEvent::PointerPressed);
        h.frame(TickInput::default());

        if h.state.assets_missing() {
            log::warn!("No primary frames under {}", asset_dir.display());
            for text in h.sink.last.texts() {
                log::info!("Placeholder: {}", text);
            }
            return;
        }

        let walk = TickInput {
            secondary_right: true,
            ..TickInput::default()
        };
        let mut frames = 0;
        while h.state.dialog.phase() != DialogPhase::AwaitingInput && frames < MAX_APPROACH_FRAMES {
            h.frame(walk.clone());
            frames += 1;
        }
        log::info!("Prompt after {} frames: {:?}", frames, h.state.dialog.dialog_text);

        for c in "Ferris".chars() {
            h.press(InputEvent::CharTyped(c));
        }
        h.press(InputEvent::KeyPressed(Key::Confirm));
        h.press(InputEvent::KeyPressed(Key::Jump));
        for _ in 0..60 {
            h.frame(TickInput::default());
        }

        log::info!(
            "Rendered {} frames; dialog reads {:?}; primary at {:?}",
            h.sink.frames,
            h.state.dialog.dialog_text,
            h.state.primary.pos
        );
        match serde_json::to_string(&h.state) {
            Ok(json) => log::debug!("Final scene: {}", json),
            Err(e) => log::warn!("Cannot snapshot scene: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pixel Greeter (native) starting...");
    log::info!("Native mode is a headless run - use `trunk serve` for the web version");

    // pixel-greeter [ASSET_DIR] [SETTINGS_JSON]
    let mut args = std::env::args().skip(1);
    let asset_dir = args.next().unwrap_or_else(|| ".".to_string());
    let settings_path = args.next();

    let settings = harness::load_settings(settings_path.as_deref());
    harness::run(std::path::Path::new(&asset_dir), settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
