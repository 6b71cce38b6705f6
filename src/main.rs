mod core;
mod input;
mod playback;
mod settings;
mod ui;

use crate::core::SampleBuffer;
use crate::input::load_trajectory;
use crate::playback::TimelineEngine;
use crate::settings::AppSettings;
use crate::ui::{apply_action, AppCommand, ControlAction, ControlPanel, DisplayElement, DisplayFlags, FieldView, FileDialogs, ShortcutManager};

use anyhow::{Context as _, Result};
use clap::Parser;
use imgui::{Context, FontConfig, FontSource};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::ModifiersState;
use winit::window::WindowBuilder;

use glutin::prelude::*;
use glutin::display::GetGlDisplay;
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use glow::HasContext;

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trajectory file picked up from the working directory when none is given
const DEFAULT_TRAJECTORY: &str = "test.csv";

const SETTINGS_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Replay recorded robot trajectories
#[derive(Parser, Debug)]
#[command(name = "fwview", version, about)]
struct Args {
    /// Trajectory CSV to open (defaults to the last opened file, then ./test.csv)
    path: Option<PathBuf>,

    /// Pace playback by the recorded timestamps
    #[arg(long)]
    real_speed: bool,

    /// Start paused
    #[arg(long)]
    paused: bool,
}

/// Messages from the background loader
enum LoadingUpdate {
    Complete(PathBuf, SampleBuffer),
    Error(PathBuf, String),
}

struct AppState {
    engine: TimelineEngine,
    display: DisplayFlags,
    field_view: FieldView,
    control_panel: ControlPanel,
    shortcut_manager: ShortcutManager,
    current_file: Option<PathBuf>,
    status_message: Option<String>,
    show_controls: bool,
    show_shortcuts: bool,
    show_file_open_pending: bool,
    loading_receiver: Option<Receiver<LoadingUpdate>>,
}

impl AppState {
    fn new(args: &Args, settings: AppSettings) -> Self {
        let mut engine = TimelineEngine::empty(Instant::now());
        engine.set_real_speed(args.real_speed);
        if !args.paused {
            engine.play();
        }

        Self {
            engine,
            display: settings.display,
            field_view: FieldView::new(),
            control_panel: ControlPanel::new(),
            shortcut_manager: ShortcutManager::new(),
            current_file: None,
            status_message: None,
            show_controls: settings.show_controls,
            show_shortcuts: settings.show_shortcuts,
            show_file_open_pending: false,
            loading_receiver: None,
        }
    }

    fn save_settings(&self) {
        let settings = AppSettings {
            display: self.display,
            last_file: self.current_file.clone(),
            show_controls: self.show_controls,
            show_shortcuts: self.show_shortcuts,
        };
        settings.save();
    }

    /// Start loading a trajectory on a background thread
    fn load_file(&mut self, path: PathBuf) {
        self.status_message = Some(format!("Loading {}...", path.display()));

        let (tx, rx) = channel();
        self.loading_receiver = Some(rx);

        std::thread::spawn(move || {
            let update = match load_trajectory(&path) {
                Ok(samples) => LoadingUpdate::Complete(path, samples),
                Err(e) => LoadingUpdate::Error(path, e.to_string()),
            };
            let _ = tx.send(update);
        });
    }

    /// Pick up a finished load, if any
    fn process_loading(&mut self) {
        let Some(receiver) = self.loading_receiver.as_ref() else {
            return;
        };

        let update = match receiver.try_recv() {
            Ok(update) => update,
            Err(std::sync::mpsc::TryRecvError::Empty) => return,
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.loading_receiver = None;
                return;
            }
        };
        self.loading_receiver = None;

        match update {
            LoadingUpdate::Complete(path, samples) => self.finish_loading(path, samples),
            LoadingUpdate::Error(path, e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.status_message = Some(format!("Failed to load {}: {}", path.display(), e));
                self.replace_engine(SampleBuffer::new());
                self.current_file = None;
            }
        }
    }

    fn finish_loading(&mut self, path: PathBuf, samples: SampleBuffer) {
        let frames = samples.len();
        if frames == 0 {
            warn!("{} has no SIM rows", path.display());
            self.status_message = Some(format!("No SIM samples in {}", path.display()));
        } else {
            self.status_message = Some(format!("Loaded {} frames from {}", frames, path.display()));
        }
        info!("Loaded {} frames from {}", frames, path.display());

        self.replace_engine(samples);
        self.current_file = Some(path);
    }

    /// Swap in a new trajectory, keeping the play and speed toggles
    fn replace_engine(&mut self, samples: SampleBuffer) {
        let mut engine = TimelineEngine::new(Arc::new(samples), Instant::now());
        engine.set_real_speed(self.engine.is_real_speed());
        if self.engine.is_playing() {
            engine.play();
        }
        self.engine = engine;
    }

    fn process_file_dialogs(&mut self) {
        if self.show_file_open_pending {
            if let Some(path) = FileDialogs::open_trajectory_file() {
                self.load_file(path);
            }
            self.show_file_open_pending = false;
        }
    }

    /// Apply a control action; returns true when the app should quit
    fn handle_action(&mut self, action: ControlAction, now: Instant) -> bool {
        match apply_action(action, &mut self.engine, &mut self.display, now) {
            AppCommand::None => false,
            AppCommand::OpenFile => {
                self.show_file_open_pending = true;
                false
            }
            AppCommand::Quit => true,
        }
    }
}

/// File to open at startup, if any
fn resolve_initial_file(arg: Option<PathBuf>, last_file: Option<PathBuf>) -> Option<PathBuf> {
    if arg.is_some() {
        return arg;
    }
    last_file
        .filter(|p| p.exists())
        .or_else(|| Some(PathBuf::from(DEFAULT_TRAJECTORY)).filter(|p| p.exists()))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fwview=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let settings = AppSettings::load();
    let initial_file = resolve_initial_file(args.path.clone(), settings.last_file.clone());
    let mut state = AppState::new(&args, settings);

    match initial_file {
        Some(path) => state.load_file(path),
        None => {
            info!("No {} found, starting without data", DEFAULT_TRAJECTORY);
            state.status_message = Some(format!("No {} found", DEFAULT_TRAJECTORY));
        }
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;

    // Build the window and GL display using glutin-winit
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(
            WindowBuilder::new()
                .with_title("fwview - Trajectory Playback")
                .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0)),
        ))
        .build(&event_loop, glutin::config::ConfigTemplateBuilder::new(), |mut configs| {
            configs.next().expect("glutin yields at least one config")
        })
        .map_err(|e| anyhow::anyhow!("failed to create window and display: {e}"))?;

    let window = window.context("no window was created")?;
    let gl_display = gl_config.display();

    let context = unsafe {
        gl_display.create_context(
            &gl_config,
            &glutin::context::ContextAttributesBuilder::new().build(Some(window.raw_window_handle())),
        )
    }
    .context("failed to create GL context")?;

    let attrs = window.build_surface_attributes(
        glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new(),
    );
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
        .context("failed to create window surface")?;
    let context = context
        .make_current(&surface)
        .context("failed to make GL context current")?;

    let gl = load_gl(&gl_display);
    let gl_clear = load_gl(&gl_display);

    // Set up imgui, keeping the window layout next to the settings file
    let mut imgui = Context::create();
    imgui.set_log_filename(None::<PathBuf>);
    let layout_path = AppSettings::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("layout.ini");
    if let Some(parent) = layout_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    imgui.set_ini_filename(Some(layout_path));
    imgui.io_mut().config_flags |= imgui::ConfigFlags::DOCKING_ENABLE;

    let hidpi_factor = window.scale_factor();
    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: (14.0 * hidpi_factor) as f32,
            ..FontConfig::default()
        }),
    }]);
    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

    let mut renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .map_err(|e| anyhow::anyhow!("failed to initialize renderer: {e}"))?;

    let mut last_frame_time = Instant::now();
    let mut last_settings_save = Instant::now();
    let mut modifiers = ModifiersState::empty();

    event_loop
        .run(move |event, window_target| {
            match &event {
                Event::NewEvents(_) => {
                    let now = Instant::now();
                    imgui.io_mut().update_delta_time(now - last_frame_time);
                    last_frame_time = now;
                }
                Event::AboutToWait => {
                    state.process_file_dialogs();
                    state.process_loading();

                    if last_settings_save.elapsed() >= SETTINGS_SAVE_INTERVAL {
                        state.save_settings();
                        last_settings_save = Instant::now();
                    }

                    if let Err(e) = platform.prepare_frame(imgui.io_mut(), &window) {
                        error!("Failed to prepare frame: {}", e);
                    }
                    window.request_redraw();
                }
                Event::WindowEvent { event: WindowEvent::RedrawRequested, .. } => {
                    let now = Instant::now();
                    state.engine.tick(now, true);

                    let ui = imgui.new_frame();
                    let mut actions = render_menu_bar(ui, &mut state);

                    state.field_view.render(ui, &state.engine, &state.display);

                    if state.show_controls {
                        actions.extend(state.control_panel.render(
                            ui,
                            &mut state.show_controls,
                            &state.engine,
                            &state.display,
                        ));
                    }

                    if state.show_shortcuts {
                        state.shortcut_manager.render_help(ui, &mut state.show_shortcuts);
                    }

                    for action in actions {
                        if state.handle_action(action, now) {
                            state.save_settings();
                            window_target.exit();
                        }
                    }

                    platform.prepare_render(ui, &window);
                    let draw_data = imgui.render();

                    unsafe {
                        gl_clear.clear_color(0.1, 0.1, 0.1, 1.0);
                        gl_clear.clear(glow::COLOR_BUFFER_BIT);
                    }

                    if let Err(e) = renderer.render(draw_data) {
                        error!("Rendering failed: {}", e);
                        window_target.exit();
                    }
                    if let Err(e) = surface.swap_buffers(&context) {
                        error!("Failed to swap buffers: {}", e);
                        window_target.exit();
                    }
                }
                Event::WindowEvent { event: WindowEvent::Resized(size), .. } => {
                    if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                        surface.resize(&context, w, h);
                    }
                }
                Event::WindowEvent { event: WindowEvent::ModifiersChanged(new_modifiers), .. } => {
                    modifiers = new_modifiers.state();
                }
                Event::WindowEvent { event: WindowEvent::KeyboardInput { event: key_event, .. }, .. } => {
                    if !imgui.io().want_text_input {
                        if let Some(action) = state.shortcut_manager.process_event(key_event, modifiers) {
                            if state.handle_action(action, Instant::now()) {
                                state.save_settings();
                                window_target.exit();
                            }
                        }
                    }
                }
                Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                    state.save_settings();
                    window_target.exit();
                }
                _ => {}
            }

            platform.handle_event(imgui.io_mut(), &window, &event);
        })
        .context("event loop error")?;

    Ok(())
}

fn load_gl(gl_display: &glutin::display::Display) -> glow::Context {
    unsafe {
        glow::Context::from_loader_function(|name| {
            std::ffi::CString::new(name)
                .map(|name| gl_display.get_proc_address(&name) as *const _)
                .unwrap_or(std::ptr::null())
        })
    }
}

/// Main menu bar; returns the actions picked this frame
fn render_menu_bar(ui: &imgui::Ui, state: &mut AppState) -> Vec<ControlAction> {
    let mut actions = Vec::new();

    ui.main_menu_bar(|| {
        ui.menu("File", || {
            if ui.menu_item_config("Open Trajectory...").shortcut("Ctrl+O").build() {
                actions.push(ControlAction::OpenFile);
            }
            if let Some(path) = state.current_file.clone() {
                if ui.menu_item("Reload") {
                    state.load_file(path);
                }
            }
            ui.separator();
            if ui.menu_item_config("Exit").shortcut("Ctrl+Q").build() {
                actions.push(ControlAction::Quit);
            }
        });

        ui.menu("Playback", || {
            if ui.menu_item("Play") {
                actions.push(ControlAction::Play);
            }
            if ui.menu_item("Pause") {
                actions.push(ControlAction::Pause);
            }
            if ui.menu_item_config("Step Backward").shortcut("Left").build() {
                actions.push(ControlAction::StepBackward);
            }
            if ui.menu_item_config("Step Forward").shortcut("Right").build() {
                actions.push(ControlAction::StepForward);
            }
            if ui.menu_item_config("Reset").shortcut("R").build() {
                actions.push(ControlAction::Reset);
            }
            ui.separator();
            if ui
                .menu_item_config("Real Speed")
                .shortcut("S")
                .selected(state.engine.is_real_speed())
                .build()
            {
                actions.push(ControlAction::ToggleRealSpeed);
            }
        });

        ui.menu("View", || {
            for &element in DisplayElement::all() {
                if ui
                    .menu_item_config(element.label())
                    .selected(state.display.is_enabled(element))
                    .build()
                {
                    actions.push(ControlAction::ToggleDisplay(element));
                }
            }
            ui.separator();
            ui.menu_item_config("Controls").build_with_ref(&mut state.show_controls);
            ui.menu_item_config("Keyboard Shortcuts").build_with_ref(&mut state.show_shortcuts);
            if ui.menu_item("Reset View") {
                state.field_view.reset_view();
            }
        });

        if let Some(status) = &state.status_message {
            ui.separator();
            ui.text_disabled(status);
        }
    });

    actions
}
