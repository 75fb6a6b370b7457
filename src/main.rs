use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowId},
};

use walkthrough::cli::Cli;
use walkthrough::core::{Clock, FrameStats, WinitInput};
use walkthrough::scenes::ScenePreset;
use walkthrough::script::InputScript;
use walkthrough::session::{FrameOutput, NavigationSession, PoseReporter};
use walkthrough::triggers::TriggerEvent;
use walkthrough::HorizontalOutcome;

// === Constants ===

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;
const FIELD_OF_VIEW_DEGREES: f32 = 50.0;
/// Hotspots are picked with a sphere this size, independent of their activation radius
const PICK_RADIUS: f32 = 0.5;
/// Pointer travel (pixels) below which a press and release count as a click
const CLICK_SLOP: f32 = 4.0;

/// Scene a trigger event asks to switch to, if any
fn transition_target(event: &TriggerEvent) -> Option<&str> {
    match event {
        TriggerEvent::DoorActivated { target, .. } => target.as_deref(),
        TriggerEvent::SceneTransition { target, .. } => Some(target),
        _ => None,
    }
}

fn log_event(frame: u64, event: &TriggerEvent) {
    match event {
        TriggerEvent::Entered { id } => log::info!("[{}] near '{}'", frame, id),
        TriggerEvent::DoorActivated { id, target } => {
            log::info!("[{}] door '{}' -> {}", frame, id, target.as_deref().unwrap_or("(none)"))
        }
        TriggerEvent::HotspotInteract { id } => log::info!("[{}] inspect '{}'", frame, id),
        TriggerEvent::SceneTransition { id, target } => log::info!("[{}] portal '{}' -> {}", frame, id, target),
    }
}

// === Headless ===

#[derive(Default)]
struct RunSummary {
    frames: u64,
    blocked: u64,
    events: u64,
    scenes: Vec<String>,
}

fn run_headless(cli: &Cli) -> Result<()> {
    let script = match &cli.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::idle(cli.frames),
    };

    let mut scene = cli.load_scene()?;
    let mut session = scene.session();
    let mut reporter = PoseReporter::new();
    let mut stats = FrameStats::default();
    let mut summary = RunSummary {
        scenes: vec![scene.name.clone()],
        ..Default::default()
    };

    log::info!(
        "headless run: scene '{}', {} frames at dt {:.4}",
        scene.name,
        script.total_frames(),
        cli.dt
    );

    let mut cursor = script.cursor();
    while let Some(clicks) = cursor.next_frame(&mut session)? {
        let started = Instant::now();
        let mut out = session.step_frame(cli.dt, &scene.geometry);
        stats.record(started.elapsed().as_secs_f32());
        out.events.extend(clicks);

        if let Some(rounded) = reporter.observe(&out.pose) {
            log::debug!("[{}] {}", summary.frames, rounded);
        }
        if matches!(out.report.horizontal, HorizontalOutcome::Blocked { .. }) {
            summary.blocked += 1;
        }
        summary.events += out.events.len() as u64;

        let next = next_scene(cli, summary.frames, &out)?;
        summary.frames += 1;

        if let Some(next) = next {
            summary.scenes.push(next.name.clone());
            session = next.session();
            scene = next;
        }
    }

    println!("Scenes visited: {}", summary.scenes.join(" -> "));
    println!("Frames: {} ({} blocked), trigger events: {}", summary.frames, summary.blocked, summary.events);
    match reporter.last() {
        Some(pose) => println!("Final pose: {}", pose),
        None => println!("Final pose: {}", session.pose().position),
    }
    if stats.total_time() > 0.0 {
        println!(
            "Solver time: {:.3} ms total, {:.1} us/frame",
            stats.total_time() * 1000.0,
            stats.total_time() * 1e6 / stats.total_frames().max(1) as f32
        );
    }

    Ok(())
}

/// Log a frame's events and load the scene the last transition asks for
fn next_scene(cli: &Cli, frame: u64, out: &FrameOutput) -> Result<Option<ScenePreset>> {
    let mut next = None;
    for event in &out.events {
        log_event(frame, event);
        if let Some(target) = transition_target(event) {
            next = Some(target.to_string());
        }
    }
    next.map(|target| {
        cli.load_named_scene(&target)
            .with_context(|| format!("Failed to switch to scene '{}'", target))
    })
    .transpose()
}

// === Interactive ===

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    scene: ScenePreset,
    session: NavigationSession,
    input: WinitInput,
    clock: Clock,
    stats: FrameStats,
    reporter: PoseReporter,
    press_at: Option<(f32, f32)>,
    hovered: Option<String>,
}

impl App {
    fn new(cli: Cli) -> Result<Self> {
        let scene = cli.load_scene()?;
        let session = scene.session();
        Ok(Self {
            clock: Clock::new(scene.config.max_frame_delta),
            cli,
            window: None,
            scene,
            session,
            input: WinitInput::new(),
            stats: FrameStats::default(),
            reporter: PoseReporter::new(),
            press_at: None,
            hovered: None,
        })
    }

    fn switch_scene(&mut self, target: &str) {
        match self.cli.load_named_scene(target) {
            Ok(scene) => {
                log::info!("switching to scene '{}'", scene.name);
                self.session = scene.session();
                self.scene = scene;
                self.hovered = None;
                self.clock.reset();
            }
            Err(e) => log::error!("cannot switch to '{}': {:#}", target, e),
        }
    }

    fn viewport(&self) -> (f32, f32) {
        self.window
            .as_ref()
            .map(|w| {
                let size = w.inner_size();
                (size.width as f32, size.height as f32)
            })
            .unwrap_or((INITIAL_WINDOW_WIDTH as f32, INITIAL_WINDOW_HEIGHT as f32))
    }

    fn update_hover(&mut self) {
        let Some(cursor) = self.input.cursor() else {
            return;
        };
        let ray = self
            .session
            .pose()
            .cursor_ray(cursor, self.viewport(), FIELD_OF_VIEW_DEGREES.to_radians());
        let picked = self.session.triggers().pick(&ray, PICK_RADIUS).map(str::to_string);
        if picked == self.hovered {
            return;
        }

        if let Some(previous) = self.hovered.take() {
            self.session.hotspot_out(&previous);
        }
        if let Some(id) = &picked {
            self.session.hotspot_over(id);
        }
        self.hovered = picked;

        if let Some(window) = &self.window {
            let icon = if self.hovered.is_some() {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            };
            window.set_cursor(icon);
        }
    }

    fn handle_click(&mut self) {
        let Some(id) = self.hovered.clone() else {
            return;
        };
        if let Some(event) = self.session.hotspot_click(&id) {
            log_event(self.session.frame(), &event);
            if let Some(target) = transition_target(&event) {
                let target = target.to_string();
                self.switch_scene(&target);
            }
        }
    }

    fn redraw(&mut self) {
        let delta = self.clock.tick();
        if let Some(fps) = self.stats.record(delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        let out = self.session.step_frame(delta, &self.scene.geometry);
        let mut target = None;
        for event in &out.events {
            log_event(self.session.frame(), event);
            if let Some(t) = transition_target(event) {
                target = Some(t.to_string());
            }
        }

        if let Some(rounded) = self.reporter.observe(&out.pose) {
            if let Some(window) = &self.window {
                let fps = self.stats.current().unwrap_or(0.0);
                window.set_title(&format!("{} | {} | {:.0} fps", self.scene.name, rounded, fps));
            }
        }

        if let Some(target) = target {
            self.switch_scene(&target);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Walkthrough")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.window = Some(window);
            self.clock.reset();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            event => {
                // Click detection needs the cursor before and after the sampler sees the event
                let release = matches!(
                    event,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        button: MouseButton::Left,
                        ..
                    }
                );
                if matches!(
                    event,
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    }
                ) {
                    self.press_at = self.input.cursor();
                }

                self.input.process_event(&event, self.session.input_mut());

                if let WindowEvent::CursorMoved { .. } = event {
                    if !self.session.input().is_dragging() {
                        self.update_hover();
                    }
                }
                if release {
                    let still = match (self.press_at.take(), self.input.cursor()) {
                        (Some(a), Some(b)) => (a.0 - b.0).hypot(a.1 - b.1) < CLICK_SLOP,
                        _ => false,
                    };
                    if still {
                        self.handle_click();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.interactive {
        return run_headless(&cli);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli)?;

    println!("Walkthrough - Controls: WASD/arrows to move, drag to look, F to enter doors, click hotspots, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
