//! The interactive application: setup prompt, scene, status bar and debug log
//! wired onto the event loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::layout::Rect;

use crate::components::debug_log::take_panic_pending;
use crate::components::{
    Component, DebugLogComponent, DebugLogHandle, SetupChoice, SetupPrompt, StatusBar,
    render_scene,
};
use crate::config::SnapConfig;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::keybindings::{Action, KeyBindings};
use crate::persist::TracingStore;
use crate::scene::Scene;
use crate::ui::UiFrame;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub field: Rect,
    pub status: Rect,
    /// Bottom third of the field; only drawn while the log is open.
    pub log: Rect,
}

impl AppLayout {
    pub fn split(area: Rect) -> Self {
        let field_height = area.height.saturating_sub(1);
        let field = Rect {
            height: field_height,
            ..area
        };
        let status = Rect {
            y: area.y.saturating_add(field_height),
            height: area.height.min(1),
            ..area
        };
        let log_height = (field_height / 3).max(3).min(field_height);
        let log = Rect {
            y: field.y.saturating_add(field_height - log_height),
            height: log_height,
            ..field
        };
        Self { field, status, log }
    }
}

pub struct App {
    scene: Scene,
    prompt: Option<SetupPrompt>,
    preset: Option<SetupChoice>,
    last_choice: Option<SetupChoice>,
    debug_log: DebugLogComponent,
    status: StatusBar,
    keys: KeyBindings,
    rng: StdRng,
}

impl App {
    pub fn new(config: &SnapConfig, log: DebugLogHandle) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let scene = Scene::new(Rect::default(), config.scene_options())
            .with_store(Box::new(TracingStore));
        let mut debug_log = DebugLogComponent::with_handle(log);
        debug_log.set_visible(config.debug_log);
        let preset = config
            .preset()
            .map(|(count, palette)| SetupChoice { count, palette });
        let prompt = match (preset, config.areas) {
            (Some(_), _) => None,
            (None, Some(count)) => Some(SetupPrompt::with_count(count)),
            (None, None) => Some(SetupPrompt::new()),
        };
        let mut app = Self {
            scene,
            prompt,
            preset,
            last_choice: None,
            debug_log,
            status: StatusBar::new(),
            keys: KeyBindings::default(),
            rng,
        };
        if let Some(choice) = preset {
            app.apply_choice(choice);
        }
        app
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn prompt(&self) -> Option<&SetupPrompt> {
        self.prompt.as_ref()
    }

    pub fn debug_log_visible(&self) -> bool {
        self.debug_log.visible()
    }

    pub fn last_choice(&self) -> Option<SetupChoice> {
        self.last_choice
    }

    /// Track a new screen size.
    pub fn resize(&mut self, width: u16, height: u16) {
        let layout = AppLayout::split(Rect::new(0, 0, width, height));
        self.scene.set_field(layout.field);
    }

    fn apply_choice(&mut self, choice: SetupChoice) {
        self.scene
            .populate(choice.count, choice.palette, &mut self.rng);
        self.last_choice = Some(choice);
        self.prompt = None;
    }

    fn reroll(&mut self) {
        self.scene.abort_gesture();
        match self.preset {
            Some(choice) => self.apply_choice(choice),
            None => self.prompt = Some(SetupPrompt::new()),
        }
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Resize(width, height) => {
                self.resize(*width, *height);
                return ControlFlow::Continue;
            }
            Event::FocusLost => {
                self.scene.abort_gesture();
                return ControlFlow::Continue;
            }
            _ => {}
        }

        if let Event::Key(key) = event
            && self.keys.matches(Action::Quit, key)
        {
            return ControlFlow::Quit;
        }

        if let Some(prompt) = self.prompt.as_mut() {
            prompt.handle_event(event);
            if let Some(choice) = prompt.take_choice() {
                self.apply_choice(choice);
            }
            return ControlFlow::Continue;
        }

        // A running gesture owns the pointer until release, wherever it goes.
        if let Event::Mouse(mouse) = event
            && self.scene.active().is_some()
        {
            self.handle_mouse(mouse, now);
            return ControlFlow::Continue;
        }

        if self.debug_log.handle_event(event) {
            return ControlFlow::Continue;
        }

        match event {
            Event::Key(key) => {
                match self
                    .keys
                    .resolve(key, &[Action::ToggleDebugLog, Action::Reroll])
                {
                    Some(Action::ToggleDebugLog) => self.debug_log.toggle(),
                    Some(Action::Reroll) => self.reroll(),
                    _ => {}
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            _ => {}
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.scene.pointer_down(mouse.column, mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.scene.pointer_drag(mouse.column, mouse.row, now);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.scene.pointer_up();
            }
            _ => {}
        }
    }

    /// Idle work between events.
    pub fn tick(&mut self, now: Instant) {
        self.scene.tick(now);
        if take_panic_pending() {
            self.debug_log.set_visible(true);
        }
    }

    pub fn draw(&mut self, mut frame: UiFrame<'_>) {
        let layout = AppLayout::split(frame.area());
        self.scene.set_field(layout.field);
        render_scene(&mut frame, &self.scene, layout.field);

        self.status.update_from_scene(&self.scene);
        self.status.render(&mut frame, layout.status, false);

        self.debug_log.render(&mut frame, layout.log, true);
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.render(&mut frame, layout.field, true);
        }
    }
}

/// Run `app` until a quit key, drawing through `output` on every idle tick.
pub fn run<I, O>(app: &mut App, input: I, output: &mut O, tick: Duration) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    let size = output.size()?;
    app.resize(size.width, size.height);

    let mut event_loop = EventLoop::new(input, tick);
    event_loop.driver().set_mouse_capture(true)?;
    tracing::info!(width = size.width, height = size.height, "event loop started");

    let result = event_loop.run(|_, event| {
        let now = Instant::now();
        match event {
            Some(evt) => Ok(app.handle_event(&evt, now)),
            None => {
                app.tick(now);
                output.draw(|frame| app.draw(frame))?;
                Ok(ControlFlow::Continue)
            }
        }
    });

    let _ = event_loop.driver().set_mouse_capture(false);
    let exited = output.exit();
    result.and(exited)
}
