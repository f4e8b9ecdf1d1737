use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the listener waits for a terminal event before checking its stop flag
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Without release events a held key is assumed released after this long without a repeat
const HOLD_TIMEOUT: Duration = Duration::from_millis(200);
/// Wait before the first auto-repeat, longer than common terminal repeat delays
const FIRST_REPEAT_TIMEOUT: Duration = Duration::from_millis(700);

/// Snapshot of the held controls, read once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

/// One-shot commands, delivered in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    TogglePause,
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

const CONTROLS: [Control; 5] = [
    Control::Left,
    Control::Right,
    Control::Up,
    Control::Down,
    Control::Fire,
];

/// Held-control flags shared between the listener thread and the game loop.
///
/// Each flag is written only by the listener; the loop only reads snapshots.
#[derive(Debug, Default)]
pub struct SharedInput {
    left: AtomicBool,
    right: AtomicBool,
    up: AtomicBool,
    down: AtomicBool,
    fire: AtomicBool,
}

impl SharedInput {
    pub fn snapshot(&self) -> InputState {
        InputState {
            left: self.left.load(Ordering::Relaxed),
            right: self.right.load(Ordering::Relaxed),
            up: self.up.load(Ordering::Relaxed),
            down: self.down.load(Ordering::Relaxed),
            fire: self.fire.load(Ordering::Relaxed),
        }
    }

    fn flag(&self, control: Control) -> &AtomicBool {
        match control {
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::Up => &self.up,
            Control::Down => &self.down,
            Control::Fire => &self.fire,
        }
    }

    fn set(&self, control: Control, held: bool) {
        self.flag(control).store(held, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        for control in CONTROLS {
            self.set(control, false);
        }
    }
}

fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Control::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Control::Right),
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Control::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Control::Down),
        KeyCode::Char(' ') => Some(Control::Fire),
        _ => None,
    }
}

fn action_for(key: &KeyEvent) -> Option<InputAction> {
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
            Some(InputAction::Quit)
        }
        (_, KeyCode::Char('p') | KeyCode::Char('P')) => Some(InputAction::TogglePause),
        (_, KeyCode::Char('r') | KeyCode::Char('R')) => Some(InputAction::Restart),
        _ => None,
    }
}

/// Translates raw key events into held flags and one-shot actions
pub struct InputManager {
    shared: Arc<SharedInput>,
    actions: Sender<InputAction>,
    /// Whether the terminal reports key releases
    release_events: bool,
    last_pressed: [Option<Instant>; 5],
    /// Auto-repeat has been seen since the control was first pressed
    repeating: [bool; 5],
}

impl InputManager {
    pub fn new(shared: Arc<SharedInput>, actions: Sender<InputAction>, release_events: bool) -> Self {
        Self {
            shared,
            actions,
            release_events,
            last_pressed: [None; 5],
            repeating: [false; 5],
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key_press(key, now),
            KeyEventKind::Release => {
                if let Some(control) = control_for(key.code) {
                    self.shared.set(control, false);
                    self.last_pressed[control as usize] = None;
                    self.repeating[control as usize] = false;
                }
            }
        }
    }

    fn handle_key_press(&mut self, key: KeyEvent, now: Instant) {
        if let Some(control) = control_for(key.code) {
            // Without releases the opposite key can never be let go, so the newest press wins
            let opposite = match control {
                Control::Left => Some(Control::Right),
                Control::Right => Some(Control::Left),
                Control::Up => Some(Control::Down),
                Control::Down => Some(Control::Up),
                Control::Fire => None,
            };
            if let Some(opposite) = opposite.filter(|_| !self.release_events) {
                self.shared.set(opposite, false);
                self.last_pressed[opposite as usize] = None;
                self.repeating[opposite as usize] = false;
            }

            // Legacy terminals report repeats as presses of a key already held
            let slot = control as usize;
            self.repeating[slot] =
                key.kind == KeyEventKind::Repeat || self.last_pressed[slot].is_some();
            self.shared.set(control, true);
            self.last_pressed[slot] = Some(now);
            return;
        }

        // Repeats of one-shot keys are not new commands
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(action) = action_for(&key) {
            // The receiver is gone only during teardown
            let _ = self.actions.send(action);
        }
    }

    /// Releases keys whose auto-repeat stopped. No-op when releases are reported.
    ///
    /// Until a control's first repeat arrives it gets the longer initial delay.
    pub fn expire_held(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        for control in CONTROLS {
            let slot = control as usize;
            let timeout = if self.repeating[slot] {
                HOLD_TIMEOUT
            } else {
                FIRST_REPEAT_TIMEOUT
            };
            let expired = self.last_pressed[slot]
                .is_some_and(|pressed| now.duration_since(pressed) >= timeout);
            if expired {
                self.last_pressed[slot] = None;
                self.repeating[slot] = false;
                self.shared.set(control, false);
            }
        }
    }
}

/// Background thread feeding terminal key events into [`SharedInput`].
///
/// Dropping the listener stops and joins the thread and clears held flags.
pub struct InputListener {
    shared: Arc<SharedInput>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputListener {
    pub fn spawn(release_events: bool) -> (Self, Receiver<InputAction>) {
        let shared = Arc::new(SharedInput::default());
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let mut manager = InputManager::new(Arc::clone(&shared), tx, release_events);
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) => manager.handle_key_event(key, Instant::now()),
                        Ok(_) => {}
                        Err(err) => {
                            log::error!("input read failed: {err}");
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(err) => {
                        log::error!("input poll failed: {err}");
                        break;
                    }
                }
                manager.expire_held(Instant::now());
            }
            log::debug!("input listener stopped");
        });

        log::debug!("input listener started (release events: {release_events})");
        (
            Self {
                shared,
                stop,
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn snapshot(&self) -> InputState {
        self.shared.snapshot()
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("input listener panicked");
            }
        }
        self.shared.clear();
    }
}
