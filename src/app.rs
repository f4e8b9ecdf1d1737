use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::director::{Director, GameEvent, SessionSummary};
use crate::entities::GameState;
use crate::input::{InputAction, InputListener, InputState};
use crate::renderer::{GameRenderer, RenderView};

/// The main application: drives the director at frame cadence and draws it.
pub struct App {
    running: bool,
    director: Director,
    renderer: GameRenderer,
    /// Frames info
    started: Instant,
    last_frame_time: Instant,
    fps: u32,
    frame_budget: Duration,
}

impl App {
    pub fn new(config: &GameConfig, starting_lives: u32) -> Self {
        Self::with_director(Director::new(config, starting_lives), config)
    }

    pub fn with_director(director: Director, config: &GameConfig) -> Self {
        let now = Instant::now();
        Self {
            running: true,
            director,
            renderer: GameRenderer::new(),
            started: now,
            last_frame_time: now,
            fps: 0,
            frame_budget: Duration::from_millis(config.frame_budget_ms()),
        }
    }

    /// Run the application's main loop until the player quits.
    ///
    /// `release_events` tells the input listener whether the terminal reports key
    /// releases. The listener is stopped before this returns, error or not.
    pub fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
        release_events: bool,
    ) -> Result<SessionSummary> {
        let (listener, actions) = InputListener::spawn(release_events);

        while self.running {
            let frame_start = Instant::now();
            let frame_time = frame_start.duration_since(self.last_frame_time);
            self.last_frame_time = frame_start;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                let view = RenderView::from_director(&self.director, self.fps);
                self.renderer.render(frame, &view);
            })?;

            self.drain_actions(&actions);
            if !self.running {
                break;
            }

            let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            self.update(now_ms, &listener.snapshot());

            // Sleep off what is left of the frame
            if let Some(rest) = self.frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        drop(listener);
        let summary = self.director.summary();
        log::info!(
            "session end: score {}, lives {} -> {}",
            summary.score,
            summary.starting_lives,
            summary.lives_remaining
        );
        Ok(summary)
    }

    fn drain_actions(&mut self, actions: &Receiver<InputAction>) {
        loop {
            match actions.try_recv() {
                Ok(action) => self.process_action(action),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("input listener stopped unexpectedly, quitting");
                    self.running = false;
                    break;
                }
            }
        }
    }

    /// Process one input action and update game state accordingly
    fn process_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => {
                self.running = false;
            }
            InputAction::TogglePause => {
                self.director.toggle_pause();
            }
            InputAction::Restart => {
                let state = self.director.state();
                if state == GameState::Paused || state.is_game_over() {
                    self.director.restart();
                }
            }
        }
    }

    /// Advances one frame and reports what happened
    fn update(&mut self, now_ms: f64, input: &InputState) {
        for event in self.director.tick(now_ms, input) {
            match event {
                GameEvent::GameOver {
                    final_score,
                    lives_remaining,
                } => {
                    log::info!("round over: score {final_score}, {lives_remaining} lives left");
                }
                GameEvent::LifeLost { lives_remaining } => {
                    log::info!("life lost, {lives_remaining} left");
                }
                GameEvent::ShotFired
                | GameEvent::EnemiesDestroyed { .. }
                | GameEvent::PlayerDestroyed => {}
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn director(&self) -> &Director {
        &self.director
    }
}
