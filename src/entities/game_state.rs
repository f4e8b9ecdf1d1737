#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// Ship lost but lives remain; a restart continues the session
    GameOverWithLivesRemaining,
    /// Out of lives. Only an external top-up leaves this state
    GameOverNoLives,
}

impl GameState {
    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameState::GameOverWithLivesRemaining | GameState::GameOverNoLives
        )
    }

    pub fn can_restart(&self) -> bool {
        !matches!(self, GameState::GameOverNoLives)
    }
}
