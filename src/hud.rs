//! HUD text, projected from the session state
//!
//! The display never owns any state: whatever the session says is what the
//! labels show.

use crate::sim::session::{Phase, SessionState};

pub const GAME_OVER_MESSAGE: &str = "Game Over";
pub const RESTART_HINT: &str = "Tap to play again";
pub const NEW_HIGH_SCORE_MESSAGE: &str = "New High Score!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub score_text: String,
    pub best_text: String,
    /// End-of-session lines, empty while playing
    pub messages: Vec<String>,
}

impl Hud {
    pub fn project(session: &SessionState) -> Self {
        let mut messages = Vec::new();
        if session.phase == Phase::GameOver {
            messages.push(GAME_OVER_MESSAGE.to_string());
            messages.push(RESTART_HINT.to_string());
            if session.new_high_score {
                messages.push(NEW_HIGH_SCORE_MESSAGE.to_string());
            }
        }

        Self {
            score_text: session.current_score.to_string(),
            best_text: format!("Best: {}", session.best_score),
            messages,
        }
    }
}
