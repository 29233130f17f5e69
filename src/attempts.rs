//! Practice/real attempt progression
//!
//! A session is three practice attempts followed by three real ones. Only
//! real attempts are scored and reported to the host. Transitions are pure:
//! `(state, event) -> (state, reports)`, and the state is the only record of
//! each attempt's score.

use serde::{Deserialize, Serialize};

use crate::consts::ATTEMPTS_PER_PHASE;
use crate::error::AttemptError;
use crate::report::{SCORE_SLOTS, ScoreReport};

/// Which half of the session an attempt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptPhase {
    Practice,
    Real,
}

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Rules screen, nothing running
    #[default]
    Rules,
    /// Practice attempt 1..=3
    Practice(u8),
    /// Real attempt 1..=3
    Real(u8),
    /// All real attempts done
    Leaderboard,
}

impl Stage {
    pub fn phase(&self) -> Option<AttemptPhase> {
        match self {
            Stage::Practice(_) => Some(AttemptPhase::Practice),
            Stage::Real(_) => Some(AttemptPhase::Real),
            Stage::Rules | Stage::Leaderboard => None,
        }
    }

    /// Attempt number within the phase
    pub fn attempt_number(&self) -> Option<u8> {
        match *self {
            Stage::Practice(n) | Stage::Real(n) => Some(n),
            Stage::Rules | Stage::Leaderboard => None,
        }
    }

    /// True while an attempt is being played
    pub fn is_attempt(&self) -> bool {
        self.phase().is_some()
    }

    pub fn label(&self) -> String {
        match self {
            Stage::Rules => "Rules".to_string(),
            Stage::Practice(n) => format!("Practice {}/{}", n, ATTEMPTS_PER_PHASE),
            Stage::Real(n) => format!("Attempt {}/{}", n, ATTEMPTS_PER_PHASE),
            Stage::Leaderboard => "Leaderboard".to_string(),
        }
    }
}

/// Inputs to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    /// Player left the rules screen
    Start,
    /// The current attempt ended
    GameOver {
        score: u32,
        /// Score beat the persisted high score
        new_high_score: bool,
        /// Persisted high score after this attempt
        overall_high_score: u32,
    },
    /// Player acknowledged the leaderboard
    Replay,
}

/// Attempt bookkeeping for one session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttemptState {
    pub stage: Stage,
    /// One slot per real attempt
    pub scores: [u32; SCORE_SLOTS],
    /// Best attempt (practice or real) since leaving the rules screen
    pub session_high_score: u32,
}

/// Outcome of applying an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AttemptState,
    /// Messages to post to the host, in order
    pub reports: Vec<ScoreReport>,
    /// The board must be reset for a new attempt
    pub reset_board: bool,
}

impl AttemptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts remaining in the current phase, counting the current one
    pub fn attempts_left_in_phase(&self) -> u8 {
        match self.stage.attempt_number() {
            Some(n) => (ATTEMPTS_PER_PHASE + 1).saturating_sub(n),
            None => 0,
        }
    }

    /// Apply an event, producing the next state and any host reports
    pub fn apply(&self, event: &AttemptEvent) -> Result<Transition, AttemptError> {
        match (self.stage, event) {
            (Stage::Rules, AttemptEvent::Start) => Ok(Transition {
                state: AttemptState {
                    stage: Stage::Practice(1),
                    ..AttemptState::new()
                },
                reports: Vec::new(),
                reset_board: true,
            }),

            (Stage::Practice(n), AttemptEvent::GameOver { score, .. }) => {
                let mut next = self.clone();
                next.session_high_score = next.session_high_score.max(*score);
                if n < ATTEMPTS_PER_PHASE {
                    next.stage = Stage::Practice(n + 1);
                } else {
                    next.stage = Stage::Real(1);
                    next.scores = [0; SCORE_SLOTS];
                }
                Ok(Transition {
                    state: next,
                    reports: Vec::new(),
                    reset_board: true,
                })
            }

            (
                Stage::Real(n),
                AttemptEvent::GameOver {
                    score,
                    new_high_score,
                    overall_high_score,
                },
            ) => {
                let slot = usize::from(n)
                    .checked_sub(1)
                    .filter(|slot| *slot < SCORE_SLOTS && n <= ATTEMPTS_PER_PHASE)
                    .ok_or(AttemptError::SlotOutOfRange { attempt: n })?;

                let mut next = self.clone();
                next.scores[slot] = *score;
                next.session_high_score = next.session_high_score.max(*score);

                let mut reports = vec![ScoreReport::attempt_score(
                    n,
                    *score,
                    ATTEMPTS_PER_PHASE - n,
                    next.scores,
                    *new_high_score,
                )];

                let reset_board = if n < ATTEMPTS_PER_PHASE {
                    next.stage = Stage::Real(n + 1);
                    true
                } else {
                    next.stage = Stage::Leaderboard;
                    reports.push(ScoreReport::final_scores(
                        next.scores,
                        next.session_high_score,
                        *overall_high_score,
                    ));
                    false
                };

                Ok(Transition {
                    state: next,
                    reports,
                    reset_board,
                })
            }

            (Stage::Leaderboard, AttemptEvent::Replay) => Ok(Transition {
                state: AttemptState::new(),
                reports: Vec::new(),
                reset_board: false,
            }),

            (stage, event) => Err(AttemptError::InvalidTransition {
                stage,
                event: event.clone(),
            }),
        }
    }
}
