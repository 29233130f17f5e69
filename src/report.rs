//! Score messages sent to the host shell
//!
//! Shapes are fixed by the host; field names are camelCase and the variant
//! is carried in a `type` tag.

use serde::{Deserialize, Serialize};

/// Number of real-attempt score slots
pub const SCORE_SLOTS: usize = 3;

/// Per-attempt breakdown in the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptScores {
    pub attempt1: u32,
    pub attempt2: u32,
    pub attempt3: u32,
}

impl From<[u32; SCORE_SLOTS]> for AttemptScores {
    fn from(scores: [u32; SCORE_SLOTS]) -> Self {
        let [attempt1, attempt2, attempt3] = scores;
        Self {
            attempt1,
            attempt2,
            attempt3,
        }
    }
}

/// High scores at the moment the session completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllHighScores {
    /// Best attempt since leaving the rules screen (practice included)
    pub session_high_score: u32,
    /// Persisted all-time best
    pub overall_high_score: u32,
}

/// A message for the host shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScoreReport {
    /// Sent after every real attempt
    #[serde(rename_all = "camelCase")]
    AttemptScore {
        attempt_number: u8,
        score: u32,
        attempts_left: u8,
        all_scores: [u32; SCORE_SLOTS],
        is_high_score: bool,
    },
    /// Sent once after the last real attempt
    #[serde(rename_all = "camelCase")]
    FinalScores {
        scores: [u32; SCORE_SLOTS],
        is_complete: bool,
        highest_score: u32,
        attempt_scores: AttemptScores,
        all_high_scores: AllHighScores,
    },
}

impl ScoreReport {
    pub fn attempt_score(
        attempt_number: u8,
        score: u32,
        attempts_left: u8,
        all_scores: [u32; SCORE_SLOTS],
        is_high_score: bool,
    ) -> Self {
        ScoreReport::AttemptScore {
            attempt_number,
            score,
            attempts_left,
            all_scores,
            is_high_score,
        }
    }

    /// Build the terminal report. Unplayed slots are already 0.
    pub fn final_scores(
        scores: [u32; SCORE_SLOTS],
        session_high_score: u32,
        overall_high_score: u32,
    ) -> Self {
        ScoreReport::FinalScores {
            scores,
            is_complete: true,
            highest_score: scores.iter().copied().max().unwrap_or(0),
            attempt_scores: scores.into(),
            all_high_scores: AllHighScores {
                session_high_score,
                overall_high_score,
            },
        }
    }

    /// Wire name of the message
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreReport::AttemptScore { .. } => "attemptScore",
            ScoreReport::FinalScores { .. } => "finalScores",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
