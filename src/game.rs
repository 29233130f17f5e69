//! Live game session
//!
//! Owns the board, the attempt controller and the two collaborators (score
//! storage and host channel). Every side effect happens here and every
//! failure is logged here.

use crate::attempts::{AttemptEvent, AttemptState, Stage};
use crate::error::AttemptError;
use crate::highscores::HighScore;
use crate::host::{Delivery, MessageSink, send_report};
use crate::persistence::KeyValueStore;
use crate::report::ScoreReport;
use crate::sim::{Direction, GameConfig, GameState, TickOutcome, tick};

/// What a session tick means for the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Nothing to do (not in an attempt, paused or already over)
    Idle,
    Moved,
    /// Food eaten; re-arm the timer if the speed changed
    Ate { score: u32, speed_changed: bool },
    /// Attempt ended and the session moved on; stop the timer
    AttemptFinished { score: u32, next: Stage },
    /// Bookkeeping failed; the board stays over until reset to rules
    Halted,
}

/// A player's session from the rules screen to the leaderboard
pub struct GameSession<S: KeyValueStore> {
    pub state: GameState,
    pub attempts: AttemptState,
    high_score: HighScore,
    store: S,
    sink: Option<Box<dyn MessageSink>>,
    paused: bool,
    /// The last attempt's board is frozen on screen until the player moves on
    awaiting_next: bool,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Create a session on the rules screen
    pub fn new(
        config: GameConfig,
        seed: u64,
        store: S,
        sink: Option<Box<dyn MessageSink>>,
    ) -> Self {
        let high_score = HighScore::load(&store).unwrap_or_else(|e| {
            log::warn!("Failed to load high score, starting from 0: {}", e);
            HighScore::default()
        });
        log::info!(
            "Session created (seed {}, high score {}, {} speed)",
            seed,
            high_score.best(),
            config.speed_policy.as_str()
        );

        Self {
            state: GameState::new(config, seed),
            attempts: AttemptState::new(),
            high_score,
            store,
            sink,
            paused: false,
            awaiting_next: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.attempts.stage
    }

    /// All-time best score
    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// An attempt ended and the next one starts on `resume`
    pub fn is_awaiting_next(&self) -> bool {
        self.awaiting_next
    }

    /// True while ticks would advance the board
    pub fn is_running(&self) -> bool {
        self.attempts.stage.is_attempt()
            && !self.state.game_over
            && !self.paused
            && !self.awaiting_next
    }

    /// Interval the driver should wait before the next tick
    pub fn tick_interval_ms(&self) -> u32 {
        self.state.speed_ms
    }

    /// Leave the rules screen for the first practice attempt
    pub fn start(&mut self) -> Result<(), AttemptError> {
        self.apply(AttemptEvent::Start)
    }

    /// Leave the leaderboard for a fresh rules screen
    pub fn replay(&mut self) -> Result<(), AttemptError> {
        self.apply(AttemptEvent::Replay)
    }

    /// Abandon whatever is in progress and go back to the rules screen
    pub fn reset_to_rules(&mut self) {
        log::info!("Reset to rules from {:?}", self.attempts.stage);
        self.attempts = AttemptState::new();
        self.state = GameState::new(self.state.config.clone(), self.state.seed);
        self.paused = false;
        self.awaiting_next = false;
    }

    /// Player input; ignored outside an attempt and while the last board is shown
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.attempts.stage.is_attempt() || self.awaiting_next {
            return false;
        }
        self.state.set_direction(direction)
    }

    pub fn pause(&mut self) {
        if self.is_running() {
            self.paused = true;
            log::info!("Paused");
        }
    }

    /// Unpause, or start the next attempt if one is waiting
    pub fn resume(&mut self) {
        if self.awaiting_next {
            self.begin_attempt();
            log::info!("{} started", self.attempts.stage.label());
        } else if self.paused {
            self.paused = false;
            log::info!("Resumed");
        }
    }

    /// Advance one tick
    pub fn tick(&mut self) -> SessionEvent {
        if !self.is_running() {
            return SessionEvent::Idle;
        }

        match tick(&mut self.state) {
            TickOutcome::Idle => SessionEvent::Idle,
            TickOutcome::Moved => SessionEvent::Moved,
            TickOutcome::Ate { speed_changed, .. } => SessionEvent::Ate {
                score: self.state.score,
                speed_changed,
            },
            TickOutcome::Collided { at, kind } => {
                log::info!(
                    "{} over: hit {:?} at {} with score {}",
                    self.attempts.stage.label(),
                    kind,
                    at,
                    self.state.score
                );
                self.finish_attempt()
            }
        }
    }

    /// End the current attempt as if the snake had crashed
    pub fn end_attempt(&mut self) -> SessionEvent {
        if !self.attempts.stage.is_attempt() || self.state.game_over {
            return SessionEvent::Idle;
        }
        log::info!("{} ended early", self.attempts.stage.label());
        self.state.game_over = true;
        self.finish_attempt()
    }

    fn finish_attempt(&mut self) -> SessionEvent {
        let score = self.state.score;

        let new_high_score = self.high_score.record(score);
        if new_high_score {
            log::info!("New high score: {}", score);
            if let Err(e) = self.high_score.save(&self.store) {
                log::warn!("Failed to save high score: {}", e);
            }
        }

        let event = AttemptEvent::GameOver {
            score,
            new_high_score,
            overall_high_score: self.high_score.best(),
        };
        match self.apply(event) {
            Ok(()) => SessionEvent::AttemptFinished {
                score,
                next: self.attempts.stage,
            },
            Err(e) => {
                log::error!("Score bookkeeping failed, attempt not recorded: {}", e);
                SessionEvent::Halted
            }
        }
    }

    fn begin_attempt(&mut self) {
        self.state.reset();
        self.paused = false;
        self.awaiting_next = false;
    }

    fn apply(&mut self, event: AttemptEvent) -> Result<(), AttemptError> {
        let transition = self.attempts.apply(&event)?;

        for report in &transition.reports {
            self.post(report);
        }

        if transition.state.stage != self.attempts.stage {
            log::info!(
                "{} -> {}",
                self.attempts.stage.label(),
                transition.state.stage.label()
            );
        }
        self.attempts = transition.state;
        if transition.reset_board {
            match event {
                AttemptEvent::Start => self.begin_attempt(),
                _ => self.awaiting_next = true,
            }
        }
        Ok(())
    }

    fn post(&self, report: &ScoreReport) {
        match send_report(self.sink.as_deref(), report) {
            Ok(Delivery::Sent) => log::info!("Sent {} to host", report.kind()),
            Ok(Delivery::NoHost) => log::debug!("No host channel, skipped {}", report.kind()),
            Err(e) => log::warn!("Failed to send {} to host: {}", report.kind(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HostError, StorageError};
    use crate::persistence::MemoryStore;
    use glam::IVec2;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Records every message; clones share the log
    #[derive(Clone, Default)]
    struct Recorder {
        messages: Rc<RefCell<Vec<Value>>>,
    }

    impl MessageSink for Recorder {
        fn is_available(&self) -> bool {
            true
        }

        fn post_message(&self, message: &str) -> Result<(), HostError> {
            let value = serde_json::from_str(message).map_err(HostError::Encode)?;
            self.messages.borrow_mut().push(value);
            Ok(())
        }
    }

    /// Store whose reads and writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn session() -> (GameSession<MemoryStore>, Recorder) {
        let recorder = Recorder::default();
        let session = GameSession::new(
            GameConfig::default(),
            12345,
            MemoryStore::new(),
            Some(Box::new(recorder.clone())),
        );
        (session, recorder)
    }

    /// Put the food in front of the snake and tick onto it
    fn eat<S: KeyValueStore>(session: &mut GameSession<S>) {
        session.resume();
        let state = &mut session.state;
        state.food.position = state.wrap(state.head() + state.direction.delta());
        assert!(matches!(session.tick(), SessionEvent::Ate { .. }));
    }

    /// Line the snake up against an obstacle and tick into it
    fn crash<S: KeyValueStore>(session: &mut GameSession<S>) -> SessionEvent {
        session.resume();
        session.state.snake =
            VecDeque::from(vec![IVec2::new(4, 5), IVec2::new(3, 5), IVec2::new(2, 5)]);
        session.state.direction = Direction::Right;
        session.tick()
    }

    fn finish_practice<S: KeyValueStore>(session: &mut GameSession<S>) {
        session.start().unwrap();
        for _ in 0..3 {
            crash(session);
        }
        assert_eq!(session.stage(), Stage::Real(1));
    }

    #[test]
    fn test_new_session_on_rules() {
        let (mut session, recorder) = session();
        assert_eq!(session.stage(), Stage::Rules);
        assert!(!session.is_running());
        assert_eq!(session.tick(), SessionEvent::Idle);
        assert!(!session.set_direction(Direction::Up));
        assert!(recorder.messages.borrow().is_empty());
    }

    #[test]
    fn test_immediate_practice_crash() {
        let (mut session, recorder) = session();
        session.start().unwrap();
        assert_eq!(session.stage(), Stage::Practice(1));

        let event = crash(&mut session);
        assert_eq!(
            event,
            SessionEvent::AttemptFinished {
                score: 0,
                next: Stage::Practice(2)
            }
        );
        assert_eq!(session.attempts.attempts_left_in_phase(), 2);
        assert_eq!(session.state.score, 0);
        assert!(recorder.messages.borrow().is_empty());
    }

    #[test]
    fn test_waits_for_next_attempt() {
        let (mut session, _recorder) = session();
        session.start().unwrap();
        crash(&mut session);

        // The next-attempt prompt is up: nothing runs until the player moves on
        assert!(session.is_awaiting_next());
        assert!(!session.is_running());
        assert_eq!(session.tick(), SessionEvent::Idle);
        assert!(!session.set_direction(Direction::Up));

        session.resume();
        assert!(!session.is_awaiting_next());
        assert!(session.is_running());
        assert!(!session.state.game_over);
        assert_eq!(session.stage(), Stage::Practice(2));
        assert_ne!(session.tick(), SessionEvent::Idle);
    }

    #[test]
    fn test_final_board_kept_until_resume() {
        let (mut session, _recorder) = session();
        session.start().unwrap();
        eat(&mut session);
        eat(&mut session);
        crash(&mut session);

        assert_eq!(session.state.score, 20);
        assert!(session.state.game_over);
        assert_eq!(
            session.state.snake,
            VecDeque::from(vec![IVec2::new(4, 5), IVec2::new(3, 5), IVec2::new(2, 5)])
        );

        session.resume();
        assert_eq!(session.state.score, 0);
        assert_eq!(session.state.snake_len(), 3);
        assert_eq!(session.state.head(), IVec2::new(10, 10));
    }

    #[test]
    fn test_first_real_attempt_report() {
        let (mut session, recorder) = session();
        finish_practice(&mut session);

        eat(&mut session);
        eat(&mut session);
        assert_eq!(session.state.score, 20);
        crash(&mut session);

        let messages = recorder.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            json!({
                "type": "attemptScore",
                "attemptNumber": 1,
                "score": 20,
                "attemptsLeft": 2,
                "allScores": [20, 0, 0],
                "isHighScore": true
            })
        );
        assert_eq!(session.stage(), Stage::Real(2));
        assert_eq!(session.state.score, 20);
        session.resume();
        assert_eq!(session.state.score, 0);
    }

    #[test]
    fn test_full_session_final_scores() {
        let (mut session, recorder) = session();
        finish_practice(&mut session);

        for foods in [2, 0, 3] {
            for _ in 0..foods {
                eat(&mut session);
            }
            crash(&mut session);
        }
        assert_eq!(session.stage(), Stage::Leaderboard);
        assert!(!session.is_running());

        let messages = recorder.messages.borrow();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1]["allScores"], json!([20, 0, 0]));
        assert_eq!(messages[1]["isHighScore"], json!(false));
        assert_eq!(messages[2]["allScores"], json!([20, 0, 30]));
        assert_eq!(
            messages[3],
            json!({
                "type": "finalScores",
                "scores": [20, 0, 30],
                "isComplete": true,
                "highestScore": 30,
                "attemptScores": {"attempt1": 20, "attempt2": 0, "attempt3": 30},
                "allHighScores": {"sessionHighScore": 30, "overallHighScore": 30}
            })
        );
    }

    #[test]
    fn test_high_score_persisted() {
        let store = MemoryStore::with_entry(HighScore::STORAGE_KEY, "10");
        let mut session = GameSession::new(GameConfig::default(), 7, store, None);
        assert_eq!(session.high_score(), 10);

        session.start().unwrap();
        eat(&mut session);
        eat(&mut session);
        crash(&mut session);

        assert_eq!(session.high_score(), 20);
        assert_eq!(
            session.store().get(HighScore::STORAGE_KEY),
            Ok(Some("20".to_string()))
        );
    }

    #[test]
    fn test_storage_failures_are_not_fatal() {
        let mut session = GameSession::new(GameConfig::default(), 7, BrokenStore, None);
        assert_eq!(session.high_score(), 0);

        session.start().unwrap();
        eat(&mut session);
        let event = crash(&mut session);
        assert!(matches!(event, SessionEvent::AttemptFinished { score: 10, .. }));
        assert_eq!(session.high_score(), 10);
    }

    #[test]
    fn test_no_host_still_progresses() {
        let mut session = GameSession::new(GameConfig::default(), 7, MemoryStore::new(), None);
        finish_practice(&mut session);
        for _ in 0..3 {
            crash(&mut session);
        }
        assert_eq!(session.stage(), Stage::Leaderboard);
        assert_eq!(session.attempts.scores, [0, 0, 0]);
    }

    #[test]
    fn test_bookkeeping_error_halts() {
        let (mut session, recorder) = session();
        session.start().unwrap();
        session.attempts.stage = Stage::Real(9);

        let event = crash(&mut session);
        assert_eq!(event, SessionEvent::Halted);
        assert!(session.state.game_over);
        assert_eq!(session.tick(), SessionEvent::Idle);
        assert!(recorder.messages.borrow().is_empty());

        session.reset_to_rules();
        assert_eq!(session.stage(), Stage::Rules);
        assert!(!session.state.game_over);
    }

    #[test]
    fn test_reset_to_rules_rebuilds_board() {
        let (mut session, _recorder) = session();
        let fresh = GameState::new(GameConfig::default(), 12345);
        session.start().unwrap();
        eat(&mut session);
        eat(&mut session);
        crash(&mut session);
        assert!(session.is_awaiting_next());

        session.reset_to_rules();
        assert!(!session.is_awaiting_next());
        assert!(!session.is_running());
        assert_eq!(session.state.score, 0);
        assert_eq!(session.state.snake, fresh.snake);
        assert_eq!(session.state.food, fresh.food);
        assert_eq!(session.state.obstacles, fresh.obstacles);
        assert_eq!(session.state.time_ticks, 0);
    }

    #[test]
    fn test_replay_returns_to_rules() {
        let (mut session, _recorder) = session();
        finish_practice(&mut session);
        for _ in 0..3 {
            crash(&mut session);
        }
        assert!(session.start().is_err());
        session.replay().unwrap();
        assert_eq!(session.stage(), Stage::Rules);
        assert_eq!(session.attempts, AttemptState::new());
        session.start().unwrap();
        assert_eq!(session.stage(), Stage::Practice(1));
    }

    #[test]
    fn test_obstacles_survive_attempts() {
        let (mut session, _recorder) = session();
        let obstacles = session.state.obstacles.clone();
        session.start().unwrap();
        crash(&mut session);
        crash(&mut session);
        assert_eq!(session.state.obstacles, obstacles);
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut session, _recorder) = session();
        session.start().unwrap();
        session.pause();
        assert!(session.is_paused());
        assert_eq!(session.tick(), SessionEvent::Idle);
        assert_eq!(session.state.time_ticks, 0);
        session.resume();
        assert_ne!(session.tick(), SessionEvent::Idle);
    }

    #[test]
    fn test_direction_during_attempt() {
        let (mut session, _recorder) = session();
        session.start().unwrap();
        assert_eq!(session.state.snake_len(), 3);
        assert!(!session.set_direction(Direction::Left));
        assert_eq!(session.state.direction, Direction::Right);
        assert!(session.set_direction(Direction::Up));
        assert_eq!(session.state.direction, Direction::Up);
    }

    #[test]
    fn test_end_attempt() {
        let (mut session, _recorder) = session();
        assert_eq!(session.end_attempt(), SessionEvent::Idle);
        session.start().unwrap();
        eat(&mut session);
        assert_eq!(
            session.end_attempt(),
            SessionEvent::AttemptFinished {
                score: 10,
                next: Stage::Practice(2)
            }
        );
    }
}
