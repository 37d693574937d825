//! Round lifecycle state machine
//!
//! Idle -> Countdown -> Playing -> Scoring -> Idle. Every transition is
//! triggered by a named input (`select_question_count`, `tick`,
//! `begin_timer`, `submit_guess`, `play_again`); the view drains the
//! resulting events and renders them.
//!
//! Inputs never touch storage. Best-score and settings changes are queued and
//! written by `flush`, which the event loop schedules as its own step.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::round::{GuessLog, Round, RoundBuilder};
use super::score::{ScoreEvaluator, ScoreResult};
use super::timer::PlayTimer;
use crate::best_scores::BestScoreStore;
use crate::consts::*;
use crate::is_supported_tier;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;

/// Current phase of the round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    /// Splash page, waiting for a question count
    Idle,
    /// "3, 2, 1, GO!" lead-in
    Countdown,
    /// Answering equations
    Playing,
    /// Score page
    Scoring,
}

/// Notifications for the view layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum QuizEvent {
    /// A round was built; equation texts in display order
    RoundReady {
        question_count: u32,
        equations: Vec<String>,
    },
    /// Countdown text changed
    CountdownStage { stage: usize, label: &'static str },
    /// Equations are on screen and accept guesses
    PlayingStarted,
    /// Play time started counting
    TimerStarted,
    /// A guess was recorded; `position` is the number answered so far
    Advanced { position: usize, scroll_offset: u32 },
    /// All equations answered
    RoundComplete(ScoreResult),
    /// The round beat (or set) the tier's best time
    NewBestTime { question_count: u32, time: f64 },
    /// The play-again control may be shown
    PlayAgainAvailable,
    /// Back on the splash page
    ReturnedToIdle,
}

/// Owns all round-scoped state plus the best-score table
pub struct RoundController<S: KeyValueStore> {
    phase: QuizPhase,
    builder: RoundBuilder<Pcg32>,
    question_count: u32,
    round: Option<Round>,
    guesses: GuessLog,
    timer: PlayTimer,
    /// One-shot guard: the timer starts once per round
    timer_started: bool,
    countdown_stage: usize,
    /// Ticks spent in the current countdown stage or on the score page
    phase_ticks: u32,
    scroll_offset: u32,
    result: Option<ScoreResult>,
    play_again_available: bool,
    best_scores: BestScoreStore<S>,
    settings: Settings,
    settings_dirty: bool,
    events: Vec<QuizEvent>,
}

impl<S: KeyValueStore> RoundController<S> {
    /// Create a controller; best scores and settings are loaded from `storage`
    pub fn new(seed: u64, storage: S) -> Self {
        let settings = Settings::load(&storage);
        let best_scores = BestScoreStore::load(storage);
        log::info!("Quiz initialized with seed: {}", seed);

        Self {
            phase: QuizPhase::Idle,
            builder: RoundBuilder::new(Pcg32::seed_from_u64(seed)),
            question_count: 0,
            round: None,
            guesses: GuessLog::new(),
            timer: PlayTimer::new(),
            timer_started: false,
            countdown_stage: 0,
            phase_ticks: 0,
            scroll_offset: 0,
            result: None,
            play_again_available: false,
            best_scores,
            settings,
            settings_dirty: false,
            events: Vec::new(),
        }
    }

    /// Pick a question count and start the countdown.
    ///
    /// Returns false (and changes nothing) unless idle with a supported tier.
    pub fn select_question_count(&mut self, count: u32) -> bool {
        if self.phase != QuizPhase::Idle {
            log::debug!("Ignoring question count {} in {:?}", count, self.phase);
            return false;
        }
        if !is_supported_tier(count) {
            log::debug!("Ignoring unsupported question count {}", count);
            return false;
        }

        let round = match self.builder.build(count as usize) {
            Ok(round) => round,
            Err(e) => {
                log::warn!("Could not build round: {}", e);
                return false;
            }
        };

        if self.settings.remember_question_count(count) {
            self.settings_dirty = true;
        }

        log::info!("Starting round with {} questions", count);
        self.events.push(QuizEvent::RoundReady {
            question_count: count,
            equations: round.equations().iter().map(|e| e.text().to_string()).collect(),
        });
        self.question_count = count;
        self.round = Some(round);
        self.guesses.clear();
        self.timer.reset();
        self.timer_started = false;
        self.scroll_offset = 0;

        self.phase = QuizPhase::Countdown;
        self.countdown_stage = 0;
        self.phase_ticks = 0;
        self.emit_countdown_stage();
        true
    }

    /// Advance one 100 ms tick
    pub fn tick(&mut self) {
        match self.phase {
            QuizPhase::Idle => {}
            QuizPhase::Countdown => {
                self.phase_ticks += 1;
                if self.phase_ticks < COUNTDOWN_STAGE_TICKS {
                    return;
                }
                self.phase_ticks = 0;
                self.countdown_stage += 1;
                if self.countdown_stage < COUNTDOWN_STAGES.len() {
                    self.emit_countdown_stage();
                } else {
                    self.enter_playing();
                }
            }
            QuizPhase::Playing => {
                self.timer.tick();
            }
            QuizPhase::Scoring => {
                if self.play_again_available {
                    return;
                }
                self.phase_ticks += 1;
                if self.phase_ticks >= PLAY_AGAIN_DELAY_TICKS {
                    self.play_again_available = true;
                    self.events.push(QuizEvent::PlayAgainAvailable);
                }
            }
        }
    }

    /// First tap on the game page starts the clock. Later calls are no-ops.
    pub fn begin_timer(&mut self) -> bool {
        if self.phase != QuizPhase::Playing || self.timer_started {
            return false;
        }
        self.timer_started = true;
        self.timer.start();
        self.events.push(QuizEvent::TimerStarted);
        true
    }

    /// Record a guess for the current equation.
    ///
    /// Rejected unless playing with equations left to answer.
    pub fn submit_guess(&mut self, is_true: bool) -> bool {
        if self.phase != QuizPhase::Playing {
            log::debug!("Ignoring guess in {:?}", self.phase);
            return false;
        }
        let Some(total) = self.round.as_ref().map(Round::question_count) else {
            return false;
        };
        if self.guesses.len() >= total {
            return false;
        }

        self.begin_timer();
        self.guesses.push(is_true);
        self.scroll_offset += SCROLL_STEP_PX;
        self.events.push(QuizEvent::Advanced {
            position: self.guesses.len(),
            scroll_offset: self.scroll_offset,
        });

        if self.guesses.len() == total {
            self.finish_round();
        }
        true
    }

    /// Leave the score page and return to question selection
    pub fn play_again(&mut self) -> bool {
        if self.phase != QuizPhase::Scoring {
            return false;
        }
        self.round = None;
        self.guesses.clear();
        self.timer.reset();
        self.timer_started = false;
        self.scroll_offset = 0;
        self.result = None;
        self.play_again_available = false;
        self.phase_ticks = 0;
        self.question_count = 0;
        self.phase = QuizPhase::Idle;
        self.events.push(QuizEvent::ReturnedToIdle);
        true
    }

    /// Write queued best-score and settings changes to storage.
    ///
    /// Returns whether any write was attempted. Failed writes stay queued.
    pub fn flush(&mut self) -> bool {
        let mut wrote = false;
        if self.settings_dirty {
            wrote = true;
            match self.settings.save(self.best_scores.storage_mut()) {
                Ok(()) => self.settings_dirty = false,
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
        wrote |= self.best_scores.flush();
        wrote
    }

    /// Changes waiting for `flush`
    pub fn has_pending_writes(&self) -> bool {
        self.settings_dirty || self.best_scores.has_pending_writes()
    }

    fn emit_countdown_stage(&mut self) {
        self.events.push(QuizEvent::CountdownStage {
            stage: self.countdown_stage,
            label: COUNTDOWN_STAGES[self.countdown_stage],
        });
    }

    fn enter_playing(&mut self) {
        self.phase = QuizPhase::Playing;
        self.phase_ticks = 0;
        self.events.push(QuizEvent::PlayingStarted);
    }

    fn finish_round(&mut self) {
        // Stop before anything else so no late tick lands on a finished round
        self.timer.stop();
        self.phase = QuizPhase::Scoring;
        self.phase_ticks = 0;
        self.play_again_available = false;

        let Some(round) = self.round.as_ref() else {
            return;
        };
        let result = match ScoreEvaluator::evaluate(round, &self.guesses, self.timer.elapsed_seconds())
        {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Scoring failed: {}", e);
                return;
            }
        };

        log::info!(
            "Round complete: base {:.1}s + penalty {:.1}s = {:.1}s ({} wrong)",
            result.base_play_time,
            result.penalty_time,
            result.final_time,
            result.wrong_count
        );
        self.result = Some(result);
        self.events.push(QuizEvent::RoundComplete(result));

        if self.best_scores.record_if_better(self.question_count, result.final_time) {
            let time = self
                .best_scores
                .best_time(self.question_count)
                .unwrap_or(result.final_time);
            self.events.push(QuizEvent::NewBestTime {
                question_count: self.question_count,
                time,
            });
        }
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn guesses(&self) -> &GuessLog {
        &self.guesses
    }

    /// Index of the equation awaiting an answer
    pub fn current_position(&self) -> usize {
        self.guesses.len()
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Countdown text while counting down
    pub fn countdown_label(&self) -> Option<&'static str> {
        (self.phase == QuizPhase::Countdown).then(|| COUNTDOWN_STAGES[self.countdown_stage])
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.timer.elapsed_seconds()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    pub fn play_again_available(&self) -> bool {
        self.play_again_available
    }

    pub fn best_scores(&self) -> &BestScoreStore<S> {
        &self.best_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage_mut(&mut self) -> &mut S {
        self.best_scores.storage_mut()
    }
}
