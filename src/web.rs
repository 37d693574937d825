//! Browser bindings
//!
//! The page owns the DOM and the `setInterval` tick source; it calls into
//! `WebQuiz` for every input and renders the drained events.

use wasm_bindgen::prelude::*;

use crate::driver::TickDriver;
use crate::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
use crate::quiz::{QuizEvent, RoundController};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Times Table Sprint starting...");
}

fn random_seed() -> u64 {
    getrandom::u64().unwrap_or_else(|_| (js_sys::Math::random() * u64::MAX as f64) as u64)
}

fn open_storage() -> Box<dyn KeyValueStore> {
    match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{} - best times will not be saved", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// Quiz instance handed to the page
#[wasm_bindgen]
pub struct WebQuiz {
    controller: RoundController<Box<dyn KeyValueStore>>,
    driver: TickDriver,
}

#[wasm_bindgen]
impl WebQuiz {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebQuiz {
        WebQuiz {
            controller: RoundController::new(random_seed(), open_storage()),
            driver: TickDriver::new(),
        }
    }

    #[wasm_bindgen(js_name = selectQuestionCount)]
    pub fn select_question_count(&mut self, count: u32) -> bool {
        self.controller.select_question_count(count)
    }

    #[wasm_bindgen(js_name = beginTimer)]
    pub fn begin_timer(&mut self) -> bool {
        self.controller.begin_timer()
    }

    #[wasm_bindgen(js_name = submitGuess)]
    pub fn submit_guess(&mut self, is_true: bool) -> bool {
        self.controller.submit_guess(is_true)
    }

    #[wasm_bindgen(js_name = playAgain)]
    pub fn play_again(&mut self) -> bool {
        self.controller.play_again()
    }

    /// One 100 ms tick (for `setInterval(quiz.tick, 100)`)
    pub fn tick(&mut self) {
        self.controller.tick();
    }

    /// Variable frame time in milliseconds (for `requestAnimationFrame` loops).
    /// Queued writes are flushed after the ticks run.
    pub fn update(&mut self, dt_ms: f64) -> u32 {
        self.driver.update(&mut self.controller, dt_ms / 1000.0)
    }

    /// Write queued best times and settings; schedule with `setTimeout(.., 0)`
    /// after input handlers when driving with `tick`
    pub fn flush(&mut self) -> bool {
        self.controller.flush()
    }

    /// True when best times could not be saved and live only in this tab
    #[wasm_bindgen(js_name = persistDegraded)]
    pub fn persist_degraded(&self) -> bool {
        self.controller.best_scores().persist_degraded()
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        let events: Vec<QuizEvent> = self.controller.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to serialize events: {}", e);
            "[]".to_string()
        })
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.controller.phase())
    }

    #[wasm_bindgen(js_name = countdownLabel)]
    pub fn countdown_label(&self) -> Option<String> {
        self.controller.countdown_label().map(str::to_string)
    }

    #[wasm_bindgen(js_name = equationTexts)]
    pub fn equation_texts(&self) -> Vec<String> {
        self.controller
            .round()
            .map(|r| r.equations().iter().map(|e| e.text().to_string()).collect())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = currentPosition)]
    pub fn current_position(&self) -> usize {
        self.controller.current_position()
    }

    #[wasm_bindgen(js_name = scrollOffset)]
    pub fn scroll_offset(&self) -> u32 {
        self.controller.scroll_offset()
    }

    /// "5.0s"-style labels in tier order, for the splash page
    #[wasm_bindgen(js_name = bestScoreLabels)]
    pub fn best_score_labels(&self) -> Vec<String> {
        self.controller.best_scores().scores().labels()
    }

    #[wasm_bindgen(js_name = lastQuestionCount)]
    pub fn last_question_count(&self) -> Option<u32> {
        self.controller.settings().last_question_count
    }
}

impl Default for WebQuiz {
    fn default() -> Self {
        Self::new()
    }
}
