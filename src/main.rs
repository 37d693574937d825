//! Times Table Sprint entry point
//!
//! The browser build is driven from JS through `times_table_sprint::web`.
//! Natively this plays one headless round with a simulated player so the
//! round lifecycle and best-score storage can be exercised end to end.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Times Table Sprint (native) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use times_table_sprint::consts::QUESTION_TIERS;
    use times_table_sprint::driver::TickDriver;
    use times_table_sprint::persistence::FileStore;
    use times_table_sprint::quiz::{QuizEvent, QuizPhase, RoundController};

    /// Directory for best scores/settings; override with TIMES_TABLE_SPRINT_DATA
    const DATA_DIR_ENV: &str = "TIMES_TABLE_SPRINT_DATA";
    const DEFAULT_DATA_DIR: &str = ".times-table-sprint";

    /// Simulated frame time (60 fps)
    const FRAME_DT: f64 = 1.0 / 60.0;
    /// Frames the simulated player spends on each equation
    const FRAMES_PER_ANSWER: u32 = 45;
    /// The simulated player gets every seventh answer wrong
    const MISTAKE_EVERY: usize = 7;

    pub fn run() {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut controller = RoundController::new(seed, FileStore::new(&data_dir));
        let mut driver = TickDriver::new();

        let count = controller
            .settings()
            .last_question_count
            .unwrap_or(QUESTION_TIERS[0]);
        if !controller.select_question_count(count) {
            log::error!("Could not start a round with {} questions", count);
            return;
        }

        let mut frames_on_question = 0;
        while controller.phase() != QuizPhase::Scoring {
            driver.update(&mut controller, FRAME_DT);

            if controller.phase() == QuizPhase::Playing {
                controller.begin_timer();
                frames_on_question += 1;
                if frames_on_question >= FRAMES_PER_ANSWER {
                    frames_on_question = 0;
                    let position = controller.current_position();
                    let truth = controller
                        .round()
                        .and_then(|r| r.equations().get(position))
                        .map(|e| e.is_true())
                        .unwrap_or(false);
                    let mistake = (position + 1) % MISTAKE_EVERY == 0;
                    controller.submit_guess(truth != mistake);
                }
            }

            for event in controller.drain_events() {
                report(&event);
            }
        }
        controller.flush();

        let best: Vec<String> = controller
            .best_scores()
            .scores()
            .records()
            .iter()
            .map(|r| format!("{}: {}", r.question_count, r.label()))
            .collect();
        println!("Best times: {}", best.join(", "));
        if controller.best_scores().persist_degraded() {
            println!("Warning: best times could not be saved to {}", data_dir);
        }
    }

    fn report(event: &QuizEvent) {
        match event {
            QuizEvent::RoundReady { question_count, .. } => {
                println!("{} questions, get ready", question_count)
            }
            QuizEvent::CountdownStage { label, .. } => println!("{}", label),
            QuizEvent::Advanced { position, .. } => log::debug!("Answered {}", position),
            QuizEvent::RoundComplete(result) => {
                println!("{}", result.base_time_label());
                println!("{}", result.penalty_label());
                println!("Final: {}", result.final_time_label());
            }
            QuizEvent::NewBestTime { time, .. } => println!("New best time: {:.1}s", time),
            _ => {}
        }
    }
}
