//! Execution controller
//!
//! Owns the dataset, the step history and the lifecycle of a run:
//!
//! ```text
//! Idle --start--> Running --(completes | stop)--> Idle
//!   ^                |
//!   +-----reset------+
//! ```
//!
//! - [`command`]: the command set and its textual form
//! - [`state`]: the published [`ExecutionState`]
//!
//! # Modes
//!
//! In live mode `start` spawns an algorithm task that publishes each step and
//! sleeps between them, plus a timer task refreshing the elapsed time. In step
//! mode `start` runs the algorithm to completion at once, recording every
//! step, then shows step 0; `step_forward`/`step_backward` replay the history.
//!
//! Commands never fail. Anything that does not apply in the current state
//! is logged at debug level and ignored.

pub mod command;
mod run;
pub mod state;

pub use command::{Command, CommandError};
pub use state::ExecutionState;

use crate::algorithms::{self, Algorithm, Family};
use crate::config::Config;
use crate::snapshot::StepRecorder;
use crate::source::ArraySource;
use run::{millis, RecordingSink, RunHandle, StatePublisher};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub struct Controller {
    state: StatePublisher,
    recorder: StepRecorder,
    source: Arc<dyn ArraySource>,
    config: Config,
    run: Option<RunHandle>,
}

impl Controller {
    /// Create a controller seeded with the configured default dataset.
    ///
    /// Call [`Controller::load_new_array`] to replace it with one from the
    /// array source.
    pub fn new(config: Config, source: Arc<dyn ArraySource>) -> Self {
        let mut initial = ExecutionState::new(config.default_data.clone(), Algorithm::BubbleSort);
        initial.speed = config.speed.max(1);
        let (tx, _) = watch::channel(initial);

        Controller {
            state: Arc::new(tx),
            recorder: StepRecorder::new(config.history_limit_bytes),
            source,
            config,
            run: None,
        }
    }

    /// Latest published snapshot
    pub fn state(&self) -> ExecutionState {
        self.state.borrow().clone()
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<ExecutionState> {
        self.state.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recorded step-mode history of the last run
    pub fn history(&self) -> &StepRecorder {
        &self.recorder
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running
    }

    /// Dispatch one command
    pub async fn handle(&mut self, command: Command) {
        match command {
            Command::SelectAlgorithm(algorithm) => self.select_algorithm(algorithm),
            Command::SetTarget(target) => self.set_target(target),
            Command::Start => self.start().await,
            Command::Stop => self.stop().await,
            Command::Reset => self.reset().await,
            Command::ToggleStepMode => self.toggle_step_mode(),
            Command::StepForward => self.step_forward(),
            Command::StepBackward => self.step_backward(),
            Command::SetSpeed(speed) => self.set_speed(speed),
            Command::LoadNewArray => self.load_new_array().await,
            Command::SubmitArray(numbers) => self.submit_array(numbers).await,
        }
    }

    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        if self.is_running() {
            debug!(%algorithm, "algorithm change ignored while running");
            return;
        }

        let previous = self.state.borrow().selected_algorithm;
        if previous == algorithm {
            return;
        }

        // History of the old algorithm no longer matches the selection
        self.recorder.clear();
        self.state.send_modify(|s| {
            s.selected_algorithm = algorithm;
            s.clear_progress();
        });
        info!(%previous, %algorithm, "algorithm selected");
    }

    pub fn set_target(&mut self, target: Option<i32>) {
        if self.is_running() {
            debug!(?target, "target change ignored while running");
            return;
        }
        self.state.send_modify(|s| s.target_value = target);
    }

    pub fn set_speed(&mut self, speed: u32) {
        if speed == 0 {
            debug!("speed must be at least 1");
            return;
        }
        self.state.send_modify(|s| s.speed = speed);
    }

    /// Begin a run of the selected algorithm over the current dataset
    pub async fn start(&mut self) {
        let (algorithm, target, step_mode, running) = {
            let s = self.state.borrow();
            (s.selected_algorithm, s.target_value, s.is_step_mode, s.is_running)
        };

        if running {
            debug!("start ignored: a run is already active");
            return;
        }
        if algorithm.family() == Family::Search && target.is_none() {
            debug!(%algorithm, "start ignored: no target value");
            return;
        }

        // Leftover handles from a run that completed on its own
        self.stop().await;
        self.recorder.clear();

        if step_mode {
            self.run_recorded(algorithm, target).await;
        } else {
            self.state.send_modify(|s| s.begin_run());
            self.run = Some(RunHandle::spawn(
                self.state.clone(),
                algorithm,
                target,
                &self.config,
            ));
            info!(%algorithm, ?target, "live run started");
        }
    }

    /// Run to completion without pausing, then show the first recorded step
    async fn run_recorded(&mut self, algorithm: Algorithm, target: Option<i32>) {
        let started = Instant::now();
        let mut data = self.state.borrow().data.clone();
        self.state.send_modify(|s| s.begin_run());

        self.recorder.set_enabled(true);
        let mut sink = RecordingSink {
            recorder: &mut self.recorder,
            error: None,
        };
        let result = algorithms::execute(algorithm, &mut data, target, &mut sink).await;

        if let Some(e) = sink.error {
            warn!(error = %e, "step history truncated");
        }
        if let Err(e) = result {
            warn!(error = %e, "recorded run rejected");
        }

        let elapsed = millis(started.elapsed());
        let total = self.recorder.len();
        let first = self.recorder.at(0).ok().cloned();

        self.state.send_modify(|s| {
            s.is_running = false;
            s.elapsed_time_ms = elapsed;
            if let Some(step) = &first {
                s.apply_step(step);
            }
            s.set_cursor(0, total);
        });
        info!(%algorithm, steps = total, "recorded run ready");
    }

    /// Cancel the live run, keeping the last published moment on display
    pub async fn stop(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };

        let was_active = !run.signal.cancel();
        let started = run.started;
        run.join().await;

        let elapsed = millis(started.elapsed());
        let stopped = self.state.send_if_modified(|s| {
            if !s.is_running {
                return false;
            }
            s.is_running = false;
            s.highlighted_indices.clear();
            s.elapsed_time_ms = elapsed;
            true
        });

        if was_active && stopped {
            info!(elapsed_ms = elapsed, "live run stopped");
        }
    }

    /// Stop everything, replace the dataset and forget all progress
    pub async fn reset(&mut self) {
        self.stop().await;
        self.recorder.clear();

        let data = self.fetch_dataset().await;
        self.state.send_modify(|s| {
            s.data = data;
            s.target_value = None;
            s.is_running = false;
            s.clear_progress();
        });
        info!("reset");
    }

    /// Switch between live and step mode
    pub fn toggle_step_mode(&mut self) {
        if self.is_running() {
            debug!("mode toggle ignored while running");
            return;
        }

        self.recorder.clear();
        let mut step_mode = false;
        self.state.send_modify(|s| {
            s.is_step_mode = !s.is_step_mode;
            s.clear_step_counters();
            step_mode = s.is_step_mode;
        });
        self.recorder.set_enabled(step_mode);
        info!(step_mode, "mode toggled");
    }

    pub fn step_forward(&mut self) {
        let (index, total) = self.cursor();
        if total == 0 || index + 1 >= total {
            debug!(index, total, "already at the last step");
            return;
        }
        self.show_step(index + 1);
    }

    pub fn step_backward(&mut self) {
        let (index, total) = self.cursor();
        if total == 0 || index == 0 {
            debug!(index, total, "already at the first step");
            return;
        }
        self.show_step(index - 1);
    }

    fn cursor(&self) -> (usize, usize) {
        let s = self.state.borrow();
        if !s.is_step_mode || s.is_running {
            return (0, 0);
        }
        (s.current_step_index, s.total_steps)
    }

    fn show_step(&mut self, index: usize) {
        let step = match self.recorder.at(index) {
            Ok(step) => step.clone(),
            Err(e) => {
                debug!(error = %e, "step navigation ignored");
                return;
            }
        };

        let total = self.recorder.len();
        self.state.send_modify(|s| {
            s.apply_step(&step);
            s.set_cursor(index, total);
        });
        debug!(index, total, "showing step");
    }

    /// Replace the dataset from the array source, keeping the selection
    pub async fn load_new_array(&mut self) {
        if self.is_running() {
            debug!("load ignored while running");
            return;
        }

        self.recorder.clear();
        let data = self.fetch_dataset().await;
        self.state.send_modify(|s| {
            s.data = data;
            s.clear_progress();
        });
    }

    /// Store an array in the array source. Failures are only logged.
    pub async fn submit_array(&mut self, numbers: Vec<i32>) {
        if numbers.is_empty() {
            debug!("refusing to submit an empty array");
            return;
        }

        let len = numbers.len();
        match self.source.submit_array(numbers).await {
            Ok(()) => info!(len, "array submitted"),
            Err(e) => warn!(error = %e, "array submission failed"),
        }
    }

    /// Wait for the current live run to finish on its own
    pub async fn wait(&mut self) {
        if let Some(run) = self.run.take() {
            run.join().await;
        }
    }

    /// Cancel any live run and wait for its tasks to exit
    pub async fn shutdown(&mut self) {
        self.stop().await;
    }

    async fn fetch_dataset(&self) -> Vec<i32> {
        match self.source.fetch_random_array().await {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => {
                warn!("array source returned an empty array, using default");
                self.config.default_data.clone()
            }
            Err(e) => {
                warn!(error = %e, "array source failed, using default");
                self.config.default_data.clone()
            }
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(run) = &self.run {
            if !run.is_finished() {
                run.signal.cancel();
            }
        }
    }
}
