//! Live-mode tasks and the sinks that connect the engine to the controller

use super::ExecutionState;
use crate::algorithms::{self, Algorithm, Outcome, StepSink};
use crate::config::Config;
use crate::snapshot::{HistoryError, Step, StepRecorder};
use async_trait::async_trait;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

pub(crate) type StatePublisher = Arc<watch::Sender<ExecutionState>>;

/// Shared cooperative cancellation flag for one run
#[derive(Debug, Clone)]
pub(crate) struct RunSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl RunSignal {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(false);
        RunSignal { tx: Arc::new(tx) }
    }

    /// Raise the flag. Returns `true` if it was already raised.
    pub(crate) fn cancel(&self) -> bool {
        self.tx.send_replace(true)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the flag is raised
    pub(crate) async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleep for `duration`, waking early on cancellation
    pub(crate) async fn sleep(&self, duration: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.cancelled() => {}
        }
    }
}

pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// The algorithm and timer tasks of one live run
#[derive(Debug)]
pub(crate) struct RunHandle {
    pub(crate) signal: RunSignal,
    pub(crate) started: Instant,
    algorithm: JoinHandle<()>,
    timer: JoinHandle<()>,
}

impl RunHandle {
    /// Spawn both tasks for a live run of `algorithm`
    pub(crate) fn spawn(
        state: StatePublisher,
        algorithm: Algorithm,
        target: Option<i32>,
        config: &Config,
    ) -> Self {
        let signal = RunSignal::new();
        let started = Instant::now();

        let timer = tokio::spawn(tick_elapsed(
            state.clone(),
            signal.clone(),
            started,
            config.timer_tick(),
        ));

        let sink = LiveSink {
            state,
            signal: signal.clone(),
            config: config.clone(),
            terminal: None,
        };
        let algorithm = tokio::spawn(live_run(sink, algorithm, target, started));

        RunHandle {
            signal,
            started,
            algorithm,
            timer,
        }
    }

    /// Wait for both tasks to exit
    pub(crate) async fn join(self) {
        if let Err(e) = self.algorithm.await {
            warn!(error = %e, "algorithm task ended abnormally");
        }
        if let Err(e) = self.timer.await {
            warn!(error = %e, "timer task ended abnormally");
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.algorithm.is_finished() && self.timer.is_finished()
    }
}

/// Refresh `elapsed_time_ms` every tick until the run ends
async fn tick_elapsed(state: StatePublisher, signal: RunSignal, started: Instant, tick: Duration) {
    let mut interval = tokio::time::interval(tick.max(Duration::from_millis(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = signal.cancelled() => break,
        }

        // Only the timer writes this field, and only while the run is live
        let still_running = state.send_if_modified(|s| {
            if !s.is_running {
                return false;
            }
            s.elapsed_time_ms = millis(started.elapsed());
            true
        });

        if !still_running {
            break;
        }
    }
}

async fn live_run(mut sink: LiveSink, algorithm: Algorithm, target: Option<i32>, started: Instant) {
    let mut data = sink.state.borrow().data.clone();
    let result = algorithms::execute(algorithm, &mut data, target, &mut sink).await;

    let outcome = match result {
        Ok(Outcome::Cancelled) => {
            debug!(%algorithm, "live run cancelled");
            return;
        }
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "live run rejected");
            Outcome::Cancelled
        }
    };

    // A stop that raced past the last step owns the final state
    if sink.signal.cancel() {
        return;
    }

    let terminal = sink.terminal.take();
    let elapsed = millis(started.elapsed());
    sink.state.send_modify(|s| {
        if let Some(step) = &terminal {
            s.apply_step(step);
        }
        s.finish(outcome, elapsed);
    });
    info!(%algorithm, ?outcome, elapsed_ms = elapsed, "live run completed");
}

/// Publishes each step and paces the run. The terminal step is held back
/// and committed together with the outcome.
pub(crate) struct LiveSink {
    state: StatePublisher,
    signal: RunSignal,
    config: Config,
    terminal: Option<Step>,
}

#[async_trait]
impl StepSink for LiveSink {
    async fn emit(&mut self, step: Step) -> ControlFlow<()> {
        if self.signal.is_cancelled() {
            return ControlFlow::Break(());
        }

        trace!(message = %step.message, "live step");
        let speed = self.state.borrow().speed;
        self.state.send_modify(|s| s.apply_step(&step));

        self.signal.sleep(self.config.step_delay(speed)).await;

        if self.signal.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    async fn conclude(&mut self, step: Step) -> ControlFlow<()> {
        if self.signal.is_cancelled() {
            return ControlFlow::Break(());
        }
        self.terminal = Some(step);
        ControlFlow::Continue(())
    }
}

/// Appends each step to the recorder without pausing
pub(crate) struct RecordingSink<'a> {
    pub(crate) recorder: &'a mut StepRecorder,
    pub(crate) error: Option<HistoryError>,
}

#[async_trait]
impl<'a> StepSink for RecordingSink<'a> {
    async fn emit(&mut self, step: Step) -> ControlFlow<()> {
        match self.recorder.append(step) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                self.error = Some(e);
                ControlFlow::Break(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_cancel_reports_previous() {
        let signal = RunSignal::new();
        assert!(!signal.is_cancelled());
        assert!(!signal.cancel());
        assert!(signal.cancel());
        assert!(signal.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_wakes_on_cancel() {
        let signal = RunSignal::new();
        let sleeper = signal.clone();
        let started = Instant::now();

        let task = tokio::spawn(async move { sleeper.sleep(Duration::from_secs(60)).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.cancel();
        task.await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_recording_sink_stops_at_limit() {
        let step = Step::search([0], "x", None);
        let mut recorder = StepRecorder::new(step.estimated_size());
        recorder.set_enabled(true);
        let mut sink = RecordingSink {
            recorder: &mut recorder,
            error: None,
        };

        assert!(sink.emit(step.clone()).await.is_continue());
        assert!(sink.emit(step).await.is_break());
        assert!(matches!(sink.error, Some(HistoryError::LimitExceeded { .. })));
    }
}
