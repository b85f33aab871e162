//! Scripted generation demo.
//!
//! A run walks a fixed, ordered list of steps. For step `i` of `n`
//! (1-indexed) the snapshot shows that step's description and
//! `i / n * 100` progress, then the run waits out the step's duration before
//! moving on. After the last step the phase becomes `complete`.
//!
//! Only one run is live at a time. `reset` returns to `idle` immediately and
//! bumps the run epoch under the same lock every mutation takes, so a stale
//! run can never write to the snapshot after it has been reset.

use crate::timer::{ScaledTimer, Timer, TokioTimer};
use crate::types::DemoPhase;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// DemoStep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoStep {
    pub index: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub duration_ms: u64,
}

impl DemoStep {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// The STORYTELLER (singer-songwriter) generation walkthrough.
pub const STORYTELLER_STEPS: [DemoStep; 5] = [
    DemoStep {
        index: 1,
        title: "Data Harvesting",
        description: "Scanning 50,000+ Singer-Songwriter tracks across platforms...",
        duration_ms: 1500,
    },
    DemoStep {
        index: 2,
        title: "AI Pattern Recognition",
        description: "Processing indie folk trends and emotional patterns...",
        duration_ms: 2000,
    },
    DemoStep {
        index: 3,
        title: "Content Generation",
        description: "Generating authentic storytelling content...",
        duration_ms: 1800,
    },
    DemoStep {
        index: 4,
        title: "Quality Assurance",
        description: "Cross-referencing with industry databases...",
        duration_ms: 1200,
    },
    DemoStep {
        index: 5,
        title: "Editorial Review",
        description: "Final review complete! Newsletter ready.",
        duration_ms: 1000,
    },
];

pub fn total_duration(steps: &[DemoStep]) -> Duration {
    steps.iter().map(DemoStep::duration).sum()
}

// ---------------------------------------------------------------------------
// DemoSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoSnapshot {
    pub phase: DemoPhase,
    /// Percentage in `[0, 100]`. Never decreases within a run.
    pub progress: f64,
    /// 1-indexed position of the active step, `None` before the first step.
    pub step: Option<usize>,
    pub total_steps: usize,
    pub title: String,
    pub description: String,
    /// Incremented on every start and reset.
    pub run: u64,
}

impl DemoSnapshot {
    fn idle(total_steps: usize, run: u64) -> Self {
        Self {
            phase: DemoPhase::Idle,
            progress: 0.0,
            step: None,
            total_steps,
            title: String::new(),
            description: String::new(),
            run,
        }
    }
}

pub fn step_progress(step: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (step * 100) as f64 / total as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

// ---------------------------------------------------------------------------
// DemoSequencer
// ---------------------------------------------------------------------------

struct Control {
    epoch: u64,
    cancel: CancellationToken,
}

struct Inner<T> {
    steps: Vec<DemoStep>,
    timer: T,
    control: Mutex<Control>,
    state: watch::Sender<DemoSnapshot>,
}

/// Owns the demo run state. Cheap to clone; clones share the same run.
pub struct DemoSequencer<T: Timer = TokioTimer> {
    inner: Arc<Inner<T>>,
}

impl<T: Timer> Clone for DemoSequencer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl DemoSequencer<TokioTimer> {
    pub fn storyteller() -> Self {
        Self::new(STORYTELLER_STEPS.to_vec(), TokioTimer)
    }
}

impl DemoSequencer<ScaledTimer<TokioTimer>> {
    /// Storyteller script with every step duration multiplied by `speed`.
    pub fn storyteller_scaled(speed: f64) -> Self {
        Self::new(STORYTELLER_STEPS.to_vec(), ScaledTimer::new(TokioTimer, speed))
    }
}

impl<T: Timer> DemoSequencer<T> {
    pub fn new(steps: Vec<DemoStep>, timer: T) -> Self {
        let (state, _) = watch::channel(DemoSnapshot::idle(steps.len(), 0));
        Self {
            inner: Arc::new(Inner {
                steps,
                timer,
                control: Mutex::new(Control {
                    epoch: 0,
                    cancel: CancellationToken::new(),
                }),
                state,
            }),
        }
    }

    pub fn steps(&self) -> &[DemoStep] {
        &self.inner.steps
    }

    pub fn snapshot(&self) -> DemoSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every committed state change.
    pub fn subscribe(&self) -> watch::Receiver<DemoSnapshot> {
        self.inner.state.subscribe()
    }

    /// Begin a run on the current tokio runtime. Only an `idle` sequencer can
    /// start; otherwise this returns `None` and leaves the state untouched.
    pub fn start(&self) -> Option<JoinHandle<RunOutcome>> {
        let (epoch, cancel) = {
            let mut control = self.control();
            let phase = self.inner.state.borrow().phase;
            if phase != DemoPhase::Idle {
                tracing::debug!(%phase, "demo not idle; start ignored");
                return None;
            }
            control.epoch += 1;
            control.cancel = CancellationToken::new();
            let epoch = control.epoch;
            let total = self.inner.steps.len();
            self.inner.state.send_replace(DemoSnapshot {
                phase: DemoPhase::Running,
                ..DemoSnapshot::idle(total, epoch)
            });
            (epoch, control.cancel.clone())
        };

        tracing::info!(run = epoch, steps = self.inner.steps.len(), "demo started");
        let this = self.clone();
        Some(tokio::spawn(async move { this.drive(epoch, cancel).await }))
    }

    /// Return to `idle`, aborting any pending step wait. Safe to call in any
    /// phase.
    pub fn reset(&self) {
        let mut control = self.control();
        control.epoch += 1;
        control.cancel.cancel();
        let previous = self.inner.state.borrow().phase;
        self.inner
            .state
            .send_replace(DemoSnapshot::idle(self.inner.steps.len(), control.epoch));
        tracing::info!(run = control.epoch, from = %previous, "demo reset");
    }

    async fn drive(&self, epoch: u64, cancel: CancellationToken) -> RunOutcome {
        let total = self.inner.steps.len();
        for (i, step) in self.inner.steps.iter().enumerate() {
            let position = i + 1;
            let applied = self.commit(epoch, |s| {
                s.step = Some(position);
                s.title = step.title.to_string();
                s.description = step.description.to_string();
                s.progress = step_progress(position, total);
            });
            if !applied {
                return RunOutcome::Cancelled;
            }
            tracing::debug!(run = epoch, step = position, title = step.title, "demo step");

            tokio::select! {
                _ = cancel.cancelled() => return RunOutcome::Cancelled,
                _ = self.inner.timer.sleep(step.duration()) => {}
            }
        }

        let applied = self.commit(epoch, |s| {
            s.phase = DemoPhase::Complete;
            s.progress = 100.0;
        });
        if !applied {
            return RunOutcome::Cancelled;
        }
        tracing::info!(run = epoch, "demo complete");
        RunOutcome::Completed
    }

    /// Apply `f` only if `epoch` is still the live run.
    fn commit(&self, epoch: u64, f: impl FnOnce(&mut DemoSnapshot)) -> bool {
        let control = self.control();
        if control.epoch != epoch || control.cancel.is_cancelled() {
            return false;
        }
        self.inner.state.send_modify(f);
        true
    }

    fn control(&self) -> MutexGuard<'_, Control> {
        // The guarded data is two plain values; a poisoned lock still holds
        // a consistent epoch.
        self.inner
            .control
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn even_steps(n: u32, ms: u64) -> Vec<DemoStep> {
        (1..=n)
            .map(|index| DemoStep {
                index,
                title: "step",
                description: "working",
                duration_ms: ms,
            })
            .collect()
    }

    #[test]
    fn new_sequencer_is_idle() {
        let seq = DemoSequencer::new(even_steps(3, 10), TokioTimer);
        let snap = seq.snapshot();
        assert_eq!(snap.phase, DemoPhase::Idle);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.total_steps, 3);
    }

    #[test]
    fn storyteller_script_runs_seven_and_a_half_seconds() {
        assert_eq!(STORYTELLER_STEPS.len(), 5);
        assert_eq!(total_duration(&STORYTELLER_STEPS), Duration::from_millis(7500));
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_reports_each_boundary() {
        let seq = DemoSequencer::new(even_steps(5, 100), TokioTimer);
        let mut rx = seq.subscribe();
        let started = Instant::now();
        let handle = seq.start().unwrap();

        let mut readings = Vec::new();
        let mut completed_at = None;
        while rx.changed().await.is_ok() {
            let snap = rx.borrow_and_update().clone();
            match snap.phase {
                DemoPhase::Running => {
                    if snap.step.is_some() {
                        readings.push(snap.progress);
                    }
                }
                DemoPhase::Complete => {
                    completed_at = Some(started.elapsed());
                    assert_eq!(snap.progress, 100.0);
                    break;
                }
                DemoPhase::Idle => panic!("unexpected reset"),
            }
        }

        assert_eq!(readings, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(completed_at, Some(Duration::from_millis(500)));
        assert_eq!(handle.await.unwrap(), RunOutcome::Completed);
        assert_eq!(seq.snapshot().phase, DemoPhase::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn not_complete_before_final_boundary() {
        let seq = DemoSequencer::new(even_steps(5, 100), TokioTimer);
        seq.start().unwrap();

        tokio::time::sleep(Duration::from_millis(450)).await;
        let snap = seq.snapshot();
        assert_eq!(snap.phase, DemoPhase::Running);
        assert_eq!(snap.progress, 100.0);
        assert_eq!(snap.step, Some(5));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(seq.snapshot().phase, DemoPhase::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_never_decreases() {
        let seq = DemoSequencer::new(STORYTELLER_STEPS.to_vec(), TokioTimer);
        let mut rx = seq.subscribe();
        seq.start().unwrap();

        let mut last = 0.0;
        while rx.changed().await.is_ok() {
            let snap = rx.borrow_and_update().clone();
            assert!(snap.progress >= last, "{} < {}", snap.progress, last);
            last = snap.progress;
            if snap.phase == DemoPhase::Complete {
                break;
            }
        }
        assert_eq!(last, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_is_noop() {
        let seq = DemoSequencer::new(even_steps(5, 100), TokioTimer);
        seq.start().unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let before = seq.snapshot();
        assert!(seq.start().is_none());
        assert_eq!(seq.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_run_suppresses_stale_updates() {
        let seq = DemoSequencer::new(even_steps(5, 100), TokioTimer);
        let handle = seq.start().unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(seq.snapshot().step, Some(2));

        seq.reset();
        let mut rx = seq.subscribe();
        let after_reset = rx.borrow_and_update().clone();
        assert_eq!(after_reset.phase, DemoPhase::Idle);
        assert_eq!(after_reset.progress, 0.0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(seq.snapshot(), after_reset);
        assert_eq!(handle.await.unwrap(), RunOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_reset_runs_to_completion() {
        let seq = DemoSequencer::new(even_steps(2, 100), TokioTimer);
        seq.start().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        seq.reset();

        let handle = seq.start().unwrap();
        assert_eq!(handle.await.unwrap(), RunOutcome::Completed);
        let snap = seq.snapshot();
        assert_eq!(snap.phase, DemoPhase::Complete);
        assert_eq!(snap.progress, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_after_complete_returns_to_idle() {
        let seq = DemoSequencer::new(even_steps(1, 10), TokioTimer);
        seq.start().unwrap().await.unwrap();
        assert_eq!(seq.snapshot().phase, DemoPhase::Complete);
        assert!(seq.start().is_none(), "complete must be reset before rerun");

        seq.reset();
        assert_eq!(seq.snapshot().phase, DemoPhase::Idle);
        assert!(seq.start().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn huge_speed_waits_and_still_resets() {
        let seq = DemoSequencer::storyteller_scaled(1e300);
        let handle = seq.start().unwrap();
        tokio::time::sleep(Duration::from_secs(3600)).await;
        let snap = seq.snapshot();
        assert_eq!(snap.phase, DemoPhase::Running);
        assert_eq!(snap.step, Some(1));

        seq.reset();
        assert_eq!(handle.await.unwrap(), RunOutcome::Cancelled);
        assert_eq!(seq.snapshot().phase, DemoPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_script_completes_at_full_progress() {
        let seq = DemoSequencer::new(Vec::new(), TokioTimer);
        assert_eq!(seq.start().unwrap().await.unwrap(), RunOutcome::Completed);
        let snap = seq.snapshot();
        assert_eq!(snap.phase, DemoPhase::Complete);
        assert_eq!(snap.progress, 100.0);
    }

    #[test]
    fn step_progress_fractions() {
        assert_eq!(step_progress(1, 5), 20.0);
        assert_eq!(step_progress(5, 5), 100.0);
        assert_eq!(step_progress(0, 0), 100.0);
    }
}
