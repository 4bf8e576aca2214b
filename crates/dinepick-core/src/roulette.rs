//! Roulette animation
//!
//! [`RouletteMachine`] is the clock-free state machine
//! (Idle -> Spinning -> Settling -> Stopped). [`RouletteWheel`] drives it on
//! tokio timers, one cancellable task per spin.

use dinepick_api::Restaurant;
use dinepick_config::RouletteSettings;
use dinepick_util::SpinId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info};

/// Roulette lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouletteState {
    Idle,
    Spinning,
    Settling,
    Stopped,
    Cancelled,
}

/// What the driver should do after [`RouletteMachine::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Wait this long, then advance again
    Step(Duration),

    /// The final index is shown; wait the settle delay, then `finish`
    Settle { index: usize },

    /// The machine is not spinning
    Inactive,
}

/// Step-by-step roulette over `len` slots
#[derive(Debug, Clone)]
pub struct RouletteMachine {
    state: RouletteState,
    len: usize,
    index: usize,
    step: u32,
    total_steps: u32,
    delay: Duration,
    initial_step: Duration,
    min_steps: u32,
    max_steps: u32,
    result: Option<usize>,
}

impl RouletteMachine {
    pub fn new(settings: &RouletteSettings) -> Self {
        Self {
            state: RouletteState::Idle,
            len: 0,
            index: 0,
            step: 0,
            total_steps: 0,
            delay: settings.initial_step,
            initial_step: settings.initial_step,
            min_steps: settings.min_steps,
            max_steps: settings.max_steps.max(settings.min_steps),
            result: None,
        }
    }

    pub fn state(&self) -> RouletteState {
        self.state
    }

    /// Slot currently displayed
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Begin spinning over `len` slots. Returns false (and stays put) when
    /// there is nothing to spin.
    pub fn start<R: Rng>(&mut self, len: usize, rng: &mut R) -> bool {
        if len == 0 {
            return false;
        }

        self.state = RouletteState::Spinning;
        self.len = len;
        self.index = 0;
        self.step = 0;
        self.total_steps = rng.random_range(self.min_steps..=self.max_steps);
        self.delay = self.initial_step;
        self.result = None;
        true
    }

    /// Move the display by one slot
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Advance {
        if self.state != RouletteState::Spinning {
            return Advance::Inactive;
        }

        self.index = (self.index + 1) % self.len;
        self.step += 1;

        let progress = f64::from(self.step);
        let total = f64::from(self.total_steps);
        if progress > total * 0.7 {
            self.delay += Duration::from_millis(20);
        } else if progress > total * 0.5 {
            self.delay += Duration::from_millis(10);
        } else if progress > total * 0.3 {
            self.delay += Duration::from_millis(5);
        }

        if self.step >= self.total_steps {
            // The landing slot is an independent draw
            let index = rng.random_range(0..self.len);
            self.index = index;
            self.result = Some(index);
            self.state = RouletteState::Settling;
            return Advance::Settle { index };
        }

        Advance::Step(self.delay)
    }

    /// Complete a settled spin; yields the result exactly once
    pub fn finish(&mut self) -> Option<usize> {
        if self.state != RouletteState::Settling {
            return None;
        }
        self.state = RouletteState::Stopped;
        self.result.take()
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, RouletteState::Spinning | RouletteState::Settling) {
            self.state = RouletteState::Cancelled;
            self.result = None;
        }
    }
}

/// Snapshot published on every roulette step
#[derive(Debug, Clone, PartialEq)]
pub struct RouletteFrame {
    pub spin_id: SpinId,
    pub state: RouletteState,
    pub index: usize,
    pub step: u32,
    pub total_steps: u32,
}

impl RouletteFrame {
    fn idle(spin_id: SpinId) -> Self {
        Self {
            spin_id,
            state: RouletteState::Idle,
            index: 0,
            step: 0,
            total_steps: 0,
        }
    }

    fn of(spin_id: SpinId, machine: &RouletteMachine) -> Self {
        Self {
            spin_id,
            state: machine.state(),
            index: machine.index(),
            step: machine.step(),
            total_steps: machine.total_steps(),
        }
    }
}

/// How a spin ended
#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Selected(Restaurant),

    /// There were no candidates
    NoSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Spin was cancelled")]
pub struct SpinCancelled;

/// Handle to a running spin. Dropping it cancels the spin.
#[derive(Debug)]
pub struct SpinHandle {
    id: SpinId,
    frames: watch::Receiver<RouletteFrame>,
    result: oneshot::Receiver<SpinOutcome>,
    task: AbortHandle,
}

impl SpinHandle {
    pub fn id(&self) -> SpinId {
        self.id
    }

    /// Receiver for step-by-step display updates
    pub fn frames(&self) -> watch::Receiver<RouletteFrame> {
        self.frames.clone()
    }

    pub fn current_frame(&self) -> RouletteFrame {
        self.frames.borrow().clone()
    }

    /// Abort the spin; it will never report a result
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the spin to finish
    pub async fn result(&mut self) -> Result<SpinOutcome, SpinCancelled> {
        (&mut self.result).await.map_err(|_| SpinCancelled)
    }
}

impl Drop for SpinHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Drives roulette spins on tokio timers. At most one spin is alive at a time.
pub struct RouletteWheel {
    settings: RouletteSettings,
    seed: Option<u64>,
    current: Option<AbortHandle>,
}

impl RouletteWheel {
    pub fn new(settings: RouletteSettings) -> Self {
        Self {
            settings,
            seed: None,
            current: None,
        }
    }

    /// Use a fixed random seed for every spin
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether a spin task is still running
    pub fn is_spinning(&self) -> bool {
        self.current.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Abort the running spin, if any
    pub fn cancel_current(&mut self) {
        if let Some(task) = self.current.take() {
            if !task.is_finished() {
                debug!("Aborting running spin");
            }
            task.abort();
        }
    }

    /// Start a spin over `candidates`, aborting any spin in progress.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spin(&mut self, candidates: Vec<Restaurant>, animations_enabled: bool) -> SpinHandle {
        self.cancel_current();

        let id = SpinId::new();
        let (frame_tx, frame_rx) = watch::channel(RouletteFrame::idle(id));
        let (result_tx, result_rx) = oneshot::channel();
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(spin_id = %id, candidates = candidates.len(), animations_enabled, "Spin started");

        let task = tokio::spawn(run_spin(
            id,
            candidates,
            animations_enabled,
            self.settings.clone(),
            rng,
            frame_tx,
            result_tx,
        ));
        let task = task.abort_handle();
        self.current = Some(task.clone());

        SpinHandle {
            id,
            frames: frame_rx,
            result: result_rx,
            task,
        }
    }
}

impl Drop for RouletteWheel {
    fn drop(&mut self) {
        self.cancel_current();
    }
}

async fn run_spin(
    id: SpinId,
    candidates: Vec<Restaurant>,
    animations_enabled: bool,
    settings: RouletteSettings,
    mut rng: StdRng,
    frames: watch::Sender<RouletteFrame>,
    result: oneshot::Sender<SpinOutcome>,
) {
    if candidates.is_empty() {
        frames.send_replace(RouletteFrame {
            state: RouletteState::Stopped,
            ..RouletteFrame::idle(id)
        });
        let _ = result.send(SpinOutcome::NoSelection);
        return;
    }

    if !animations_enabled {
        tokio::time::sleep(settings.bypass).await;
        let index = rng.random_range(0..candidates.len());
        frames.send_replace(RouletteFrame {
            state: RouletteState::Stopped,
            index,
            ..RouletteFrame::idle(id)
        });
        debug!(spin_id = %id, index, "Spin bypassed");
        let _ = result.send(SpinOutcome::Selected(candidates[index].clone()));
        return;
    }

    let mut machine = RouletteMachine::new(&settings);
    machine.start(candidates.len(), &mut rng);
    frames.send_replace(RouletteFrame::of(id, &machine));

    loop {
        let advance = machine.advance(&mut rng);
        frames.send_replace(RouletteFrame::of(id, &machine));
        match advance {
            Advance::Step(delay) => tokio::time::sleep(delay).await,
            Advance::Settle { .. } => {
                tokio::time::sleep(settings.settle).await;
                break;
            }
            Advance::Inactive => break,
        }
    }

    if let Some(index) = machine.finish() {
        frames.send_replace(RouletteFrame::of(id, &machine));
        debug!(spin_id = %id, index, steps = machine.step(), "Spin settled");
        let _ = result.send(SpinOutcome::Selected(candidates[index].clone()));
    }
}
