//! Value simulator.
//!
//! Each tick picks between 20% and 40% of the records of one repository and gives each a fresh
//! value. Seven draws in ten land inside the reference range (clamped to it); the rest are split
//! evenly between a high excursion (no upper clamp) and a low excursion (floored at zero only).
//!
//! The RNG and the tick timestamp are both injected, so tests drive ticks on demand with
//! [`ValueSimulator::tick_at`]. [`spawn`] runs the same simulator on a tokio interval.

use crate::catalog::MetricKind;
use crate::record::{round_to_hundredths, RecordId};
use crate::repository::RecordRepository;
use crate::{CoreError, CoreResult};
use api_shared::wire::ReferenceRange;
use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_UPDATE_FRACTION: f64 = 0.2;
const UPDATE_FRACTION_SPREAD: f64 = 0.2;
const WITHIN_RANGE_PROBABILITY: f64 = 0.7;
const HIGH_EXCURSION_PROBABILITY: f64 = 0.5;
const WITHIN_RANGE_VARIANCE: f64 = 0.1;
const MIN_EXCURSION: f64 = 0.1;
const EXCURSION_SPREAD: f64 = 0.3;

/// Which part of the distribution a new value was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    WithinRange,
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    pub band: Band,
    pub value: f64,
}

/// Number of records to touch this tick: `floor(total * (0.2 + fraction_draw * 0.2))`.
///
/// `fraction_draw` is a uniform sample from `[0, 1)`.
pub fn update_count(total: usize, fraction_draw: f64) -> usize {
    let fraction = MIN_UPDATE_FRACTION + fraction_draw * UPDATE_FRACTION_SPREAD;
    (total as f64 * fraction).floor() as usize
}

pub fn draw_band<R: Rng + ?Sized>(rng: &mut R) -> Band {
    if rng.gen_bool(WITHIN_RANGE_PROBABILITY) {
        Band::WithinRange
    } else if rng.gen_bool(HIGH_EXCURSION_PROBABILITY) {
        Band::High
    } else {
        Band::Low
    }
}

/// Draws a value from `band`, rounded to two decimals.
pub fn value_in_band<R: Rng + ?Sized>(band: Band, range: &ReferenceRange, rng: &mut R) -> f64 {
    let span = range.span();
    let value = match band {
        Band::WithinRange => {
            let variance = span * WITHIN_RANGE_VARIANCE;
            let base = range.min + span / 2.0;
            let candidate = base + (rng.gen::<f64>() - 0.5) * variance * 2.0;
            candidate.max(range.min).min(range.max)
        }
        Band::High => {
            let excess = span * (MIN_EXCURSION + rng.gen::<f64>() * EXCURSION_SPREAD);
            range.max + excess
        }
        Band::Low => {
            let deficit = span * (MIN_EXCURSION + rng.gen::<f64>() * EXCURSION_SPREAD);
            (range.min - deficit).max(0.0)
        }
    };
    round_to_hundredths(value)
}

pub fn draw_value<R: Rng + ?Sized>(range: &ReferenceRange, rng: &mut R) -> Draw {
    let band = draw_band(rng);
    Draw {
        band,
        value: value_in_band(band, range, rng),
    }
}

/// Outcome of one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub total: usize,
    pub selected: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub struct ValueSimulator<R = StdRng> {
    kind: MetricKind,
    repository: Arc<RecordRepository>,
    rng: R,
}

impl ValueSimulator<StdRng> {
    /// Creates a simulator with a seeded RNG, or an entropy-seeded one when `seed` is `None`.
    pub fn with_seed(kind: MetricKind, repository: Arc<RecordRepository>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(kind, repository, rng)
    }
}

impl<R: Rng> ValueSimulator<R> {
    pub fn new(kind: MetricKind, repository: Arc<RecordRepository>, rng: R) -> Self {
        Self {
            kind,
            repository,
            rng,
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Runs one tick stamped with the current wall-clock time (millisecond precision).
    pub fn tick(&mut self) -> TickReport {
        self.tick_at(Utc::now().trunc_subsecs(3))
    }

    /// Runs one tick, stamping every update with `now`.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> TickReport {
        let mut targets: Vec<(RecordId, ReferenceRange)> = self
            .repository
            .all()
            .iter()
            .map(|r| (r.id(), r.reference_range()))
            .collect();

        let total = targets.len();
        if total == 0 {
            return TickReport::default();
        }

        let count = update_count(total, self.rng.gen::<f64>());
        let (chosen, _) = targets.partial_shuffle(&mut self.rng, count);

        let mut report = TickReport {
            total,
            selected: chosen.len(),
            ..TickReport::default()
        };

        for (id, range) in chosen.iter() {
            let draw = draw_value(range, &mut self.rng);
            match self.repository.update_value(*id, draw.value, now) {
                Some(_) => report.updated += 1,
                None => report.skipped += 1,
            }
        }

        tracing::debug!(
            kind = %self.kind,
            total = report.total,
            updated = report.updated,
            skipped = report.skipped,
            "simulator tick"
        );

        report
    }
}

/// Handle to a simulator running on the tokio runtime.
///
/// Dropping the handle also stops the simulator at its next poll.
pub struct SimulatorHandle {
    kind: MetricKind,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SimulatorHandle {
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Stops the timer and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!("{} simulator task failed: {:?}", self.kind, e);
        }
    }
}

/// Spawns `simulator` on a fixed `period`. The first tick fires one period after spawning.
///
/// # Errors
/// Returns `CoreError::InvalidTickInterval` if `period` is zero.
pub fn spawn<R>(mut simulator: ValueSimulator<R>, period: Duration) -> CoreResult<SimulatorHandle>
where
    R: Rng + Send + 'static,
{
    if period.is_zero() {
        return Err(CoreError::InvalidTickInterval(
            "period must be greater than zero".into(),
        ));
    }

    let kind = simulator.kind();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    simulator.tick();
                }
                _ = &mut shutdown_rx => break,
            }
        }

        tracing::info!("-- {} simulator stopped", kind);
    });

    tracing::info!("++ Starting {} simulator every {:?}", kind, period);

    Ok(SimulatorHandle {
        kind,
        shutdown: shutdown_tx,
        task,
    })
}
