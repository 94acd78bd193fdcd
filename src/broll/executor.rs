use rand::Rng;
use serde::Serialize;
use serde_json::json;
use std::time::{Duration, Instant};

use crate::ui::prelude::{Level, emit};

use super::error::FillError;
use super::host::{AppendOutcome, AppendRequest, EditingHost, PlacedItemId};
use super::model::{FillTarget, PlacementCandidate, PlanningState, SegmentRange, SourceItem};
use super::planner::choose_next;

/// Consecutive rejected appends after which a fill gives up.
pub const FAILURE_LIMIT: u32 = 5;
/// Hard bound on append attempts in a single run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 100_000;
pub const DEFAULT_APPEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorLimits {
    pub failure_limit: u32,
    pub max_iterations: u64,
    pub append_timeout: Duration,
    /// Overall wall-clock budget, checked between attempts.
    pub run_timeout: Option<Duration>,
}

impl Default for ExecutorLimits {
    fn default() -> Self {
        Self {
            failure_limit: FAILURE_LIMIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            append_timeout: DEFAULT_APPEND_TIMEOUT,
            run_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub candidate: PlacementCandidate,
    #[serde(skip)]
    pub placed: PlacedItemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    FailureLimit,
    IterationCeiling,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillSummary {
    pub target: FillTarget,
    pub placements: Vec<Placement>,
    pub filled_frames: u64,
    pub attempts: u64,
    pub failed_attempts: u64,
}

impl FillSummary {
    fn new(target: FillTarget) -> Self {
        Self {
            target,
            placements: Vec::new(),
            filled_frames: 0,
            attempts: 0,
            failed_attempts: 0,
        }
    }

    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    pub fn shortfall(&self) -> u64 {
        self.target.target_frames - self.filled_frames
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Completed(FillSummary),
    /// Stopped early. Segments placed so far stay on the timeline.
    Aborted {
        summary: FillSummary,
        reason: AbortReason,
    },
}

impl FillOutcome {
    pub fn summary(&self) -> &FillSummary {
        match self {
            FillOutcome::Completed(summary) => summary,
            FillOutcome::Aborted { summary, .. } => summary,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FillOutcome::Completed(_))
    }
}

enum Attempt {
    Placed(PlacedItemId),
    Failed(String),
}

/// Drives the planner one decision at a time against an editing host.
pub struct FillExecutor<'h, H: EditingHost + ?Sized, R: Rng> {
    host: &'h mut H,
    rng: R,
    limits: ExecutorLimits,
}

impl<'h, H: EditingHost + ?Sized, R: Rng> FillExecutor<'h, H, R> {
    pub fn new(host: &'h mut H, rng: R) -> Self {
        Self {
            host,
            rng,
            limits: ExecutorLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ExecutorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn run(
        &mut self,
        target: FillTarget,
        items: &[SourceItem],
        range: SegmentRange,
    ) -> Result<FillOutcome, FillError> {
        if items.is_empty() {
            return Err(FillError::NoEligibleItems);
        }

        let started = Instant::now();
        let mut state = PlanningState::default();
        let mut summary = FillSummary::new(target);

        loop {
            if state.cumulative_filled >= target.target_frames {
                return Ok(FillOutcome::Completed(summary));
            }
            if let Some(reason) = self.abort_reason(&state, summary.attempts, started) {
                return Ok(FillOutcome::Aborted { summary, reason });
            }

            summary.attempts += 1;

            let mut candidate =
                choose_next(&mut self.rng, items, range, state.remaining(&target))?;
            candidate.record_position = state.record_position(&target);

            match self.materialize(&candidate, &target)? {
                Attempt::Placed(placed) => {
                    state.cumulative_filled += candidate.trim_length;
                    state.placed_count += 1;
                    state.consecutive_failures = 0;
                    summary.filled_frames = state.cumulative_filled;

                    let progress =
                        state.cumulative_filled as f64 / target.target_frames as f64 * 100.0;
                    emit(
                        Level::Info,
                        "broll.fill.placed",
                        &format!(
                            "Added {} on {} ({progress:.1}%)",
                            candidate.item.name, target.track
                        ),
                        Some(json!({
                            "item": candidate.item.id,
                            "record_frame": candidate.record_position,
                            "trim_start": candidate.trim_start,
                            "length": candidate.trim_length,
                            "progress": progress,
                        })),
                    );
                    summary.placements.push(Placement { candidate, placed });
                }
                Attempt::Failed(reason) => {
                    state.consecutive_failures += 1;
                    summary.failed_attempts += 1;
                    emit(
                        Level::Warn,
                        "broll.fill.rejected",
                        &format!("Failed to append {}: {reason}", candidate.item.name),
                        Some(json!({
                            "item": candidate.item.id,
                            "consecutive_failures": state.consecutive_failures,
                        })),
                    );
                }
            }
        }
    }

    fn abort_reason(
        &self,
        state: &PlanningState,
        attempts: u64,
        started: Instant,
    ) -> Option<AbortReason> {
        if state.consecutive_failures >= self.limits.failure_limit {
            return Some(AbortReason::FailureLimit);
        }
        if attempts >= self.limits.max_iterations {
            return Some(AbortReason::IterationCeiling);
        }
        match self.limits.run_timeout {
            Some(budget) if started.elapsed() >= budget => Some(AbortReason::TimedOut),
            _ => None,
        }
    }

    fn materialize(
        &mut self,
        candidate: &PlacementCandidate,
        target: &FillTarget,
    ) -> Result<Attempt, FillError> {
        let request =
            AppendRequest::from_candidate(candidate, target.track, self.limits.append_timeout);
        let timeout = self.limits.append_timeout;

        let called = Instant::now();
        let placed = match self.host.append_segment(&request) {
            AppendOutcome::Placed(placed) => placed,
            AppendOutcome::Rejected(reason) => return Ok(Attempt::Failed(reason)),
        };
        if called.elapsed() > timeout {
            return self.roll_back(placed, format!("append timed out after {timeout:?}"));
        }

        if !candidate.item.is_still() {
            return Ok(Attempt::Placed(placed));
        }

        let called = Instant::now();
        match self.host.resize_placed(&placed, candidate.trim_length) {
            Ok(()) if called.elapsed() > timeout => {
                self.roll_back(placed, format!("resize timed out after {timeout:?}"))
            }
            Ok(()) => Ok(Attempt::Placed(placed)),
            Err(resize_error) => self.roll_back(placed, format!("resize failed: {resize_error}")),
        }
    }

    /// Remove a placed item that did not fully commit and report the attempt as failed.
    fn roll_back(&mut self, placed: PlacedItemId, reason: String) -> Result<Attempt, FillError> {
        self.host.remove_placed(&placed).map_err(|remove_error| {
            FillError::Host(remove_error.context(format!("removing {placed} after {reason}")))
        })?;
        Ok(Attempt::Failed(reason))
    }
}
