//! Selection session
//!
//! Owns the roster, the random source and the spin state, and drives the
//! single-winner and sequential draws frame by frame.
//!
//! A single draw spins once and decodes the winner from the resting angle.
//! A sequential draw fixes a random permutation of the roster up front and
//! then spins once per participant, aiming each spin at the next entry of
//! that permutation so the wheel always lands on who is being revealed.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::invariants::assert_permutation;
use crate::models::{Candidate, Participant};
use crate::roster::Roster;
use crate::wheel::{
    index_at, normalize_angle, render_frame, FrameScheduler, SpinAnimation, SpinProfile,
    VisualFrame,
};

/// Which kind of draw is running or was last run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Single,
    Sequential,
}

/// Where the session is in its draw lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    /// A single draw finished and its winner is presented
    Settled,
    /// Sequential cycle `n` (0-based) is spinning
    SpinningCycle(usize),
    /// Sequential cycle `n` landed and its participant is being revealed
    RevealCycle(usize),
    AllRevealed,
}

impl SpinPhase {
    /// Whether a draw is running, including reveal pauses between cycles
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SpinPhase::Spinning | SpinPhase::SpinningCycle(_) | SpinPhase::RevealCycle(_)
        )
    }

    /// Whether a finished draw's result is on display
    pub fn has_result(&self) -> bool {
        matches!(self, SpinPhase::Settled | SpinPhase::AllRevealed)
    }
}

/// Observable spin state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpinState {
    pub rotation_angle: f64,
    pub is_spinning: bool,
    pub winner: Option<Participant>,
    pub mode: Option<DrawMode>,
    /// Participants of a sequential draw not yet revealed, in reveal order
    pub pending_order: VecDeque<Participant>,
    pub revealed_order: Vec<Participant>,
}

/// Something the front end should react to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The wheel moved; `pointer` is the segment currently under the pointer
    Frame { rotation: f64, pointer: Option<usize> },
    Settled { winner: Participant },
    Revealed { cycle: usize, participant: Participant },
    Completed { order: Vec<Participant> },
}

/// Outcome of a finished draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    Single(Participant),
    Sequential(Vec<Participant>),
}

/// What happened to candidates handed to [`SelectionSession::merge_candidates`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merged now; the participants that were actually added
    Applied(Vec<Participant>),
    /// Held until the draw finishes and its result is closed
    Deferred(usize),
}

/// Spin profiles and pause lengths used by a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionTiming {
    pub single: SpinProfile,
    pub sequential: SpinProfile,
    /// Pause after each sequential landing before the next cycle starts
    pub reveal_pause: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            single: SpinProfile::SINGLE,
            sequential: SpinProfile::SEQUENTIAL,
            reveal_pause: Duration::from_millis(800),
        }
    }
}

/// Random permutation of the roster (Fisher-Yates)
pub fn shuffled_order<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Vec<Participant> {
    let mut order = roster.participants().to_vec();
    order.shuffle(rng);
    order
}

pub struct SelectionSession<R = StdRng> {
    roster: Roster,
    rng: R,
    timing: SessionTiming,
    phase: SpinPhase,
    state: SpinState,
    animation: Option<SpinAnimation>,
    reveal_until: Option<Duration>,
    deferred_imports: Vec<Candidate>,
}

impl<R: Rng> SelectionSession<R> {
    pub fn new(roster: Roster, rng: R) -> Self {
        Self {
            roster,
            rng,
            timing: SessionTiming::default(),
            phase: SpinPhase::Idle,
            state: SpinState::default(),
            animation: None,
            reveal_until: None,
            deferred_imports: Vec::new(),
        }
    }

    pub fn with_timing(mut self, timing: SessionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn into_roster(self) -> Roster {
        self.roster
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn timing(&self) -> &SessionTiming {
        &self.timing
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning
    }

    pub fn winner(&self) -> Option<&Participant> {
        self.state.winner.as_ref()
    }

    pub fn revealed_order(&self) -> &[Participant] {
        &self.state.revealed_order
    }

    /// Candidates waiting for the draw and its result to be done with
    pub fn deferred_imports(&self) -> usize {
        self.deferred_imports.len()
    }

    /// Segment currently under the pointer
    pub fn pointer_index(&self) -> Option<usize> {
        index_at(self.roster.len(), self.state.rotation_angle)
    }

    /// Visual state of the wheel right now
    pub fn current_frame(&self) -> VisualFrame {
        render_frame(&self.roster, self.state.rotation_angle)
    }

    /// Result of the last finished draw while it is still presented
    pub fn result(&self) -> Option<SelectionResult> {
        match self.phase {
            SpinPhase::Settled => self.state.winner.clone().map(SelectionResult::Single),
            SpinPhase::AllRevealed => {
                Some(SelectionResult::Sequential(self.state.revealed_order.clone()))
            }
            _ => None,
        }
    }

    /// Add a participant. A presented result is closed first, since the
    /// wheel it rests on is about to change.
    pub fn add_participant(&mut self, name: &str) -> Result<Participant> {
        self.ensure_roster_unlocked()?;
        self.close_result();
        let participant = self.roster.add(name)?.clone();
        debug!(participant = %participant, "Participant added");
        Ok(participant)
    }

    pub fn remove_participant(&mut self, name: &str) -> Result<Option<Participant>> {
        self.ensure_roster_unlocked()?;
        self.close_result();
        Ok(self.roster.remove(name))
    }

    pub fn clear_roster(&mut self) -> Result<()> {
        self.ensure_roster_unlocked()?;
        self.close_result();
        self.roster.clear();
        Ok(())
    }

    /// Merge imported candidates.
    ///
    /// While a draw runs or its result is presented the candidates are held,
    /// so the wheel under the pointer keeps showing the winner. They are
    /// merged when the result is closed (dismiss, winner removal or a roster
    /// edit) or when the next draw starts.
    pub fn merge_candidates<I, C>(&mut self, candidates: I) -> MergeOutcome
    where
        I: IntoIterator<Item = C>,
        C: Into<Candidate>,
    {
        if self.phase.is_active() || self.phase.has_result() {
            let before = self.deferred_imports.len();
            self.deferred_imports
                .extend(candidates.into_iter().map(Into::into));
            let held = self.deferred_imports.len() - before;
            info!(held, "Import deferred until the result is closed");
            return MergeOutcome::Deferred(held);
        }

        let added = self.roster.import_merge(candidates);
        info!(added = added.len(), "Imported participants merged");
        MergeOutcome::Applied(added)
    }

    /// Start a single-winner draw at time `now`.
    ///
    /// Rejected without touching any state if the roster is empty or a draw
    /// is already running.
    pub fn start_single_draw(&mut self, now: Duration) -> Result<()> {
        self.ensure_can_draw()?;
        self.apply_deferred_imports();

        let from = normalize_angle(self.state.rotation_angle);
        let travel = self.timing.single.total_rotation(&mut self.rng);
        self.animation = Some(SpinAnimation::new(
            now,
            from,
            travel,
            self.timing.single.duration,
        ));

        self.reset_presentation();
        self.state.rotation_angle = from;
        self.state.is_spinning = true;
        self.state.mode = Some(DrawMode::Single);
        self.phase = SpinPhase::Spinning;

        info!(participants = self.roster.len(), "Single draw started");
        Ok(())
    }

    /// Start a sequential draw at time `now`.
    ///
    /// The whole reveal order is fixed here; the cycles only animate it.
    pub fn start_sequential_draw(&mut self, now: Duration) -> Result<()> {
        self.ensure_can_draw()?;
        self.apply_deferred_imports();

        let order = shuffled_order(&self.roster, &mut self.rng);
        self.reset_presentation();
        self.state.rotation_angle = normalize_angle(self.state.rotation_angle);
        self.state.pending_order = order.into();
        self.state.is_spinning = true;
        self.state.mode = Some(DrawMode::Sequential);

        info!(participants = self.roster.len(), "Sequential draw started");
        self.start_cycle(0, now);
        Ok(())
    }

    /// Discard the presented order and run a fresh sequential draw
    pub fn regenerate(&mut self, now: Duration) -> Result<()> {
        debug!("Regenerating sequential order");
        self.start_sequential_draw(now)
    }

    /// Step the session to time `now`
    pub fn advance(&mut self, now: Duration) -> Option<SessionEvent> {
        match self.phase {
            SpinPhase::Idle | SpinPhase::Settled | SpinPhase::AllRevealed => None,
            SpinPhase::Spinning => {
                let Some(animation) = self.animation else {
                    self.abort("single draw lost its animation");
                    return None;
                };
                self.state.rotation_angle = animation.angle_at(now);
                if animation.is_finished(now) {
                    self.settle()
                } else {
                    Some(self.frame_event())
                }
            }
            SpinPhase::SpinningCycle(cycle) => {
                let Some(animation) = self.animation else {
                    self.abort("sequential cycle lost its animation");
                    return None;
                };
                self.state.rotation_angle = animation.angle_at(now);
                if animation.is_finished(now) {
                    self.reveal(cycle, now)
                } else {
                    Some(self.frame_event())
                }
            }
            SpinPhase::RevealCycle(cycle) => {
                if self.reveal_until.is_some_and(|until| now < until) {
                    return None;
                }
                if self.state.pending_order.is_empty() {
                    self.complete()
                } else {
                    self.start_cycle(cycle + 1, now);
                    Some(self.frame_event())
                }
            }
        }
    }

    /// Drive the running draw to completion, pulling frame times from
    /// `scheduler` and reporting every event to `on_event`.
    ///
    /// Returns `None` if no draw was running.
    pub fn run_draw<S, F>(&mut self, scheduler: &mut S, mut on_event: F) -> Option<SelectionResult>
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(&Self, &SessionEvent),
    {
        while self.phase.is_active() {
            let now = scheduler.next_frame();
            if let Some(event) = self.advance(now) {
                on_event(self, &event);
            }
        }
        self.result()
    }

    /// Start and finish a single draw
    pub fn draw_single<S, F>(&mut self, scheduler: &mut S, on_event: F) -> Result<Participant>
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(&Self, &SessionEvent),
    {
        self.start_single_draw(scheduler.now())?;
        match self.run_draw(scheduler, on_event) {
            Some(SelectionResult::Single(winner)) => Ok(winner),
            _ => Err(Error::NotFound("winner".to_string())),
        }
    }

    /// Start and finish a sequential draw
    pub fn draw_sequential<S, F>(
        &mut self,
        scheduler: &mut S,
        on_event: F,
    ) -> Result<Vec<Participant>>
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(&Self, &SessionEvent),
    {
        self.start_sequential_draw(scheduler.now())?;
        match self.run_draw(scheduler, on_event) {
            Some(SelectionResult::Sequential(order)) => Ok(order),
            _ => Err(Error::NotFound("sequential order".to_string())),
        }
    }

    /// Remove the presented single-draw winner from the roster.
    ///
    /// Returns `None` when there is no winner to remove, which makes a second
    /// call a no-op.
    pub fn remove_winner_from_roster(&mut self) -> Option<Participant> {
        if self.phase.is_active() {
            return None;
        }
        let winner = self.state.winner.take()?;
        self.close_result();
        self.roster.remove(winner.name());
        info!(winner = %winner, "Winner removed from roster");
        Some(winner)
    }

    /// Close the presented result. The roster only changes by the imports
    /// that were held while the result was shown.
    pub fn dismiss(&mut self) {
        if self.phase.is_active() {
            debug!("Ignoring dismiss while a draw is running");
            return;
        }
        self.reset_presentation();
        self.state.mode = None;
        self.phase = SpinPhase::Idle;
        self.apply_deferred_imports();
    }

    fn close_result(&mut self) {
        if self.phase.has_result() {
            self.dismiss();
        }
    }

    fn ensure_can_draw(&self) -> Result<()> {
        if self.phase.is_active() {
            warn!("Draw requested while a draw is running");
            return Err(Error::ReentrantSpin);
        }
        if self.roster.is_empty() {
            return Err(Error::EmptyRoster);
        }
        Ok(())
    }

    fn ensure_roster_unlocked(&self) -> Result<()> {
        if self.phase.is_active() {
            return Err(Error::DrawInProgress);
        }
        Ok(())
    }

    fn reset_presentation(&mut self) {
        self.state.winner = None;
        self.state.pending_order.clear();
        self.state.revealed_order.clear();
        self.reveal_until = None;
    }

    fn frame_event(&self) -> SessionEvent {
        SessionEvent::Frame {
            rotation: self.state.rotation_angle,
            pointer: self.pointer_index(),
        }
    }

    fn start_cycle(&mut self, cycle: usize, now: Duration) {
        let target = self
            .state
            .pending_order
            .front()
            .and_then(|p| self.roster.position(p.name()));
        let Some(index) = target else {
            self.abort("sequential target missing from roster");
            return;
        };

        let from = normalize_angle(self.state.rotation_angle);
        let travel =
            self.timing
                .sequential
                .rotation_landing_on(&mut self.rng, from, self.roster.len(), index);
        self.animation = Some(SpinAnimation::new(
            now,
            from,
            travel,
            self.timing.sequential.duration,
        ));
        self.state.rotation_angle = from;
        self.reveal_until = None;
        self.phase = SpinPhase::SpinningCycle(cycle);
        debug!(cycle, "Sequential cycle started");
    }

    fn settle(&mut self) -> Option<SessionEvent> {
        self.animation = None;
        let winner = self
            .pointer_index()
            .and_then(|index| self.roster.get(index))
            .cloned();
        let Some(winner) = winner else {
            self.abort("single draw settled on an empty wheel");
            return None;
        };

        self.state.winner = Some(winner.clone());
        self.state.is_spinning = false;
        self.phase = SpinPhase::Settled;
        info!(winner = %winner, "Draw settled");
        Some(SessionEvent::Settled { winner })
    }

    fn reveal(&mut self, cycle: usize, now: Duration) -> Option<SessionEvent> {
        self.animation = None;
        let Some(participant) = self.state.pending_order.pop_front() else {
            self.abort("sequential cycle without a participant");
            return None;
        };

        debug_assert_eq!(
            self.pointer_index().and_then(|i| self.roster.get(i)),
            Some(&participant),
            "Wheel landed away from the revealed participant"
        );

        self.state.revealed_order.push(participant.clone());
        self.reveal_until = Some(now + self.timing.reveal_pause);
        self.phase = SpinPhase::RevealCycle(cycle);
        info!(cycle, participant = %participant, "Participant revealed");

        Some(SessionEvent::Revealed { cycle, participant })
    }

    fn complete(&mut self) -> Option<SessionEvent> {
        assert_permutation(&self.roster, &self.state.revealed_order);

        self.reveal_until = None;
        self.state.is_spinning = false;
        self.phase = SpinPhase::AllRevealed;
        info!(
            participants = self.state.revealed_order.len(),
            "Sequential draw complete"
        );
        Some(SessionEvent::Completed {
            order: self.state.revealed_order.clone(),
        })
    }

    fn apply_deferred_imports(&mut self) {
        if self.deferred_imports.is_empty() {
            return;
        }
        let candidates = std::mem::take(&mut self.deferred_imports);
        let added = self.roster.import_merge(candidates);
        info!(added = added.len(), "Deferred import merged");
    }

    fn abort(&mut self, reason: &str) {
        warn!(reason, "Draw aborted");
        self.animation = None;
        self.reveal_until = None;
        self.state.is_spinning = false;
        self.phase = SpinPhase::Idle;
    }
}
