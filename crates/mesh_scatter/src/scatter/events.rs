//! Event types and sinks for observing placement runs.
//!
//! This module defines [`PlacementEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while a [`crate::scatter::runner::ScatterRunner`]
//! works through its candidates.
use crate::scatter::runner::{RunResult, ScatterMode};
use crate::scatter::{Pose, PrototypeId};

/// Describes events emitted by placement runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted once the candidate pool has been built.
    RunStarted {
        /// Placement mode of the run.
        mode: ScatterMode,
        /// Prototype being placed.
        prototype_id: PrototypeId,
        /// Requested number of instances.
        requested: usize,
        /// Number of candidates in the pool.
        candidates: usize,
    },

    /// Emitted when the run ends, either at the target count or on exhaustion.
    RunFinished {
        /// Placed instances and counters.
        result: RunResult,
    },

    /// A candidate was drawn and dropped by the stochastic weight test.
    CandidateSkipped {
        /// Surface vertex of the candidate.
        vertex: u32,
        /// Candidate weight.
        weight: f32,
        /// Uniform roll the weight lost against.
        roll: f32,
    },

    /// A candidate was tried and its bounds hit an already placed instance.
    CandidateRejected {
        /// Surface vertex of the candidate.
        vertex: u32,
        /// Pose the instance would have had.
        pose: Pose,
    },

    /// An instance was committed.
    InstancePlaced {
        /// Position of the instance in the run's result list.
        index: usize,
        /// Surface vertex the instance sits on.
        vertex: u32,
        /// Committed pose.
        pose: Pose,
    },

    /// Non-fatal warning generated during placement.
    Warning {
        /// Context string (e.g. surface or prototype id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PlacementEvent`], used to filter what a sink receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementEventKind {
    RunStarted,
    RunFinished,
    CandidateSkipped,
    CandidateRejected,
    InstancePlaced,
    Warning,
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            Self::RunStarted { .. } => PlacementEventKind::RunStarted,
            Self::RunFinished { .. } => PlacementEventKind::RunFinished,
            Self::CandidateSkipped { .. } => PlacementEventKind::CandidateSkipped,
            Self::CandidateRejected { .. } => PlacementEventKind::CandidateRejected,
            Self::InstancePlaced { .. } => PlacementEventKind::InstancePlaced,
            Self::Warning { .. } => PlacementEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PlacementEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
    only: Option<Vec<PlacementEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Restricts collection to the given kinds.
    pub fn only(mut self, kinds: impl IntoIterator<Item = PlacementEventKind>) -> Self {
        self.only = Some(kinds.into_iter().collect());
        self
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PlacementEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Minimal adapter trait for types that can expose an [`EventSink`].
pub trait AsEventSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink;
}

impl<S: EventSink> AsEventSink for S {
    fn as_event_sink(&mut self) -> &mut dyn EventSink {
        self
    }
}
