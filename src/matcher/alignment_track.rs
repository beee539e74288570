use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

use crate::common::F32ArrayExt;
use crate::matcher::config::CostWeights;
use crate::melody::ReferenceMelody;
use crate::{Error, Result};

/// The largest accepted symbol magnitude. Squared costs of larger symbols would
/// leave too little headroom before the cumulative costs overflow.
pub const MAX_SYMBOL_MAGNITUDE: f32 = 1.0e4;

/// Fails unless `symbol` is finite and within `MAX_SYMBOL_MAGNITUDE`.
pub fn check_symbol(symbol: f32) -> Result<()> {
    if symbol.is_finite() && symbol >= -MAX_SYMBOL_MAGNITUDE && symbol <= MAX_SYMBOL_MAGNITUDE {
        Ok(())
    } else {
        Err(Error::Precondition(
            "symbol must be finite and within 10000 in magnitude",
        ))
    }
}

/// A point on the alignment trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracePoint {
    /// The reference row with the lowest cumulative cost, in `1..=n`. Row `i`
    /// means the first `i` reference intervals have been consumed, so this is
    /// also an index into the reference onsets and reconstructed pitches.
    pub reference_row: usize,
    /// The 1-based position of the query interval, i.e the number of intervals
    /// received when this point was recorded.
    pub query_index: usize,
}

/// Incrementally aligns a stream of query intervals against a single reference melody.
///
/// Conceptually this fills in an `(n + 1) x (m + 1)` edit distance matrix one column per
/// query interval, where `n` is the reference length and `m` the number of received
/// intervals. Only the two most recent columns are kept, so memory and per note work are
/// proportional to `n` regardless of how long the performance goes on.
///
/// Costs use squared numeric distances rather than equality, since pitch tracked
/// intervals are noisy real numbers.
pub struct AlignmentTrack {
    reference: Arc<ReferenceMelody>,
    weights: CostWeights,
    /// All received intervals.
    query: Vec<f32>,
    column_0: Box<[f32]>,
    column_1: Box<[f32]>,
    /// The index of the column holding the most recently computed costs.
    active_index: usize,
    trace: Vec<TracePoint>,
    step_count: usize,
    cost: Option<f32>,
    is_initialized: bool,
}

impl AlignmentTrack {
    pub fn new(reference: Arc<ReferenceMelody>) -> Self {
        AlignmentTrack::from_options(reference, CostWeights::default())
    }

    pub fn from_options(reference: Arc<ReferenceMelody>, weights: CostWeights) -> Self {
        let row_count = reference.len() + 1;
        AlignmentTrack {
            reference,
            weights,
            query: Vec::new(),
            column_0: vec![0.; row_count].into_boxed_slice(),
            column_1: vec![0.; row_count].into_boxed_slice(),
            active_index: 0,
            trace: Vec::new(),
            step_count: 0,
            cost: None,
            is_initialized: false,
        }
    }

    /// Aligns one more query interval and returns the lowest cumulative alignment
    /// cost over all reference positions. A rejected symbol leaves the track untouched.
    pub fn add_note(&mut self, symbol: f32) -> Result<f32> {
        check_symbol(symbol)?;
        if !self.is_initialized {
            self.initialize();
        }

        self.query.push(symbol);
        self.step_count += 1;

        // The previously active column becomes the previous column
        self.active_index = 1 - self.active_index;
        let (previous, current) = if self.active_index == 0 {
            (&self.column_1, &mut self.column_0)
        } else {
            (&self.column_0, &mut self.column_1)
        };

        let weights = self.weights;
        let symbol_squared = symbol * symbol;
        let reference = self.reference.intervals();
        debug_assert!(!reference.is_empty());

        // Row 0: every query interval so far treated as an insertion
        current[0] = previous[0] + weights.duplication + symbol_squared;
        for row in 1..current.len() {
            let reference_interval = reference[row - 1];
            let delta = reference_interval - symbol;
            let transposition = previous[row - 1] + delta * delta + weights.transposition;
            let duplication = previous[row] + symbol_squared + weights.duplication;
            let dropout =
                current[row - 1] + reference_interval * reference_interval + weights.dropout;
            current[row] = transposition.min(duplication).min(dropout);
        }

        // Ties go to the lowest row, i.e the earliest plausible reference position.
        let (reference_row, cost) = match current[1..].first_minimum() {
            Some((index, cost)) => (index + 1, cost),
            None => (0, current[0]),
        };
        self.trace.push(TracePoint {
            reference_row,
            query_index: self.step_count,
        });
        self.cost = Some(cost);
        Ok(cost)
    }

    /// Adds a sequence of intervals, returning the cost after the last one.
    /// Nothing is added if any of the symbols is rejected.
    pub fn add_notes(&mut self, symbols: &[f32]) -> Result<Option<f32>> {
        for symbol in symbols.iter() {
            check_symbol(*symbol)?;
        }
        for symbol in symbols.iter() {
            self.add_note(*symbol)?;
        }
        Ok(self.cost)
    }

    /// Returns the track to the state it was in before the first call to `add_note`.
    pub fn reset(&mut self) {
        self.query.clear();
        self.trace.clear();
        self.step_count = 0;
        self.cost = None;
        self.is_initialized = false;
    }

    /// Fills in the column for an empty query: skipping the first `i` reference
    /// intervals costs the sum of their dropout costs.
    fn initialize(&mut self) {
        let reference = self.reference.intervals();
        let dropout = self.weights.dropout;
        self.active_index = 0;
        let column = &mut self.column_0;
        column[0] = 0.;
        for row in 1..column.len() {
            let reference_interval = reference[row - 1];
            column[row] = column[row - 1] + dropout + reference_interval * reference_interval;
        }
        for value in self.column_1.iter_mut() {
            *value = 0.;
        }
        self.is_initialized = true;
    }

    pub fn reference(&self) -> &ReferenceMelody {
        &self.reference
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// All intervals received since creation or the last reset.
    pub fn query(&self) -> &[f32] {
        &self.query
    }

    /// One point per received interval.
    pub fn trace(&self) -> &[TracePoint] {
        &self.trace
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The cost returned by the most recent call to `add_note`.
    pub fn cost(&self) -> Option<f32> {
        self.cost
    }

    /// The cumulative cost of every reference row after the most recent interval.
    /// Always `n + 1` values long.
    pub fn current_costs(&self) -> &[f32] {
        if self.active_index == 0 {
            &self.column_0
        } else {
            &self.column_1
        }
    }
}
