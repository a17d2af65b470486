//! Position Book
//!
//! Net signed quantity per instrument (positive = long, negative = short).
//!
//! The book is only ever changed by applying fills the broker has confirmed.
//! Target positions never write to it: the book reflects what was executed,
//! not what was intended.

use meridian_core::{InstrumentId, PositionMap, Quantity, Side};

/// Instrument -> signed quantity, mutated only through [`PositionBook::apply_fill`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionBook {
    quantities: PositionMap,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fill's signed quantity to the instrument's position, returning
    /// the new position
    pub fn apply_fill(&mut self, instrument_id: &InstrumentId, quantity: Quantity, side: Side) -> Quantity {
        let position = self.quantities.entry(instrument_id.clone()).or_default();
        *position += side.signed(quantity);
        *position
    }

    /// Current position, zero when the instrument was never traded
    pub fn get(&self, instrument_id: &str) -> Quantity {
        self.quantities.get(instrument_id).copied().unwrap_or_default()
    }

    /// Copy of every position, sorted by instrument
    pub fn snapshot(&self) -> PositionMap {
        self.quantities.clone()
    }

    /// Positions restricted to `universe`, with untraded instruments as zero
    pub fn reindex<'a>(&self, universe: impl IntoIterator<Item = &'a InstrumentId>) -> PositionMap {
        universe
            .into_iter()
            .map(|id| (id.clone(), self.get(id.as_str())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}
