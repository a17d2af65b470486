mod instrument;

pub use instrument::InstrumentId;
