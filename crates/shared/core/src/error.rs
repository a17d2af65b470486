//! Order validation errors

use thiserror::Error;

use crate::values::{Price, Quantity};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Negative quantity: {0}")]
    NegativeQuantity(Quantity),

    #[error("Limit order requires a limit price")]
    MissingLimitPrice,

    #[error("Invalid limit price: {0}")]
    InvalidLimitPrice(Price),

    #[error("Unknown side: {0}")]
    UnknownSide(String),
}

pub type Result<T> = std::result::Result<T, OrderError>;
