use crate::scheme::SchemeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Operands were produced by different engine instances")]
    ContextMismatch,

    #[error("Slot count mismatch: {left} vs {right}")]
    SlotCountMismatch { left: usize, right: usize },

    #[error("Shape mismatch in {operation}: {left:?} vs {right:?}")]
    ShapeMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Invalid shape for {operation}: {rows}x{cols}")]
    InvalidShape {
        operation: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("Index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Depth {required} exceeds the engine budget of {budget}")]
    DepthExceeded { required: usize, budget: usize },

    #[error("Batch width {width} must be a power of two dividing {slots} slots")]
    InvalidBatchWidth { width: usize, slots: usize },

    #[error("{features} features not supported, expected {min} to {max}")]
    UnsupportedFeatureCount {
        features: usize,
        min: usize,
        max: usize,
    },

    #[error("Slot {slot} out of range for {slots} slots")]
    SlotOutOfRange { slot: usize, slots: usize },

    #[error("Zero denominator at ({row}, {col}), slot {slot}")]
    ZeroDenominator { row: usize, col: usize, slot: usize },

    #[error("Scheme error: {0}")]
    Scheme(#[from] SchemeError),
}

pub type EvalResult<T> = Result<T, EvalError>;
