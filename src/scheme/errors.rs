use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Input too long: got {got} values, max {max} slots")]
    InputTooLong { got: usize, max: usize },

    #[error("Cannot encode an empty slot vector")]
    EmptyInput,

    #[error(
        "Reduce length {length} must be a power of two no larger than {slots} slots"
    )]
    InvalidReduceLength { length: usize, slots: usize },

    #[error("Decryption failed: {message}")]
    Decryption { message: String },
}

pub type SchemeResult<T> = Result<T, SchemeError>;
