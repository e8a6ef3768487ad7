use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleTreeError {
    #[error("Merkle Tree Validation Error: {0}")]
    MerkleValidationError(String),
    #[error("Arithmetic Error (overflow/underflow)")]
    ArithmeticError,
    #[error("Empty input provided")]
    EmptyInput,
    #[error("Index out of range")]
    IndexOutOfRange,
    #[error("io Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Serde Error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
