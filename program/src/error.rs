use pinocchio::program_error::ProgramError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidProof,
    AlreadyClaimed,
    IndexOutOfRange,
    Unauthorized,
    ArithmeticError,
    ExceededTotalAmount,
    InsufficientVaultFunding,
    InsufficientVaultBalance,
    ExceededNodeCapacity,
}

impl From<ErrorCode> for ProgramError {
    fn from(e: ErrorCode) -> Self {
        Self::Custom(e as u32)
    }
}
