use alloy_primitives::U256;
use gaslite::units::UnitsError;
use thiserror::Error;

use crate::provider::ProviderError;

/// This enum describes workflow controller errors. Every variant is
/// recoverable: the user corrects the input or re-triggers the form.
#[derive(Error, Debug, PartialEq)]
pub enum WorkflowError {
    #[error("{0}")]
    Units(#[from] UnitsError),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid address: {input}")]
    InvalidAddress { input: String },

    #[error("No wallet connected")]
    WalletNotConnected {},

    #[error("Recipient list is empty")]
    NoRecipients {},

    #[error("Got {recipients} recipients but {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },

    #[error("A {operation} transaction is already awaiting signature or confirmation")]
    OperationInFlight { operation: &'static str },

    #[error("Allowance {allowance} is below the airdrop total {total}")]
    InsufficientAllowance { allowance: U256, total: U256 },

    #[error("Token metadata unavailable: {reason}")]
    ReadFailure { reason: String },
}
