//! Client-side workflow logic for the BlockCMD drop dapp: the wallet
//! provider boundary, per-operation submission state machines, token
//! metadata reads and the controller that sequences approve-then-airdrop
//! against the Gaslite drop contract.
//!
//! The UI layer owns rendering and form wiring; everything that decides
//! *what* gets dispatched to the wallet, and *when*, lives here.

pub mod controller;
pub mod error;
pub mod provider;
pub mod state;
pub mod token;
pub mod transfer;

#[cfg(test)]
mod testing;

pub use controller::DropController;
pub use error::WorkflowError;
pub use provider::{ProviderError, TxHash, TxReceipt, WalletProvider, WalletSession};
pub use state::SubmissionState;
pub use token::TokenDescriptor;
pub use transfer::TransferRequest;
