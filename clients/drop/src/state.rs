use std::sync::{Mutex, MutexGuard, PoisonError};

use gaslite::calls::WriteRequest;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::provider::{ProviderError, TxHash, WalletProvider};

/// Lifecycle of one wallet-mediated write operation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// No transaction hash yet; nothing outstanding.
    Idle,
    /// Write dispatched to the wallet; waiting for the user to sign.
    PendingSignature,
    /// Signed and broadcast; waiting for network inclusion.
    PendingConfirmation { hash: TxHash },
    /// Receipt observed with a success status.
    Confirmed { hash: TxHash },
    /// Wallet rejection or on-chain revert. Retryable.
    Failed { reason: String },
}

impl SubmissionState {
    /// A transaction is outstanding; the submit control stays disabled.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SubmissionState::PendingSignature | SubmissionState::PendingConfirmation { .. }
        )
    }

    /// Transaction hash, once the wallet has returned one.
    pub fn hash(&self) -> Option<TxHash> {
        match self {
            SubmissionState::PendingConfirmation { hash }
            | SubmissionState::Confirmed { hash } => Some(*hash),
            _ => None,
        }
    }
}

/// One instance of the submission state machine. The approve and airdrop
/// workflows each own an independent instance.
pub(crate) struct Operation {
    name: &'static str,
    state: Mutex<SubmissionState>,
}

impl Operation {
    pub(crate) fn new(name: &'static str) -> Self {
        Operation {
            name,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub(crate) fn snapshot(&self) -> SubmissionState {
        self.lock().clone()
    }

    /// Refuses overlapping submissions, then records that a signature
    /// request went out. Check and transition happen under one lock.
    fn begin(&self) -> Result<(), WorkflowError> {
        let mut state = self.lock();
        if state.is_in_flight() {
            return Err(WorkflowError::OperationInFlight {
                operation: self.name,
            });
        }
        tracing::info!(operation = self.name, "dispatching signature request");
        *state = SubmissionState::PendingSignature;
        Ok(())
    }

    fn set(&self, next: SubmissionState) {
        tracing::info!(operation = self.name, state = ?next, "submission state changed");
        *self.lock() = next;
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drives a validated write through the machine: signature, broadcast,
    /// confirmation. The terminal state is recorded for the UI and the
    /// outcome returned to the caller. No retry, no local timeout.
    pub(crate) async fn drive(
        &self,
        provider: &dyn WalletProvider,
        request: WriteRequest,
    ) -> Result<TxHash, WorkflowError> {
        self.begin()?;
        let hash = match provider.write(request).await {
            Ok(hash) => hash,
            Err(err) => {
                self.set(SubmissionState::Failed {
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };
        self.set(SubmissionState::PendingConfirmation { hash });
        match provider.wait_for_receipt(hash).await {
            Ok(receipt) if receipt.status => {
                self.set(SubmissionState::Confirmed { hash });
                Ok(hash)
            }
            Ok(_) => {
                let err = ProviderError::Reverted(None);
                self.set(SubmissionState::Failed {
                    reason: err.to_string(),
                });
                Err(err.into())
            }
            Err(err) => {
                self.set(SubmissionState::Failed {
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }
}
