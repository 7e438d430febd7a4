use std::sync::Arc;

use alloy_primitives::Address;
use gaslite::calls::WriteRequest;
use gaslite::chain::{abbreviate, chain_profile};
use gaslite::units::{parse_units, DEFAULT_DECIMALS};
use itertools::Itertools;

use crate::error::WorkflowError;
use crate::provider::{TxHash, WalletProvider, WalletSession};
use crate::state::{Operation, SubmissionState};
use crate::token::{decode_token_info, token_info_reads, TokenDescriptor, TokenInfoCache};
use crate::transfer::{parse_address, TransferRequest};

/// Coordinates the two wallet-mediated write operations of the airdrop flow
/// (approve, then airdrop) plus the token metadata reads feeding them.
///
/// The two submission machines are independent: approve and airdrop may be
/// in flight at the same time, and a failure in one never touches the
/// other. Approve-before-airdrop ordering stays the user's responsibility;
/// the controller only refuses an ERC-20 airdrop whose freshly read
/// allowance cannot cover the declared total.
pub struct DropController {
    provider: Arc<dyn WalletProvider>,
    approve: Operation,
    airdrop: Operation,
    token: TokenInfoCache,
}

impl DropController {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        DropController {
            provider,
            approve: Operation::new("approve"),
            airdrop: Operation::new("airdrop"),
            token: TokenInfoCache::new(),
        }
    }

    /// Current state of the approve submission machine.
    pub fn approve_state(&self) -> SubmissionState {
        self.approve.snapshot()
    }

    /// Current state of the airdrop submission machine.
    pub fn airdrop_state(&self) -> SubmissionState {
        self.airdrop.snapshot()
    }

    /// Most recently committed token metadata, if any.
    pub fn token_info(&self) -> Option<TokenDescriptor> {
        self.token.current()
    }

    fn require_session(&self) -> Result<WalletSession, WorkflowError> {
        self.provider
            .session()
            .ok_or(WorkflowError::WalletNotConnected {})
    }

    /// Reads allowance, symbol, name and decimals for `token_address` on the
    /// active chain and commits them to the cache. Callers re-trigger this
    /// whenever the address or the chain changes. Returns `Ok(None)` when a
    /// newer refresh superseded this one while it was in flight.
    pub async fn refresh_token_info(
        &self,
        token_address: &str,
    ) -> Result<Option<TokenDescriptor>, WorkflowError> {
        let token = parse_address(token_address)?;
        let session = self.require_session()?;
        let ticket = self.token.begin_refresh();
        match self.fetch_token_info(token, session).await {
            Ok(descriptor) => {
                if self.token.commit(ticket, Some(descriptor.clone())) {
                    Ok(Some(descriptor))
                } else {
                    Ok(None)
                }
            }
            Err(err) => {
                // A failed read must not leave the previous token's data on
                // display.
                self.token.commit(ticket, None);
                Err(err)
            }
        }
    }

    async fn fetch_token_info(
        &self,
        token: Address,
        session: WalletSession,
    ) -> Result<TokenDescriptor, WorkflowError> {
        let spender = chain_profile(session.chain_id).drop_contract;
        tracing::debug!(token = %token, chain_id = session.chain_id, "reading token metadata");
        let reads = token_info_reads(token, session.address, spender);
        let results = self
            .provider
            .read_batch(reads)
            .await
            .map_err(|err| WorkflowError::ReadFailure {
                reason: err.to_string(),
            })?;
        decode_token_info(token, results)
    }

    /// Submits an `approve` call granting the drop contract an allowance of
    /// `amount` (human units). Validation is synchronous and happens before
    /// anything reaches the wallet; the returned future then drives the
    /// approve machine to a terminal state.
    pub async fn submit_approval(
        &self,
        token_address: &str,
        amount: &str,
    ) -> Result<TxHash, WorkflowError> {
        let session = self.require_session()?;
        let token = parse_address(token_address)?;
        let decimals = match self.token.decimals_for(token) {
            Some(decimals) => decimals,
            None => {
                tracing::warn!(token = %token, default = DEFAULT_DECIMALS, "no cached metadata, assuming default decimals");
                DEFAULT_DECIMALS
            }
        };
        let amount = parse_units(amount, decimals)?;
        let spender = chain_profile(session.chain_id).drop_contract;
        let request = WriteRequest::erc20_approve(token, spender, amount);
        self.approve.drive(self.provider.as_ref(), request).await
    }

    /// Submits an `airdropERC20` call. Takes a fresh metadata read first, so
    /// amount conversion uses the token's real precision and dispatch can be
    /// gated on a sufficient allowance; a revert the chain would reject
    /// anyway is refused client-side instead.
    pub async fn submit_airdrop_erc20(
        &self,
        token_address: &str,
        recipients: &str,
        amounts: &str,
        total: &str,
    ) -> Result<TxHash, WorkflowError> {
        let session = self.require_session()?;
        let token = parse_address(token_address)?;
        let info = self.fetch_token_info(token, session).await?;
        let ticket = self.token.begin_refresh();
        self.token.commit(ticket, Some(info.clone()));

        let transfer = TransferRequest::parse(recipients, amounts, total, info.decimals)?;
        if info.allowance < transfer.total {
            return Err(WorkflowError::InsufficientAllowance {
                allowance: info.allowance,
                total: transfer.total,
            });
        }

        let drop_contract = chain_profile(session.chain_id).drop_contract;
        tracing::info!(
            token = %token,
            recipients = %transfer
                .recipients
                .iter()
                .map(|recipient| abbreviate(&recipient.to_string()))
                .join(","),
            total = %transfer.total,
            "submitting ERC-20 airdrop"
        );
        let request = WriteRequest::airdrop_erc20(
            drop_contract,
            token,
            transfer.recipients,
            transfer.amounts,
            transfer.total,
        );
        self.airdrop.drive(self.provider.as_ref(), request).await
    }

    /// Submits an `airdropETH` call distributing the native coin; the total
    /// rides along as the attached call value. Native precision is fixed at
    /// 18 decimals and no allowance is involved.
    pub async fn submit_airdrop_native(
        &self,
        recipients: &str,
        amounts: &str,
        total: &str,
    ) -> Result<TxHash, WorkflowError> {
        let session = self.require_session()?;
        let transfer = TransferRequest::parse(recipients, amounts, total, DEFAULT_DECIMALS)?;
        let drop_contract = chain_profile(session.chain_id).drop_contract;
        tracing::info!(
            recipients = transfer.recipients.len(),
            total = %transfer.total,
            "submitting native airdrop"
        );
        let request = WriteRequest::airdrop_eth(
            drop_contract,
            transfer.recipients,
            transfer.amounts,
            transfer.total,
        );
        self.airdrop.drive(self.provider.as_ref(), request).await
    }
}
