use std::str::FromStr;

use alloy_primitives::{Address, U256};
use gaslite::units::parse_units;

use crate::error::WorkflowError;

/// A validated airdrop request: recipients, per-recipient amounts and the
/// declared total, all in smallest token units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipients: Vec<Address>,
    pub amounts: Vec<U256>,
    pub total: U256,
}

/// Parses a single `0x…` address. Pasted address lists tend to carry
/// whitespace, so any embedded whitespace is stripped first.
pub(crate) fn parse_address(input: &str) -> Result<Address, WorkflowError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    Address::from_str(&cleaned).map_err(|_| WorkflowError::InvalidAddress {
        input: input.trim().to_string(),
    })
}

impl TransferRequest {
    /// Parses comma-separated recipient and amount lists, order-preserving.
    /// Recipient and amount counts must match, and amounts are scaled by
    /// `decimals`. The declared total is not required to equal the element
    /// sum (the drop contract enforces that), but a mismatch is logged.
    pub fn parse(
        recipients: &str,
        amounts: &str,
        total: &str,
        decimals: u8,
    ) -> Result<Self, WorkflowError> {
        if recipients.trim().is_empty() {
            return Err(WorkflowError::NoRecipients {});
        }
        let recipients = recipients
            .split(',')
            .map(parse_address)
            .collect::<Result<Vec<_>, _>>()?;
        let amounts = amounts
            .split(',')
            .map(|entry| parse_units(entry, decimals).map_err(WorkflowError::from))
            .collect::<Result<Vec<_>, _>>()?;
        if recipients.len() != amounts.len() {
            return Err(WorkflowError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        let total = parse_units(total, decimals)?;
        let sum = amounts
            .iter()
            .fold(U256::ZERO, |acc, amount| acc.saturating_add(*amount));
        if sum != total {
            tracing::warn!(%sum, %total, "declared total differs from the sum of airdrop amounts");
        }
        Ok(TransferRequest {
            recipients,
            amounts,
            total,
        })
    }
}
