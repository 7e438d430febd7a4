use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Write calls understood by an ERC-20 token contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Erc20Call {
    /// Authorizes `spender` to transfer up to `amount` of the caller's tokens.
    Approve { spender: Address, amount: U256 },
}

/// Write calls understood by the drop contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DropCall {
    /// Batched ERC-20 distribution. The contract pulls `total` from the
    /// caller's allowance and fans it out per `amounts`.
    AirdropErc20 {
        token: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        total: U256,
    },
    /// Batched native-coin distribution; the distributed funds ride along
    /// as the attached call value.
    AirdropEth {
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    },
}

/// Any write the airdrop workflow can dispatch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractCall {
    Erc20(Erc20Call),
    Drop(DropCall),
}

impl ContractCall {
    /// ABI entry point the wallet provider encodes the call against.
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::Erc20(Erc20Call::Approve { .. }) => "approve",
            ContractCall::Drop(DropCall::AirdropErc20 { .. }) => "airdropERC20",
            ContractCall::Drop(DropCall::AirdropEth { .. }) => "airdropETH",
        }
    }
}

/// A write handed to the wallet provider for signing and dispatch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WriteRequest {
    /// Contract the call is addressed to.
    pub to: Address,
    /// Native value attached to the call.
    pub value: U256,
    pub call: ContractCall,
}

impl WriteRequest {
    pub fn erc20_approve(token: Address, spender: Address, amount: U256) -> Self {
        WriteRequest {
            to: token,
            value: U256::ZERO,
            call: ContractCall::Erc20(Erc20Call::Approve { spender, amount }),
        }
    }

    pub fn airdrop_erc20(
        drop_contract: Address,
        token: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        total: U256,
    ) -> Self {
        WriteRequest {
            to: drop_contract,
            value: U256::ZERO,
            call: ContractCall::Drop(DropCall::AirdropErc20 {
                token,
                recipients,
                amounts,
                total,
            }),
        }
    }

    /// The native variant carries the distributed total as the call value.
    pub fn airdrop_eth(
        drop_contract: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        total: U256,
    ) -> Self {
        WriteRequest {
            to: drop_contract,
            value: total,
            call: ContractCall::Drop(DropCall::AirdropEth {
                recipients,
                amounts,
            }),
        }
    }
}

/// Read-only ERC-20 queries issued while refreshing token metadata.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Erc20Query {
    Allowance { owner: Address, spender: Address },
    Symbol,
    Name,
    Decimals,
}

/// One entry of a batched read against `token`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenRead {
    pub token: Address,
    pub query: Erc20Query,
}

/// Decoded result of a single read query.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryValue {
    Uint(U256),
    Byte(u8),
    Text(String),
}
