use alloy_primitives::{address, Address, B256};

/// Chain id of the Klaytn Baobab testnet.
pub const BAOBAB_CHAIN_ID: u64 = 1001;
/// Chain id of the Klaytn Cypress mainnet.
pub const CYPRESS_CHAIN_ID: u64 = 8217;

/// Drop contract deployment on Baobab.
pub const DROP_CONTRACT_BAOBAB: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
/// Drop contract deployment on Cypress.
pub const DROP_CONTRACT_CYPRESS: Address = address!("09350F89e2D7B6e96bA730783c2d76137B045FEF");

/// Static profile of a network the drop contract is deployed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainProfile {
    pub chain_id: u64,
    pub name: &'static str,
    /// Address of the drop contract on this chain; doubles as the spender
    /// for ERC-20 approvals.
    pub drop_contract: Address,
    explorer_base: &'static str,
}

impl ChainProfile {
    /// Block-explorer URL for a transaction hash on this chain.
    pub fn explorer_tx_url(&self, hash: B256) -> String {
        format!("{}/tx/{hash}", self.explorer_base)
    }
}

/// Resolves the profile for `chain_id`. Baobab is matched exactly; every
/// other id falls back to the Cypress deployment, the default network.
pub fn chain_profile(chain_id: u64) -> ChainProfile {
    if chain_id == BAOBAB_CHAIN_ID {
        ChainProfile {
            chain_id,
            name: "baobab",
            drop_contract: DROP_CONTRACT_BAOBAB,
            explorer_base: "https://baobab.klaytnfinder.io",
        }
    } else {
        ChainProfile {
            chain_id,
            name: "cypress",
            drop_contract: DROP_CONTRACT_CYPRESS,
            explorer_base: "https://klaytnfinder.io",
        }
    }
}

/// First and last six characters of an address or hash, for display and logs.
pub fn abbreviate(hex: &str) -> String {
    if hex.len() <= 12 {
        return hex.to_string();
    }
    format!("{}...{}", &hex[..6], &hex[hex.len() - 6..])
}
