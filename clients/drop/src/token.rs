use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, U256};
use gaslite::calls::{Erc20Query, QueryValue, TokenRead};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::provider::ProviderError;

/// Metadata for the token currently selected in the airdrop form, together
/// with the allowance already granted to the drop contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    /// Allowance granted by the connected account to the drop contract on
    /// the active chain. Chain- and token-scoped, so any address or chain
    /// change invalidates it.
    pub allowance: U256,
}

/// Builds the batched read used to populate a [`TokenDescriptor`].
pub(crate) fn token_info_reads(
    token: Address,
    owner: Address,
    spender: Address,
) -> Vec<TokenRead> {
    vec![
        TokenRead {
            token,
            query: Erc20Query::Allowance { owner, spender },
        },
        TokenRead {
            token,
            query: Erc20Query::Symbol,
        },
        TokenRead {
            token,
            query: Erc20Query::Name,
        },
        TokenRead {
            token,
            query: Erc20Query::Decimals,
        },
    ]
}

/// Decodes batched read results in the order [`token_info_reads`] issues
/// them. Any per-item failure or shape mismatch makes the whole descriptor
/// unavailable; a non-contract address typically fails all four reads.
pub(crate) fn decode_token_info(
    token: Address,
    results: Vec<Result<QueryValue, ProviderError>>,
) -> Result<TokenDescriptor, WorkflowError> {
    let [allowance, symbol, name, decimals]: [Result<QueryValue, ProviderError>; 4] = results
        .try_into()
        .map_err(|_| read_failure("unexpected result count"))?;

    Ok(TokenDescriptor {
        address: token,
        allowance: expect_uint("allowance", allowance)?,
        symbol: expect_text("symbol", symbol)?,
        name: expect_text("name", name)?,
        decimals: expect_byte("decimals", decimals)?,
    })
}

fn read_failure(reason: impl Into<String>) -> WorkflowError {
    WorkflowError::ReadFailure {
        reason: reason.into(),
    }
}

fn expect_uint(field: &str, result: Result<QueryValue, ProviderError>) -> Result<U256, WorkflowError> {
    match result {
        Ok(QueryValue::Uint(value)) => Ok(value),
        Ok(_) => Err(read_failure(format!("{field}: unexpected result type"))),
        Err(err) => Err(read_failure(format!("{field}: {err}"))),
    }
}

fn expect_text(
    field: &str,
    result: Result<QueryValue, ProviderError>,
) -> Result<String, WorkflowError> {
    match result {
        Ok(QueryValue::Text(value)) => Ok(value),
        Ok(_) => Err(read_failure(format!("{field}: unexpected result type"))),
        Err(err) => Err(read_failure(format!("{field}: {err}"))),
    }
}

fn expect_byte(field: &str, result: Result<QueryValue, ProviderError>) -> Result<u8, WorkflowError> {
    match result {
        Ok(QueryValue::Byte(value)) => Ok(value),
        Ok(_) => Err(read_failure(format!("{field}: unexpected result type"))),
        Err(err) => Err(read_failure(format!("{field}: {err}"))),
    }
}

/// Latest-wins cache for token metadata. Each refresh takes a generation
/// ticket; a commit from a superseded refresh is dropped, so the UI only
/// ever reflects the most recently requested address.
pub(crate) struct TokenInfoCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    generation: u64,
    current: Option<TokenDescriptor>,
}

impl TokenInfoCache {
    pub(crate) fn new() -> Self {
        TokenInfoCache {
            inner: Mutex::new(CacheInner {
                generation: 0,
                current: None,
            }),
        }
    }

    /// Marks the start of a refresh and returns its ticket.
    pub(crate) fn begin_refresh(&self) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.generation
    }

    /// Stores `descriptor` unless a newer refresh started after `ticket` was
    /// taken. Returns whether the commit was applied.
    pub(crate) fn commit(&self, ticket: u64, descriptor: Option<TokenDescriptor>) -> bool {
        let mut inner = self.lock();
        if ticket != inner.generation {
            tracing::debug!(
                ticket,
                generation = inner.generation,
                "discarding superseded token info"
            );
            return false;
        }
        inner.current = descriptor;
        true
    }

    pub(crate) fn current(&self) -> Option<TokenDescriptor> {
        self.lock().current.clone()
    }

    /// Decimals for `token`, when the cached descriptor is for that token.
    pub(crate) fn decimals_for(&self, token: Address) -> Option<u8> {
        self.lock()
            .current
            .as_ref()
            .filter(|descriptor| descriptor.address == token)
            .map(|descriptor| descriptor.decimals)
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
