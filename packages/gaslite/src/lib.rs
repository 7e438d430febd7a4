//! Typed interface to the Gaslite drop protocol: the contract call surface,
//! the registry of chains it is deployed on, and fixed-point token unit
//! conversion. Pure types, no I/O; the wallet provider owns ABI encoding.

pub mod calls;
pub mod chain;
pub mod units;
