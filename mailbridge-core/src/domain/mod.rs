//! Core domain types
//!
//! This module contains the domain structures of the bridge protocol: the
//! message envelope published by the bridge endpoint, the acceptance rules
//! evaluated against it, and the terminal outcome of a listen operation.

pub mod message;
pub mod outcome;
