//! Mailbridge Core
//!
//! Core types for the mailbridge message-waiting library.
//!
//! This crate contains:
//! - Domain types: the relayed message envelope and its acceptance rules
//! - Poll outcomes: the terminal results of a listen operation
//!
//! Note: all types here are I/O-free; fetching and polling live in the
//! client crate.

pub mod domain;
