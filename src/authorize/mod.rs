//! Authorization endpoint core.
//!
//! One [`AuthorizationDecision`](decision::AuthorizationDecision) is created per
//! request and handed to an ordered [`DeciderChain`](chain::DeciderChain); the
//! first decider that resolves it or sets a custom response ends the walk.

pub mod chain;
pub mod config;
pub mod decider;
pub mod decision;
pub mod endpoint;
pub mod error;
pub mod memory;
pub mod outcome;
pub mod provider;
pub mod types;
pub mod url_encoding;
