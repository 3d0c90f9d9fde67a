//! kbsync core library
//!
//! Incremental sync of a markdown vault into a remote knowledge base.

pub mod config;
pub mod detect;
pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod logging;
pub mod reconcile;
pub mod remote;
pub mod sync;
pub mod vault;
