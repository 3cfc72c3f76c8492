//! Core services.
//!
//! - `blockchain`: provider transports, node clients and the connection interface

pub mod blockchain;
