//! Ethereum node client detection and capability dispatch.
//!
//! Connects to a node through a provider URI, reads its `web3_clientVersion`
//! identifier and hands back a client adapter for the detected technology
//! (Geth, Parity, Ganache, an Infura gateway or a generic fallback) exposing a
//! uniform interface for chain identity, locality and account unlocking.
//!
//! # Layout
//! - `models`: client identity, chain registries, URIs and configuration
//! - `services`: transports, node clients, registry and connection interface
//! - `utils`: logging setup and shared error context

pub mod models;
pub mod services;
pub mod utils;
