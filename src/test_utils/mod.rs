//! Shared test helpers: config builders, portal and CSV fixtures, and mock
//! portal/store implementations.

#![cfg(test)]

pub mod config;
pub mod fixtures;
