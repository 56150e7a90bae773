// src/lib.rs

//! _ff14lib_ reads the binary chat log files written by the game client and
//! decodes each record to a line of text.
//!
//! See [`readers`] for an overview of processing and [`data`] for
//! definitions.

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
