// src/tests/mod.rs

//! Tests for _ff14lib_.
//!
//! Tests are placed at `src/tests/`, inside the `ff14lib`. This is a
//! reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility.

pub mod common;
