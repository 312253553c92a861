//! Gridlock (workspace facade crate).
//!
//! This package keeps the `gridlock::{core,adapter,types}` public API stable
//! while the implementation lives in dedicated crates under `crates/`.

pub use gridlock_adapter as adapter;
pub use gridlock_core as core;
pub use gridlock_types as types;
