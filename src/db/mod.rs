// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (in-process store).

pub mod memory;

pub use memory::{new_id, MemoryDb};
