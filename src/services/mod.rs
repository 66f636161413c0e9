// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod filter;
pub mod recurrence;

pub use filter::RideFilter;
pub use recurrence::{expand_rides, expand_rides_with, is_occurrence_of, SkipReason};
