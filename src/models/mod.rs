// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod comment;
pub mod participant;
pub mod preferences;
pub mod ride;
pub mod ride_input;

pub use comment::{Comment, NewComment};
pub use participant::RideParticipant;
pub use preferences::{PreferencesInput, PreferencesPatch, UserPreferences};
pub use ride::{ExpandedRide, RecurrencePattern, Ride};
pub use ride_input::{RideInput, RidePatch};
