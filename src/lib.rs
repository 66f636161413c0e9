// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Group Rides: discover, organize and join group cycling rides
//!
//! This crate provides the backend API for ride listings. Recurring rides
//! are stored once as templates and expanded into dated occurrences when
//! listed (see [`services::recurrence`]).

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MemoryDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: MemoryDb,
}
