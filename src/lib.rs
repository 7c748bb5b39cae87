// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ZenStep: a private, device-local step tracker
//!
//! This crate turns accelerometer samples into step counts, keeps one
//! daily record per date in a local key-value store, and serves dashboard,
//! history and calendar views to a thin web front end.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{CoachService, Tracker};
use tokio::sync::Mutex;

/// Shared application state.
///
/// All tracking state lives in one `Tracker` behind a single lock, so step
/// updates and their persistence never interleave.
pub struct AppState {
    pub config: Config,
    pub tracker: Mutex<Tracker>,
    pub coach: CoachService,
}
