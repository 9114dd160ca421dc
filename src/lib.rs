// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MLS Fixtures: browse upcoming Major League Soccer games, keep favorites,
//! and manage a user profile.
//!
//! This crate provides the client-side state layer over TheSportsDB,
//! Firestore, Firebase Storage, and Firebase Authentication.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod time_utils;
pub mod validation;

pub use state::AppContext;
