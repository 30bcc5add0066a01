//! # Boardflow Client Library
//!
//! This crate carries the non-rendering half of the Boardflow browser UI:
//! a typed HTTP client over the JSON API and the board state a kanban view
//! drives (local ticket cache, priority filtering, optimistic drag moves
//! with server resynchronization).
//!
//! ## Module Organization
//!
//! - `api`: reqwest-based client for the Boardflow HTTP API
//! - `board`: client-side board state

pub mod api;
pub mod board;

pub use api::{ApiClient, ClientError};
pub use board::BoardState;
