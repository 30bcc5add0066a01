/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Security headers
///
/// Session authentication middleware lives in `boardflow_shared::auth` and is
/// wired up per route group in `app.rs`.

pub mod security;
