/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login, logout, me)
/// - `users`: User management endpoints
/// - `projects`: Project endpoints
/// - `tickets`: Ticket (board card) endpoints

pub mod auth;
pub mod health;
pub mod projects;
pub mod tickets;
pub mod users;
