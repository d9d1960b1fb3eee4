//! Personal expense tracking API.
//!
//! Every `/api/expenses` route sits behind a token gate (`x-auth-token`) and
//! only ever touches records owned by the caller.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repos;
pub mod services;
pub mod state;
