//! Logo generation job service
//!
//! Accepts logo generation requests, forwards them to an external automation
//! webhook, stores the results that webhook calls back with in a layered
//! store, and serves them to polling clients. The [`client`] module is the
//! polling side of the same contract.

pub mod app_state;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
