//! Consulting project evaluator: estimates the cost, profit and margin of a
//! consulting engagement from its duration, sale price and staffing mix, and
//! keeps projects and consultant rate cards in PostgreSQL.

pub mod auth;
pub mod config;
pub mod costing;
pub mod db;
pub mod error;
pub mod export;
pub mod form;
pub mod models;
pub mod ui;
pub mod workspace;

pub use costing::{compute_cost, evaluate, Evaluation, RateTable};
pub use error::{EvaluatorError, Result};
