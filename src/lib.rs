//! Review Collector - Guided questionnaire bot for customer reviews
//!
//! Walks a customer through the questions configured for their business
//! type, turns the answers into a review with a language model, and lets
//! them edit, share or restart it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
