//! Stockroom API Library
//!
//! This crate provides the core functionality for the Stockroom inventory
//! management API: a relational store (categories, suppliers, products and
//! an append-only stock-movement ledger) exposed over REST/JSON.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use api::api_routes;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Assemble the shared state from an open pool and a connected event
    /// sender.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let services = handlers::AppServices::new(db.clone(), event_sender.clone());

        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}
