//! # EcoCollect Pickup Backend
//!
//! Backend engine for the EcoCollect waste-collection platform.
//!
//! This crate keeps a customer's waste bins in sync with the collection
//! schedules published for their service zone. For every active bin it finds
//! the nearest upcoming schedule that accepts the bin's waste category and
//! reconciles the persisted "stop" records so that exactly one pending stop
//! exists per bin, on that nearest schedule. The backend exposes a REST API
//! via Axum for the mobile clients.
//!
//! ## Features
//!
//! - **Pickup lookup**: per-bin projection of the next matching collection run
//! - **Schedule reconciliation**: idempotent nearest-wins stop maintenance
//! - **Waste-type catalog**: canonical categories with display metadata
//! - **Zone browsing**: upcoming schedules for a service zone
//! - **HTTP API**: RESTful endpoints plus a live stop stream (SSE)
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and DTOs for API responses
//! - [`models`]: Domain entities and the waste-type matcher
//! - [`db`]: Repository pattern and persistence backends
//! - [`services`]: High-level pickup lookup and reconciliation logic
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
