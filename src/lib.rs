//! # Ebus - Management Console for Bus-Transport Booking
//!
//! Ebus is the management console of a bus-transport booking service. It talks
//! to a managed identity provider for authentication and a document database
//! for records, and drives the whole admin/driver/rider experience from an
//! interactive shell.
//!
//! ## Features
//!
//! - **Role-Based Sessions**: Admin, driver, and rider accounts with a
//!   claimed-role check at login and an admin verification code at signup.
//! - **Driver Fleet Forms**: Bus details, vehicle profile, and contact
//!   information forms with a uniform validate-then-write contract.
//! - **Admin Statistics**: Per-metric counting strategies with automatic
//!   fallback from backend-filtered queries to client-side scans.
//! - **Route Search**: Case-insensitive substring matching over active buses
//!   with placeholder arrival estimates and seat availability.
//! - **Degradation-First Design**: Every backend failure is contained to the
//!   panel or form that triggered it and recorded in a diagnostic ring
//!   buffer.
//! - **Async Design**: Built with Tokio; backends sit behind async traits so
//!   the bundled in-memory backend and a hosted deployment are
//!   interchangeable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ebus::backend::MemoryBackend;
//! use ebus::config::Config;
//! use ebus::console::ConsoleApp;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load("config.toml").await?;
//!
//!     // Open the snapshot-backed store and start the console
//!     let backend = Arc::new(MemoryBackend::open(&config.backend.snapshot_path()).await?);
//!     let mut app = ConsoleApp::new(config, backend.clone(), backend);
//!     app.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`console`] - Engine, dashboards, forms, search, and the shell
//! - [`backend`] - Identity-provider and document-store traits plus the
//!   in-memory backend
//! - [`models`] - Typed views of the stored documents
//! - [`config`] - Configuration management
//! - [`validation`] - Form validation rules and lenient numeric parsing
//! - [`logbuffer`] - In-process diagnostic ring buffer
//!
//! ## Architecture
//!
//! Ebus uses a modular architecture with clear separation of concerns:
//!
//! ```text
//! ┌─────────────────┐
//! │   Console       │ ← Pages, forms, dashboards
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Backend       │ ← Identity + document traits
//! │   Seams         │
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Memory        │ ← Accounts, collections, snapshot
//! │   Backend       │
//! └─────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod console;
pub mod logbuffer;
pub mod models;
pub mod validation;
