//! # Management Console Module
//!
//! This module implements the management console for the Ebus booking
//! service: everything a signed-in admin, driver, or rider can see and do,
//! driven from an interactive shell.
//!
//! ## Components
//!
//! - [`app`] - Console engine, rendering, and the interactive shell
//! - [`auth`] - Sign-in/sign-up gateway and credential-transition resolution
//! - [`session`] - The signed-in (or signed-out) session snapshot
//! - [`router`] - Page navigation and the travel-date floor
//! - [`dashboard`] - Role dashboards and the admin counting strategies
//! - [`forms`] - Form controllers with the shared submission contract
//! - [`search`] - Route search over active buses
//! - [`notices`] - Timed success/error banners
//! - [`roles`] - User role definitions
//!
//! ## Architecture
//!
//! The console follows a layered architecture:
//!
//! ```text
//! ┌─────────────────┐
//! │  ConsoleApp     │ ← Engine holding router, session, notices
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  AuthGateway    │ ← Role-checked sign-in, registration,
//! │  + forms        │   and one-write form controllers
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  Backend traits │ ← Identity provider and document store
//! └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ebus::backend::MemoryBackend;
//! use ebus::config::Config;
//! use ebus::console::ConsoleApp;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let backend = Arc::new(MemoryBackend::new());
//!     let mut app = ConsoleApp::new(config, backend.clone(), backend);
//!     app.run().await
//! }
//! ```
//!
//! ## Session Lifecycle
//!
//! 1. A command calls the gateway, which talks to the identity provider
//! 2. The provider publishes the settled credential on a watch channel
//! 3. The engine drains the channel and resolves each credential against
//!    the user's stored record
//! 4. A resolved sign-in routes to the dashboard; any resolution failure
//!    forces a sign-out and routes home
//!
//! Session state never changes outside step 3, so a forced sign-out in the
//! middle of a flow lands in exactly the same place as a user-initiated
//! one.

pub mod app;
pub mod auth;
pub mod dashboard;
pub mod forms;
pub mod notices;
pub mod roles;
pub mod router;
pub mod search;
pub mod session;

pub use app::ConsoleApp;
pub use roles::Role;
