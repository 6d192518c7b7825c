//! # Pharmsys Architecture
//!
//! Pharmsys is a **UI-agnostic pharmacy record library**. The CLI is one
//! client of it; the same core could sit behind a desktop shell or a web
//! front-end without changes.
//!
//! ## The Three Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs + args.rs)                              │
//! │  - Parses arguments, formats listings, handles terminal I/O │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core Layer (records.rs, session.rs)                        │
//! │  - CRUD, search, derived views, snapshot import/export      │
//! │  - Operates on Rust types, returns Result types             │
//! │  - Generic over the collections via the Document trait      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract BlobStore trait (string key → JSON text)        │
//! │  - FileBlobStore (production), MemoryBlobStore (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership and Failure Policy
//!
//! The [`records::RecordStore`] is an explicit instance constructed at
//! startup and handed to whoever needs it; there is no ambient global. All
//! read operations return owned clones, so the only path that mutates a
//! stored record is [`records::RecordStore::update`].
//!
//! Every mutation persists the full store synchronously. A persistence
//! failure is logged and absorbed: availability is preferred over
//! durability, and the in-memory state remains authoritative until the
//! process exits. Not-found and parse failures are ordinary `Err` values
//! for the caller to present.
//!
//! ## Module Overview
//!
//! - [`records`]: the record store — CRUD, search, low-stock and expiring
//!   views, snapshots
//! - [`model`]: record types, the `Document` trait, status enums
//! - [`seed`]: the fixed default data set
//! - [`session`]: demo login sessions and advisory role permissions
//! - [`store`]: blob persistence boundary and its implementations
//! - [`config`]: small on-disk configuration
//! - [`validate`]: shape checks for contact fields
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod model;
pub mod records;
pub mod seed;
pub mod session;
pub mod store;
pub mod validate;
