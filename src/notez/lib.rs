//! # Notez Architecture
//!
//! Notez is a **UI-agnostic study-notes library**: it turns uploaded files into
//! note content, stores notes per signed-in owner, and renders note markup.
//! The CLI is one client of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, wires collaborators, prints results    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Session enforcement, selector parsing                    │
//! │  - Runs ingestion and folds it into a draft                 │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Commands (commands/*.rs)     │ │  Ingestion (ingest/)      │
//! │  create / list / view / delete│ │  classify, extract or     │
//! │                               │ │  upload, merge            │
//! └───────────────────────────────┘ └───────────────────────────┘
//!                 │
//!                 ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - NoteStore trait: FileStore, InMemoryStore                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ingestion
//!
//! Each file is classified as text-like or binary-like ([`classify`]).
//! Text-like files are read locally. Binary-like files go to the extraction
//! collaborator, falling back to a plain upload when extraction fails. Files
//! are processed concurrently; results are merged in completion order and a
//! file that yields nothing is reported through a notification sink instead
//! of failing the batch.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Logging goes through `tracing`; the binary installs the subscriber.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for note commands
//! - [`ingest`]: Concurrent ingestion pipeline and its collaborator traits
//! - [`classify`]: Text-like / binary-like classification
//! - [`extract`], [`upload`]: Production extraction and upload collaborators
//! - [`preview`]: Preview descriptors and kinds
//! - [`draft`]: Note drafts and title suggestions
//! - [`render`]: Minimal markdown-to-HTML renderer
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Note`, `NoteMetadata`, `Session`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod classify;
pub mod commands;
pub mod config;
pub mod draft;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod preview;
pub mod render;
pub mod store;
pub mod upload;
