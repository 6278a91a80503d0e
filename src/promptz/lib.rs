//! # Promptz Architecture
//!
//! Promptz is a **UI-agnostic prompt manager library**. The CLI in `main.rs`
//! is one client of it; the core never assumes a terminal.
//!
//! ## The Layer Stack
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs + main.rs)                              │
//! │  - Parses arguments, formats output, runs the watch loop    │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns persistence plumbing and the debounce timers        │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic per operation                             │
//! │  - Interactive choices go through the Decider trait         │
//! │  - No I/O assumptions beyond the paths it is handed         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Data + Sync Layer (repo.rs, store/, sync/)                 │
//! │  - Repository over an in-memory Snapshot                    │
//! │  - KvBackend persistence (FsBackend prod, MemBackend tests) │
//! │  - File and remote adapters with debounced writers          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Selector System
//!
//! Listings label prompts positionally (`1`, `2`, … newest first; `t1` for
//! Trash). Commands accept those labels or raw ids interchangeably; see
//! `selector.rs` for the resolution rules.
//!
//! ## Key Principle: Decisions Are Injected
//!
//! Anything that would ask the user a question (overwrite confirmations,
//! the remote load/merge/keep choice) goes through the [`decide::Decider`]
//! trait. The CLI passes a stdin implementation; tests pass a scripted one.
//! Core code never blocks on a terminal.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests over `MemBackend` with a
//!    manual clock. This is where the lion's share of testing lives.
//! 2. **Sync** (`sync/`, `timer.rs`): adapter and debounce tests with
//!    scripted object stores and explicit instants.
//! 3. **CLI** (`tests/cli_e2e.rs`): end-to-end runs of the binary against a
//!    sandboxed data dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The application facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`repo`]: Record CRUD over the working snapshot
//! - [`model`]: Core data types (`Prompt`, `Snapshot`)
//! - [`store`]: Key-value persistence (filesystem and in-memory backends)
//! - [`sync`]: File and remote adapters, reconciliation merge
//! - [`filter`]: Listing queries (folder, tag, favorites, search, sort)
//! - [`selector`]: Positional label and id resolution
//! - [`decide`]: Injected interactive choices
//! - [`timer`]: Clock abstraction, debounce and poll timers
//! - [`config`]: Configuration management
//! - [`color`]: Deterministic tag colors
//! - [`init`]: Data-dir resolution and app construction for the binary
//! - [`error`]: Error types

pub mod api;
pub mod color;
pub mod commands;
pub mod config;
pub mod decide;
pub mod error;
pub mod filter;
pub mod init;
pub mod model;
pub mod repo;
pub mod selector;
pub mod store;
pub mod sync;
pub mod timer;
