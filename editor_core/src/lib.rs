#![no_std]

//! # Editor Core
//!
//! Key-event-driven editing engine for Python source buffers.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: Uses alloc but not std
//! - **Deterministic**: Same key sequence => same buffer and completion state
//! - **One branch per key**: Every key press takes exactly one route
//! - **Mechanism over policy**: Core edits text, hosts decide rendering, files, and navigation
//!
//! ## Design
//!
//! The core provides:
//! - TextBuffer: Capability the engine edits through, with LineBuffer as the host buffer
//! - KeyEventRouter: Dispatch of Backspace, Tab, Enter, pairs, and completion keys
//! - CompletionEngine: Prefix completion against a shared KeywordSet
//! - EditorSnapshot: Deterministic state for replay tests

extern crate alloc;

pub mod buffer;
pub mod completion;
pub mod config;
pub mod indent;
pub mod keywords;
pub mod pairs;
pub mod router;
pub mod snapshot;

pub use buffer::{Cursor, LineBuffer, Position, TextBuffer};
pub use completion::{CompletionEngine, CompletionState};
pub use config::EngineConfig;
pub use keywords::KeywordSet;
pub use pairs::{PairTable, STANDARD_PAIRS};
pub use router::{KeyEventRouter, Route};
pub use snapshot::EditorSnapshot;
