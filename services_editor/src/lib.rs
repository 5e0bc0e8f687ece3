//! # Python Editor Service
//!
//! This crate hosts the editing engine for a tabbed Python editor.
//!
//! ## Philosophy
//!
//! - **Composition**: An `EditorView` owns a buffer and a router; nothing subclasses anything
//! - **Explicit I/O**: Documents are loaded and saved through a `DocumentStore`
//! - **Testable**: Every workflow runs from injected key events, no window system needed
//! - **Typed metadata**: Paths and modified flags live in `DocumentMetadata`, not in ad-hoc properties
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A syntax highlighter
//! - A language server client
//! - A terminal or process manager (running scripts is delegated to a `ScriptRunner`)
//!
//! ## Design
//!
//! - `TabManager` owns the tabs, each an `EditorView` plus its `DocumentMetadata`
//! - Key events go to the current tab's router first; unconsumed keys are host navigation
//! - Rendering goes through a `RenderDelegate`, with a plain-text renderer for tests
//! - The keyword corpus is built once and shared by every tab

pub mod document;
pub mod gutter;
pub mod io;
pub mod keywords;
pub mod log;
pub mod render;
pub mod settings;
pub mod tabs;
pub mod view;

pub use document::{window_title, DocumentMetadata};
pub use gutter::LineNumberGutter;
pub use io::{DocumentStore, FsDocumentStore, IoError, IoResult, MemoryDocumentStore, ScriptRunner};
pub use log::LogConfig;
pub use render::{PlainTextRenderer, RenderDelegate};
pub use settings::{EditorSettings, SettingsError, SettingsResult};
pub use tabs::{Tab, TabError, TabId, TabManager, TabResult};
pub use view::EditorView;
