//! Text-rewriting engine for MQL sources
//!
//! This crate is the pure half of mqlfix: token rules, scan strategies, and
//! the line buffer they operate on. No I/O, no timers — orchestration lives
//! in the `engine` crate.

pub mod buffer;
pub mod rules;
pub mod scan;
pub mod text;

pub use buffer::{EditError, TextBuffer};
pub use rules::{RuleError, RuleSet, TokenClass, TokenMatch, TokenRule};
pub use scan::{full_scan, window_scan};
pub use text::{Edit, Position, ScanWindow, Span};
