//! UI session state module
//!
//! The single context object behind every page behavior. This module must
//! stay pure:
//! - No DOM handles, no `web_sys` types
//! - All mutation through the transition methods in `actions`
//! - Fully testable on the native target

pub mod actions;
pub mod state;

pub use actions::EntryToggle;
pub use state::{
    AudioAction, AudioState, Entry, EntryKind, IntroPhase, NavState, PlayOutcome, Session, Speaker,
};
