//! Member roster library
//!
//! Loads user records from a JSON feed and manages the client-side table
//! state (search, pagination, selection, inline edit, delete) as a reducer.

pub mod error;
pub mod model;
pub mod table;

mod client;

pub use client::*;
pub use model::Record;
pub use table::{Action, Outcome, TableState, PAGE_SIZE};
