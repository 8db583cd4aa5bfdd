//! Pokemon catalog grid - tui-dispatch client for the PokeAPI listing
//!
//! The library holds the data orchestration layer (catalog client, detail
//! aggregation, search and pagination, detail-on-demand loading) and the
//! components that render it. The binary wires both to a terminal.

pub mod action;
pub mod aggregate;
pub mod api;
pub mod artwork;
pub mod category;
pub mod collection;
pub mod components;
pub mod config;
pub mod detail;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod search;
pub mod state;
