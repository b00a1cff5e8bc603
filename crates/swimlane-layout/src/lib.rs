#![forbid(unsafe_code)]

//! Layered graph layout constrained to ordered swimlanes.
//!
//! A pass discovers the vertices of each lane, collapses parallel edges, breaks cycles so edges
//! only run towards higher lanes, ranks nodes inside per-lane rank bands, reduces crossings and
//! finally writes coordinates back through [`graph::HostGraph`].

pub use swimlane_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acyclic;
pub mod config;
pub mod coordinate_system;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod layout;
pub mod model;
pub mod order;
pub mod position;
pub mod rank;
pub mod view;

pub use config::{LayoutConfig, Orientation};
pub use error::{Error, Result};
pub use layout::{LayoutSummary, SkipReason, Stage, SwimlaneLayout, update_group_bounds};
pub use model::SwimlaneModel;
