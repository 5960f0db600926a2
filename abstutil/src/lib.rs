//! Shared utilities for turning OSM extracts into renderable geometry: the attribute sets that
//! tag every output, a small undirected graph, timing/progress reporting, and logging setup.

#[macro_use]
extern crate log;

mod graph;
mod io;
pub mod logger;
mod tags;
mod time;
mod utils;

pub use crate::graph::{GraphBuilder, UndirectedGraph, UnknownNode};
pub use crate::io::{from_json, to_json, write_json};
pub use crate::tags::{Attributed, Tags};
pub use crate::time::{elapsed_seconds, prettyprint_time, Timer};
pub use crate::utils::{basename, prettyprint_usize};

const PROGRESS_FREQUENCY_SECONDS: f64 = 1.0;
