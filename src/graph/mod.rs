//! The node contract shared by everything that renders audio blocks.
//!
//! The graph is pull-based: processing the root recursively demands input
//! blocks from upstream nodes, each rented from the per-callback arena. The
//! graph is a DAG fixed at configuration time; the audio thread only walks
//! it, never grows it.

pub mod node;

pub use node::{AudioNode, RenderCtx};
