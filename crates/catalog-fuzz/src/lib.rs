//! Fuzzing library for arxiv-research-mcp.
//!
//! Targets cover the three places untrusted bytes enter the server: catalog
//! documents on disk, tool arguments from the MCP host, and Atom feeds from
//! arXiv.
//!
//! # Usage
//!
//! ```bash
//! cd crates/catalog-fuzz
//! cargo +nightly fuzz run fuzz_catalog_parse -- -max_total_time=60
//! ```

pub use arxiv_research_mcp::{gateway, models, registry};
