//! Host-facing adapters that drive the query controller from outside the process.

pub mod stdio;
