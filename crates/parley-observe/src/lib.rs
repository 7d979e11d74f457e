//! Logging and trace export setup for Parley.

pub mod tracing_setup;
