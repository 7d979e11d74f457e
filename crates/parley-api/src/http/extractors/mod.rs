//! Request parameter parsing for the message endpoints.

pub mod query;
