//! Port implementations.

pub mod live;
