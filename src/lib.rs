//! hbasta - typed client layer over a sorted key-value store
//!
//! The store sees only opaque byte keys and values, sorted by raw key
//! bytes. This crate supplies:
//!
//! - `codec`: tagged encoding of integers, byte strings, text and tuples
//! - `range`: prefix-scan boundaries
//! - `cache`: a session-scoped read cache that forbids writes
//! - `client`: the typed facade and lazy scan sessions
//! - `store`: the remote store interface, plus an in-memory store

pub mod cache;
pub mod cli;
pub mod client;
pub mod codec;
pub mod observability;
pub mod range;
pub mod store;
