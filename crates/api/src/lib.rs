//! `stockroom-api` — the HTTP surface.
//!
//! Every mutating request flows through the same gauntlet: token
//! verification (middleware) → explicit role check (handler) → domain
//! operation. Handlers receive the resolved identity as a request
//! extension; nothing reads ambient auth state.

pub mod app;
pub mod context;
pub mod middleware;
