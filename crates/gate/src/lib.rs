//! `revhub-gate` — pure request-authorization gate (zero-trust edge core).
//!
//! This crate is intentionally decoupled from HTTP and I/O: it receives a
//! request's path and credential material as plain values and returns a
//! [`Decision`]. The HTTP adapter lives in `revhub-edge`.

pub mod claims;
pub mod decision;
pub mod roles;
pub mod routes;
pub mod token;

pub use claims::{DecodeError, TokenClaims, decode_claims};
pub use decision::{Decision, Evaluation, decide, evaluate};
pub use roles::Role;
pub use routes::{PathClass, RouteTable, RouteTableError};
pub use token::bearer_token;
