//! Member authentication primitives.
//!
//! - [`jwt`] -- HS256 member token generation and validation.

pub mod jwt;
