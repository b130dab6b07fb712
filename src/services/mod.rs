//! Resource services: profile, product, and inventory.
//!
//! Each owns one in-memory record collection and gates its writes through
//! the remote verification client (`crate::verify`).

pub mod inventory;
pub mod product;
pub mod profile;
