//! `stockaudit-core`: domain building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory,
//! reconciliation and audit crates (no IO, no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod key;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::SessionId;
pub use key::{InventoryKey, KEY_SEPARATOR};
pub use value_object::ValueObject;
