//! Stock audit reconciliation.
//!
//! Scan codes arrive as one concatenated string (product code + reference +
//! location, no delimiter). This crate recovers the inventory key and location
//! from each scan and reconciles the scans against the theoretical inventory:
//!
//! - **record pass (ERI)**: counted quantity vs theoretical quantity per key;
//! - **location pass (ERU)**: was each scan taken at one of the key's locations.
//!
//! Everything here is pure, deterministic, in-memory computation. Scans that
//! cannot be attributed degrade to row statuses; nothing in this crate fails.

pub mod decomposer;
pub mod engine;
pub mod location;
pub mod metrics;
pub mod pattern;
pub mod record;

pub use decomposer::{DecomposedScan, KeyDecomposer, decompose};
pub use engine::ReconciliationEngine;
pub use location::{LocationRow, LocationStatus, normalize_location, reconcile_locations};
pub use metrics::{AccuracySummary, Classified, PassStatus, StatusCount, aggregate, breakdown};
pub use pattern::{LocationShape, location_shape, looks_like_location};
pub use record::{RecordRow, RecordStatus, reconcile_records};
