//! Core infrastructure for CRISPRi flow-sorting screen analysis.
//!
//! This crate provides the shared data models (genomic regions, guide
//! records, candidate windows, peak calls), the interval algebra those
//! models are built on, and ingestion of guide-wise count tables. Higher
//! level crates (`screenpeak-calling`, `screenpeak-consensus`) build the
//! statistical machinery on top of these types but should not reimplement
//! interval operations.
//!
//! All coordinates are 0-based, half-open (BED convention). Overlap is
//! strict: intervals that merely touch at an endpoint do not overlap.

pub mod algebra;
pub mod errors;
pub mod models;
pub mod table;
pub mod utils;

// re-export for cleaner imports
pub use self::models::guide::{GuideClass, GuideRecord, Strand};
pub use self::models::peak::{CredibleInterval, PeakCall};
pub use self::models::region::Region;
pub use self::models::track::TrackSegment;
pub use self::models::window::Window;
