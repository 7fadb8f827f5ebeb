//! Photobooth Model
//!
//! Defines the core data contracts for Photobooth sessions:
//! - **Layouts:** How many shots a session takes and how they are arranged
//! - **Filters:** The fixed set of cosmetic color transforms
//! - **Geometry:** Canvas and cell placement math for composites
//! - **Shots:** Captured stills owned by an in-progress session
//! - **Records:** The persisted artifact of a completed session
//!
//! Registries are static and immutable; everything here is plain data.

pub mod color;
pub mod filter;
pub mod geometry;
pub mod layout;
pub mod record;
pub mod shot;

pub use color::*;
pub use filter::*;
pub use geometry::*;
pub use layout::*;
pub use record::*;
pub use shot::*;
