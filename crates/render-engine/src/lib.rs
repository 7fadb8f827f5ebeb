//! Photobooth Render Engine
//!
//! Turns a session's shots into the final composite and encodes it for
//! download, sharing, or storage.
//!
//! # Pipeline Architecture
//!
//! ```text
//! shots (PNG) ──┐
//!               ├── Decode (all or nothing)
//! layout ───────┘         │
//!                         ├── Per-cell filter plan
//! filter ─────────────────┘     (color ops | grayscale + gradient multiply)
//!                                       │
//!                                       ├── Blit into grid cells
//!                                       │
//! product name + date ──────────────────├── Watermark (label band)
//!                                       ▼
//!                                   Composite
//!                                       │
//!                                       ▼
//!                               Encode (PNG / JPEG)
//! ```

pub mod compositor;
pub mod export;
pub mod filters;
pub mod watermark;

pub use compositor::*;
pub use export::*;
