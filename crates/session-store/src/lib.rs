//! Photobooth Session Store
//!
//! Persistence for completed sessions. The session core talks to stores
//! only through [`SessionStore`]; two implementations ship here:
//!
//! - [`JsonDirStore`]: a directory with a `sessions.json` manifest and one
//!   composite file per record.
//! - [`MemoryStore`]: in-process storage for tests and throwaway runs.

pub mod json_dir;
pub mod memory;
pub mod store;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;
pub use store::SessionStore;
