//! Photobooth Capture Engine
//!
//! Runs interactive capture sessions: acquires the camera, counts down,
//! grabs cover-cropped stills, and hands finished sessions to the renderer
//! and the session store.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                   BoothSession                    │
//! │  ┌──────────────┐  ┌───────────┐  ┌────────────┐  │
//! │  │ CameraLease  │  │ Countdown │  │  Capturer  │  │
//! │  │ (FrameSource)│─▶│  ticks    │─▶│ cover-crop │  │
//! │  └──────────────┘  └───────────┘  └─────┬──────┘  │
//! │                                         ▼         │
//! │                                     shots[..]     │
//! │                                         │         │
//! │          ┌──────────────────────────────┤         │
//! │          ▼                              ▼         │
//! │  ┌────────────────┐            ┌──────────────┐   │
//! │  │ Composite      │───────────▶│ SessionStore │   │
//! │  │ Renderer       │            │ create/update│   │
//! │  └────────────────┘            └──────────────┘   │
//! └───────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod capturer;
pub mod countdown;
pub mod session;
pub mod source;
pub mod webcam;

pub use camera::*;
pub use capturer::*;
pub use countdown::*;
pub use session::*;
pub use source::*;
