//! Session launch and process supervision.
//!
//! Covers helper command construction, process spawning, the per-session
//! supervisor task that discovers and watches the target process, the
//! session registry, and lifecycle event plumbing.

pub mod command;
pub mod events;
pub mod launcher;
pub mod probe;
pub mod registry;
pub mod supervisor;

pub use events::{SessionEvent, SessionOutcome};
pub use launcher::Launcher;
pub use registry::SessionRegistry;
pub use supervisor::SessionHandle;
