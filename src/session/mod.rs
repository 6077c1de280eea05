pub mod controller;
pub mod status;
pub mod timer;

pub use controller::{CaptureSession, SessionPhase, POLL_INTERVAL};
pub use status::StatusCache;
pub use timer::{PollTimer, Synchronizer};
