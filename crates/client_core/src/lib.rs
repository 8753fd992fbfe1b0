//! Client-side lifecycle for news article generation jobs.
//!
//! A [`JobRequestController`] owns one [`SubmissionState`] per view, validates topics
//! before anything touches the network, and turns a single HTTP round trip into
//! `Idle -> Pending -> Succeeded | Failed`.

pub mod controller;
pub mod error;
pub mod state;
pub mod transport;
pub mod view;

pub use controller::{ControllerEvent, DetachedSubmit, JobRequestController, SubmitOutcome};
pub use error::{resolve_failure_message, JobError, GENERIC_FAILURE_MESSAGE};
pub use state::{Phase, SubmissionState};
pub use transport::{HttpJobTransport, JobOutput, JobTransport};
pub use view::SubmissionView;
