//! Conversion workflow orchestration
//!
//! [`state`] defines the session state machine and its event reducer;
//! [`session`] drives the async operations that produce those events.
//! Simulated-mode fixtures live in [`simulated`].

mod session;
mod simulated;
mod state;

pub use session::WorkflowSession;
pub use state::{
    ServiceMode, SessionState, StateEvent, WorkflowError, WorkflowStage, NEW_REQUIREMENT_TEXT,
};
