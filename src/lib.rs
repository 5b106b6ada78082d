//! Job progress-status tracking for a print shop.
//!
//! The core is a static transition table ([`transition`]) and a pure
//! validator ([`validation`]). [`job`] keeps a local job record whose
//! status only moves through validated changes, and [`api`] submits
//! validated changes to the external job-management API.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod status;
pub mod transition;
pub mod ui;
pub mod validation;

pub use error::{PrintshopError, Result};
pub use job::{Job, JobKind, StatusChange};
pub use status::JobProgressStatus;
pub use transition::{allowed_successors, can_transition};
pub use validation::{validate, TransitionRequest, ValidationErrors, ValidationResult};
