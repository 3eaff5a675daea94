//! Headless controller for the leave request screen.
//!
//! Owns the view state and drives the service through [`LeaveApi`]; a front
//! end renders [`ViewState`] and forwards user actions.

pub mod client;
pub mod controller;
pub mod filter;
pub mod state;

pub use client::{ClientError, HttpLeaveApi, LeaveApi, LeaveDraft};
pub use controller::{LeaveController, LeaveForm, StatusDialogView};
pub use filter::FilterCriteria;
pub use state::{Dialog, Notice, PendingAction, Selection, UiState, ViewState};
