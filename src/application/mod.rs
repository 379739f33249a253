//! Application layer: request composition, dispatch and the per-form
//! submission lifecycle.

pub mod dispatch;
pub mod error;
pub mod forms;
pub mod submit;
