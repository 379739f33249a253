//! Per-form submission lifecycle.
//!
//! Each form owns a [`SubmitControl`]: `Idle → Submitting → Succeeded |
//! Failed → Idle`. While a submission is in flight the control refuses a
//! second one, which is the console's "disabled submit button". The guard
//! returned by [`SubmitControl::begin`] switches the loading indicator off
//! and returns the control to `Idle` when dropped, whatever the outcome.

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

use super::error::SubmitError;

/// Where results and alerts for one form are shown.
pub trait ResultSink: Send + Sync {
    /// Write a successful result into the form's output field.
    fn show(&self, text: &str);
    /// Report a failure to the user.
    fn alert(&self, message: &str);
}

/// Progress affordance toggled around a request.
pub trait LoadingIndicator: Send + Sync {
    fn on(&self, label: &str);
    fn off(&self);
}

/// Indicator that shows nothing; used for background lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl LoadingIndicator for NoIndicator {
    fn on(&self, _label: &str) {}
    fn off(&self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubmitState {
    Idle = 0,
    Submitting = 1,
    Succeeded = 2,
    Failed = 3,
}

impl SubmitState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SubmitState::Submitting,
            2 => SubmitState::Succeeded,
            3 => SubmitState::Failed,
            _ => SubmitState::Idle,
        }
    }
}

#[derive(Debug)]
pub struct SubmitControl {
    form: &'static str,
    state: AtomicU8,
    last_outcome: AtomicU8,
}

impl SubmitControl {
    pub fn new(form: &'static str) -> Self {
        Self {
            form,
            state: AtomicU8::new(SubmitState::Idle as u8),
            last_outcome: AtomicU8::new(SubmitState::Idle as u8),
        }
    }

    pub fn form(&self) -> &'static str {
        self.form
    }

    pub fn state(&self) -> SubmitState {
        SubmitState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Outcome of the most recent finished submission; `Idle` if none.
    pub fn last_outcome(&self) -> SubmitState {
        SubmitState::from_u8(self.last_outcome.load(Ordering::Acquire))
    }

    /// Enter `Submitting` and switch the indicator on.
    pub fn begin<'a>(
        &'a self,
        indicator: &'a dyn LoadingIndicator,
    ) -> Result<SubmitGuard<'a>, SubmitError> {
        self.state
            .compare_exchange(
                SubmitState::Idle as u8,
                SubmitState::Submitting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| SubmitError::Busy)?;

        debug!(form = self.form, "submission started");
        indicator.on(self.form);
        Ok(SubmitGuard {
            control: self,
            indicator,
            outcome: SubmitState::Failed,
        })
    }
}

/// Live submission. An unfinished guard counts as a failure.
pub struct SubmitGuard<'a> {
    control: &'a SubmitControl,
    indicator: &'a dyn LoadingIndicator,
    outcome: SubmitState,
}

impl SubmitGuard<'_> {
    pub fn succeed(&mut self) {
        self.outcome = SubmitState::Succeeded;
    }

    pub fn fail(&mut self) {
        self.outcome = SubmitState::Failed;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.indicator.off();
        self.control
            .last_outcome
            .store(self.outcome as u8, Ordering::Release);
        self.control
            .state
            .store(SubmitState::Idle as u8, Ordering::Release);
        debug!(form = self.control.form, outcome = ?self.outcome, "submission finished");
    }
}

/// Handler-scoped references one form submits through.
#[derive(Clone, Copy)]
pub struct FormView<'a> {
    pub control: &'a SubmitControl,
    pub sink: &'a dyn ResultSink,
    pub indicator: &'a dyn LoadingIndicator,
}

impl<'a> FormView<'a> {
    pub fn new(
        control: &'a SubmitControl,
        sink: &'a dyn ResultSink,
        indicator: &'a dyn LoadingIndicator,
    ) -> Self {
        Self {
            control,
            sink,
            indicator,
        }
    }

    /// Report a failure and hand it back to the caller.
    pub fn reject<T>(&self, error: SubmitError) -> Result<T, SubmitError> {
        self.sink.alert(&error.to_string());
        Err(error)
    }
}
