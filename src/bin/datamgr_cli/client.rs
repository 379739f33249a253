#![deny(clippy::all, clippy::pedantic)]

use datamgr::application::dispatch::Dispatcher;
use datamgr::application::error::SubmitError;
use datamgr::application::submit::{FormView, SubmitControl};
use datamgr::config::{self, ApiSettings, LoadError};
use datamgr::domain::error::FormError;
use datamgr::domain::form::FieldsFileError;
use datamgr::infra::error::InfraError;
use datamgr::infra::telemetry;
use thiserror::Error;

use crate::args::Cli;
use crate::print::{StderrIndicator, TerminalSink};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("invalid field: {0}")]
    Field(#[from] FormError),
    #[error("failed to read fields file {path}: {source}")]
    FieldsFile {
        path: String,
        source: FieldsFileError,
    },
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Request(#[from] SubmitError),
    /// Submission failure the form's sink has already shown.
    #[error(transparent)]
    Alerted(SubmitError),
    #[error("failed to render output: {0}")]
    Output(String),
}

impl CliError {
    pub fn already_reported(&self) -> bool {
        matches!(self, CliError::Alerted(_))
    }
}

pub struct Ctx {
    pub dispatcher: Dispatcher,
    sink: TerminalSink,
    indicator: StderrIndicator,
}

impl Ctx {
    pub fn new(settings: &ApiSettings) -> Result<Self, CliError> {
        let dispatcher = Dispatcher::new(settings).map_err(InfraError::from)?;
        Ok(Self::with_dispatcher(dispatcher))
    }

    /// Context with default client settings, pointed at `site`.
    #[cfg(test)]
    pub fn for_site(site: &str) -> Result<Self, CliError> {
        Ok(Self::with_dispatcher(Dispatcher::with_base(site)?))
    }

    fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            sink: TerminalSink,
            indicator: StderrIndicator::detect(),
        }
    }

    /// Terminal-backed view for one form submission.
    pub fn view<'a>(&'a self, control: &'a SubmitControl) -> FormView<'a> {
        FormView::new(control, &self.sink, &self.indicator)
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let settings = config::load(&cli.config)?;
    telemetry::init(&settings.logging)?;
    Ctx::new(&settings.api)
}
