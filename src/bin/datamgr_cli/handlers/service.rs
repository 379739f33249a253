#![deny(clippy::all, clippy::pedantic)]

use datamgr::application::forms;
use datamgr::application::submit::SubmitControl;

use crate::args::ServiceCmd;
use crate::client::{CliError, Ctx};

pub async fn handle(ctx: &Ctx, cmd: ServiceCmd) -> Result<(), CliError> {
    let control = SubmitControl::new("service");
    let view = ctx.view(&control);
    let outcome = match cmd {
        ServiceCmd::Apply => forms::service_apply(&view, &ctx.dispatcher).await,
        ServiceCmd::Destroy => forms::service_destroy(&view, &ctx.dispatcher).await,
        ServiceCmd::ClearAll => forms::service_clear_all(&view, &ctx.dispatcher).await,
    };
    outcome.map_err(CliError::Alerted)?;
    Ok(())
}
