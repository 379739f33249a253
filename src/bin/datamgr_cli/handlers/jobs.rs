#![deny(clippy::all, clippy::pedantic)]

use datamgr::application::forms;
use datamgr::application::submit::SubmitControl;

use crate::args::FormArgs;
use crate::client::{CliError, Ctx};
use crate::io::read_fields;

pub async fn generate(ctx: &Ctx, target: &str, form: FormArgs) -> Result<(), CliError> {
    let fields = read_fields(form)?;
    let control = SubmitControl::new("generate");
    forms::submit_generate(&ctx.view(&control), &ctx.dispatcher, target, &fields)
        .await
        .map_err(CliError::Alerted)?;
    Ok(())
}

pub async fn migrate(ctx: &Ctx, service: &str, form: FormArgs) -> Result<(), CliError> {
    let fields = read_fields(form)?;
    let control = SubmitControl::new("migrate");
    forms::submit_migration(&ctx.view(&control), &ctx.dispatcher, service, &fields)
        .await
        .map_err(CliError::Alerted)?;
    Ok(())
}

pub async fn legacy_migration(
    ctx: &Ctx,
    source: &str,
    dest: Option<&str>,
    form: FormArgs,
) -> Result<(), CliError> {
    let fields = read_fields(form)?;
    let control = SubmitControl::new("migration");
    forms::submit_legacy_migration(&ctx.view(&control), &ctx.dispatcher, source, dest, &fields)
        .await
        .map_err(CliError::Alerted)?;
    Ok(())
}

pub async fn backup(ctx: &Ctx, service: &str, form: FormArgs) -> Result<(), CliError> {
    let fields = read_fields(form)?;
    let control = SubmitControl::new("backup");
    forms::submit_backup(&ctx.view(&control), &ctx.dispatcher, service, &fields)
        .await
        .map_err(CliError::Alerted)?;
    Ok(())
}

pub async fn restore(ctx: &Ctx, service: &str, form: FormArgs) -> Result<(), CliError> {
    let fields = read_fields(form)?;
    let control = SubmitControl::new("restore");
    forms::submit_restore(&ctx.view(&control), &ctx.dispatcher, service, &fields)
        .await
        .map_err(CliError::Alerted)?;
    Ok(())
}
