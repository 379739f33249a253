#![deny(clippy::all, clippy::pedantic)]

use datamgr::application::forms;

use crate::args::TasksCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: TasksCmd) -> Result<(), CliError> {
    let res = match cmd {
        TasksCmd::List => forms::list_tasks(&ctx.dispatcher).await?,
        TasksCmd::Get { id } => forms::get_task(&ctx.dispatcher, &id).await?,
        TasksCmd::Delete { id } => forms::delete_task(&ctx.dispatcher, &id).await?,
    };
    print_json(&res)
}
