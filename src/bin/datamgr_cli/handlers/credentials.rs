#![deny(clippy::all, clippy::pedantic)]

use datamgr::application::forms;
use datamgr::application::submit::SubmitControl;
use datamgr::application::forms::CredentialForm;
use datamgr_api_types::CredentialUpdateRequest;

use crate::args::CredentialsCmd;
use crate::client::{CliError, Ctx};
use crate::io::read_opt_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CredentialsCmd) -> Result<(), CliError> {
    match cmd {
        CredentialsCmd::Create {
            csp_type,
            name,
            credential_json,
            credential_json_file,
        } => {
            let credential_json =
                read_opt_value(credential_json, credential_json_file)?.unwrap_or_default();
            create(
                ctx,
                CredentialForm {
                    csp_type,
                    name,
                    credential_json,
                },
            )
            .await
        }
        CredentialsCmd::List { csp_type, labels } => list(ctx, csp_type.as_deref(), labels).await,
        CredentialsCmd::Get { id } => {
            let credential = forms::get_credential(&ctx.dispatcher, id).await?;
            print_json(&credential)
        }
        CredentialsCmd::Update {
            id,
            csp_type,
            name,
            credential_json,
            credential_json_file,
        } => {
            let update = CredentialUpdateRequest {
                csp_type,
                name,
                credential_json: read_opt_value(credential_json, credential_json_file)?,
            };
            if update == CredentialUpdateRequest::default() {
                return Err(CliError::InvalidInput(
                    "nothing to update; pass --csp-type, --name or --credential-json".into(),
                ));
            }
            let credential = forms::update_credential(&ctx.dispatcher, id, &update).await?;
            print_json(&credential)
        }
        CredentialsCmd::Delete { id } => {
            let res = forms::delete_credential(&ctx.dispatcher, id).await?;
            print_json(&res)
        }
    }
}

async fn create(ctx: &Ctx, form: CredentialForm) -> Result<(), CliError> {
    let control = SubmitControl::new("credentials");
    forms::create_credential(&ctx.view(&control), &ctx.dispatcher, &form)
        .await
        .map_err(CliError::Alerted)?;
    Ok(())
}

async fn list(ctx: &Ctx, csp_type: Option<&str>, labels: bool) -> Result<(), CliError> {
    let credentials = forms::list_credentials(&ctx.dispatcher, csp_type).await?;
    if labels {
        for credential in &credentials {
            println!("{}\t{}", credential.credential_id, credential.option_label());
        }
        return Ok(());
    }
    print_json(&credentials)
}
