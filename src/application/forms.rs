//! Submit routines, one per console form.
//!
//! Every routine validates and shapes its payload first; a validation
//! failure is alerted and returned without touching the form's control or
//! indicator. Only then does the submission enter `Submitting`, send exactly
//! one request, and write the outcome to the form's sink.

use datamgr_api_types::{
    BasicResponse, Credential, CredentialCreateRequest, CredentialUpdateRequest,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use super::dispatch::{Dispatcher, Request, RequestBody, Route};
use super::error::SubmitError;
use super::submit::FormView;
use crate::domain::error::ValidationError;
use crate::domain::filter::normalize_filter;
use crate::domain::form::FormFields;
use crate::domain::payload::{Payload, build_payload};
use crate::domain::provider::{UNSELECTED, normalize_points};

const FILTER_GROUP: &str = "sourceFilter";

/// Generation targets whose handlers read uploaded credential files.
const MULTIPART_GENERATE_TARGETS: [&str; 3] = ["gcs", "gcp", "firestore"];

/// How a successful response body becomes the text shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Job endpoints: the `Result` field, verbatim.
    JobResult,
    /// Credential creation: success is the presence of `credentialId`.
    CredentialSaved,
}

impl ResultKind {
    pub fn render(self, body: &Value) -> Result<String, SubmitError> {
        match self {
            ResultKind::JobResult => {
                let response: BasicResponse = serde_json::from_value(body.clone())
                    .map_err(|e| SubmitError::Decode(format!("missing Result field: {e}")))?;
                Ok(response.result)
            }
            ResultKind::CredentialSaved => match body.get("credentialId").and_then(Value::as_u64)
            {
                Some(id) => Ok(format!("credential {id} registered")),
                None => Err(SubmitError::Decode(
                    "server did not confirm the credential".to_string(),
                )),
            },
        }
    }
}

/// Shape a job payload: regroup fields, coerce checkboxes, validate and
/// normalize points, then normalize the source filter when asked to.
pub fn job_payload(fields: &FormFields, with_filter: bool) -> Result<Payload, ValidationError> {
    let mut payload = build_payload(fields);
    let raw_filter = payload.take_group(FILTER_GROUP);

    payload.coerce_checkboxes();
    normalize_points(&mut payload)?;

    if let Some(raw_filter) = raw_filter {
        let value = if with_filter {
            normalize_filter(&raw_filter).to_value()
        } else {
            Value::Object(raw_filter)
        };
        payload.insert(FILTER_GROUP, value);
    }
    Ok(payload)
}

pub fn generate_request(target: &str, fields: &FormFields) -> Result<Request, SubmitError> {
    let route = Route::generate(target)?;
    let payload = job_payload(fields, false)?;
    let multipart = fields.has_files() || MULTIPART_GENERATE_TARGETS.contains(&target.trim());
    let body = if multipart {
        RequestBody::Multipart(fields.clone())
    } else {
        RequestBody::Json(payload.into_value())
    };
    Ok(Request::new(Method::POST, route, body))
}

pub fn migration_request(service: &str, fields: &FormFields) -> Result<Request, SubmitError> {
    let route = Route::migrate(service)?;
    let payload = job_payload(fields, true)?;
    Ok(Request::post_json(route, payload.into_value()))
}

pub fn legacy_migration_request(
    source: &str,
    dest: Option<&str>,
    fields: &FormFields,
) -> Result<Request, SubmitError> {
    let route = Route::legacy_migration(source, dest)?;
    let payload = job_payload(fields, true)?;
    Ok(Request::post_json(route, payload.into_value()))
}

pub fn backup_request(service: &str, fields: &FormFields) -> Result<Request, SubmitError> {
    let route = Route::backup(service)?;
    let payload = job_payload(fields, true)?;
    let body = if fields.has_files() {
        RequestBody::Multipart(fields.clone())
    } else {
        RequestBody::Json(payload.into_value())
    };
    Ok(Request::new(Method::POST, route, body))
}

pub fn restore_request(service: &str, fields: &FormFields) -> Result<Request, SubmitError> {
    let route = Route::restore(service)?;
    let payload = job_payload(fields, false)?;
    Ok(Request::post_json(route, payload.into_value()))
}

/// Credential registration form as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialForm {
    pub csp_type: String,
    pub name: String,
    /// Credential document as text; must parse as JSON.
    pub credential_json: String,
}

fn parse_credential_json(text: &str) -> Result<Value, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::MissingValue {
            what: "credential JSON",
        });
    }
    serde_json::from_str(text).map_err(|err| ValidationError::InvalidValue {
        what: "credential JSON",
        reason: err.to_string(),
    })
}

pub fn credential_create_request(form: &CredentialForm) -> Result<Request, SubmitError> {
    let csp = form.csp_type.trim();
    if csp.is_empty() || csp == UNSELECTED {
        return Err(ValidationError::missing_selection("credential type").into());
    }

    let request = CredentialCreateRequest {
        csp_type: csp.to_string(),
        name: form.name.clone(),
        credential_json: parse_credential_json(&form.credential_json)?,
    };
    let body = serde_json::to_value(&request)
        .map_err(|e| SubmitError::Request(format!("failed to encode credential: {e}")))?;
    Ok(Request::post_json(Route::credentials(), body))
}

/// Validate, then run one submission through the form's lifecycle.
async fn submit(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    request: Result<Request, SubmitError>,
    kind: ResultKind,
) -> Result<String, SubmitError> {
    let request = match request {
        Ok(request) => request,
        Err(err) => return view.reject(err),
    };

    let mut guard = match view.control.begin(view.indicator) {
        Ok(guard) => guard,
        Err(err) => return view.reject(err),
    };

    let outcome = dispatcher
        .send(&request)
        .await
        .and_then(|body| kind.render(&body));

    match &outcome {
        Ok(text) => {
            guard.succeed();
            info!(form = view.control.form(), path = %request.route.path(), "submission succeeded");
            view.sink.show(text);
        }
        Err(err) => {
            guard.fail();
            view.sink.alert(&err.to_string());
        }
    }
    drop(guard);
    outcome
}

pub async fn submit_generate(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    target: &str,
    fields: &FormFields,
) -> Result<String, SubmitError> {
    let request = generate_request(target, fields);
    submit(view, dispatcher, request, ResultKind::JobResult).await
}

pub async fn submit_migration(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    service: &str,
    fields: &FormFields,
) -> Result<String, SubmitError> {
    let request = migration_request(service, fields);
    submit(view, dispatcher, request, ResultKind::JobResult).await
}

pub async fn submit_legacy_migration(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    source: &str,
    dest: Option<&str>,
    fields: &FormFields,
) -> Result<String, SubmitError> {
    let request = legacy_migration_request(source, dest, fields);
    submit(view, dispatcher, request, ResultKind::JobResult).await
}

pub async fn submit_backup(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    service: &str,
    fields: &FormFields,
) -> Result<String, SubmitError> {
    let request = backup_request(service, fields);
    submit(view, dispatcher, request, ResultKind::JobResult).await
}

pub async fn submit_restore(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    service: &str,
    fields: &FormFields,
) -> Result<String, SubmitError> {
    let request = restore_request(service, fields);
    submit(view, dispatcher, request, ResultKind::JobResult).await
}

pub async fn create_credential(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
    form: &CredentialForm,
) -> Result<String, SubmitError> {
    let request = credential_create_request(form);
    submit(view, dispatcher, request, ResultKind::CredentialSaved).await
}

pub async fn service_apply(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
) -> Result<String, SubmitError> {
    let request = Request::new(Method::POST, Route::service_apply(), RequestBody::Empty);
    submit(view, dispatcher, Ok(request), ResultKind::JobResult).await
}

pub async fn service_destroy(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
) -> Result<String, SubmitError> {
    let request = Request::delete(Route::service_destroy());
    submit(view, dispatcher, Ok(request), ResultKind::JobResult).await
}

pub async fn service_clear_all(
    view: &FormView<'_>,
    dispatcher: &Dispatcher,
) -> Result<String, SubmitError> {
    let request = Request::delete(Route::service_clear_all());
    submit(view, dispatcher, Ok(request), ResultKind::JobResult).await
}

/// Registered credentials, optionally narrowed to one provider, as used to
/// populate credential selects.
pub async fn list_credentials(
    dispatcher: &Dispatcher,
    csp_type: Option<&str>,
) -> Result<Vec<Credential>, SubmitError> {
    let body = dispatcher.send(&Request::get(Route::credentials())).await?;
    let credentials: Vec<Credential> = if body.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(body)
            .map_err(|e| SubmitError::Decode(format!("failed to parse credentials: {e}")))?
    };
    debug!(count = credentials.len(), "credentials fetched");

    Ok(match csp_type {
        Some(csp) => credentials
            .into_iter()
            .filter(|credential| credential.csp_type.eq_ignore_ascii_case(csp))
            .collect(),
        None => credentials,
    })
}

pub async fn get_credential(dispatcher: &Dispatcher, id: u64) -> Result<Credential, SubmitError> {
    let body = dispatcher.send(&Request::get(Route::credential(id))).await?;
    serde_json::from_value(body)
        .map_err(|e| SubmitError::Decode(format!("failed to parse credential: {e}")))
}

pub async fn update_credential(
    dispatcher: &Dispatcher,
    id: u64,
    update: &CredentialUpdateRequest,
) -> Result<Credential, SubmitError> {
    if let Some(json) = update.credential_json.as_deref() {
        parse_credential_json(json)?;
    }
    let body = serde_json::to_value(update)
        .map_err(|e| SubmitError::Request(format!("failed to encode credential: {e}")))?;
    let request = Request::new(Method::PUT, Route::credential(id), RequestBody::Json(body));
    let body = dispatcher.send(&request).await?;
    serde_json::from_value(body)
        .map_err(|e| SubmitError::Decode(format!("failed to parse credential: {e}")))
}

pub async fn delete_credential(dispatcher: &Dispatcher, id: u64) -> Result<Value, SubmitError> {
    dispatcher.send(&Request::delete(Route::credential(id))).await
}

pub async fn list_tasks(dispatcher: &Dispatcher) -> Result<Value, SubmitError> {
    dispatcher.send(&Request::get(Route::tasks())).await
}

pub async fn get_task(dispatcher: &Dispatcher, id: &str) -> Result<Value, SubmitError> {
    dispatcher.send(&Request::get(Route::task(id)?)).await
}

pub async fn delete_task(dispatcher: &Dispatcher, id: &str) -> Result<Value, SubmitError> {
    dispatcher.send(&Request::delete(Route::task(id)?)).await
}

#[cfg(test)]
mod tests;
