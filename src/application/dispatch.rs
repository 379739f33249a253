//! Request composition and transport.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::error::SubmitError;
use crate::config::ApiSettings;
use crate::domain::error::ValidationError;
use crate::domain::form::{FieldValue, FormFields};
use crate::domain::provider::UNSELECTED;

/// Server path: fixed prefix plus segments taken from select values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    segments: Vec<String>,
}

impl Route {
    fn fixed(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn with(mut self, what: &'static str, value: &str) -> Result<Self, ValidationError> {
        self.segments.push(selection(what, value)?);
        Ok(self)
    }

    pub fn generate(target: &str) -> Result<Self, ValidationError> {
        Self::fixed(&["generate"]).with("generation target", target)
    }

    pub fn migrate(service: &str) -> Result<Self, ValidationError> {
        Self::fixed(&["migrate"]).with("service", service)
    }

    /// Older per-pair route: `/migration/{source}[/{dest}]`.
    pub fn legacy_migration(source: &str, dest: Option<&str>) -> Result<Self, ValidationError> {
        let route = Self::fixed(&["migration"]).with("source", source)?;
        match dest {
            Some(dest) => route.with("destination", dest),
            None => Ok(route),
        }
    }

    pub fn backup(service: &str) -> Result<Self, ValidationError> {
        Self::fixed(&["backup"]).with("service", service)
    }

    pub fn restore(service: &str) -> Result<Self, ValidationError> {
        Self::fixed(&["restore"]).with("service", service)
    }

    pub fn credentials() -> Self {
        Self::fixed(&["credentials"])
    }

    pub fn credential(id: u64) -> Self {
        Self::fixed(&["credentials", &id.to_string()])
    }

    pub fn tasks() -> Self {
        Self::fixed(&["task"])
    }

    pub fn task(id: &str) -> Result<Self, ValidationError> {
        Self::tasks().with("task id", id)
    }

    pub fn service_apply() -> Self {
        Self::fixed(&["service", "apply"])
    }

    pub fn service_destroy() -> Self {
        Self::fixed(&["service", "destroy"])
    }

    pub fn service_clear_all() -> Self {
        Self::fixed(&["service", "clearAll"])
    }

    /// Path as it appears on the wire, e.g. `/migrate/objectstorage`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    fn resolve(&self, base: &Url) -> Result<Url, SubmitError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| SubmitError::Request(format!("`{base}` cannot carry a path")))?
            .pop_if_empty()
            .extend(&self.segments);
        Ok(url)
    }
}

/// A select value used as a path segment: blank or the placeholder means
/// nothing was chosen.
fn selection(what: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() || value == UNSELECTED {
        return Err(ValidationError::missing_selection(what));
    }
    if value.contains('/') {
        return Err(ValidationError::InvalidValue {
            what,
            reason: format!("`{value}` must be a single path segment"),
        });
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Raw form fields; files are read when the request is sent.
    Multipart(FormFields),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub route: Route,
    pub body: RequestBody,
}

impl Request {
    pub fn new(method: Method, route: Route, body: RequestBody) -> Self {
        Self {
            method,
            route,
            body,
        }
    }

    pub fn post_json(route: Route, body: Value) -> Self {
        Self::new(Method::POST, route, RequestBody::Json(body))
    }

    pub fn get(route: Route) -> Self {
        Self::new(Method::GET, route, RequestBody::Empty)
    }

    pub fn delete(route: Route) -> Self {
        Self::new(Method::DELETE, route, RequestBody::Empty)
    }
}

/// Sends requests to one server. Failures are never retried.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: Client,
    base: Url,
}

impl Dispatcher {
    pub fn new(settings: &ApiSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base: settings.base_url.clone(),
        })
    }

    /// Dispatcher with default client settings, for callers without a
    /// settings file.
    pub fn with_base(base: &str) -> Result<Self, SubmitError> {
        let mut base = Url::parse(base)
            .map_err(|err| SubmitError::Request(format!("invalid base URL: {err}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn url(&self, route: &Route) -> Result<Url, SubmitError> {
        route.resolve(&self.base)
    }

    /// Send and decode the JSON response. An empty success body decodes to
    /// `null`.
    pub async fn send(&self, request: &Request) -> Result<Value, SubmitError> {
        let url = self.url(&request.route)?;
        info!(method = %request.method, path = url.path(), "dispatching request");

        let mut builder = self.client.request(request.method.clone(), url);
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => {
                debug!(body = %body, "json body");
                builder.json(body)
            }
            RequestBody::Multipart(fields) => {
                debug!(
                    fields = fields.len(),
                    attachments = fields.files().count(),
                    "multipart body"
                );
                builder.multipart(multipart_form(fields).await?)
            }
        };

        let resp = builder.send().await?;
        Self::handle(resp).await
    }

    async fn handle(resp: Response) -> Result<Value, SubmitError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let message = server_message(&bytes);
            warn!(status = status.as_u16(), message = %message, "server rejected request");
            return Err(SubmitError::Server { status, message });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| SubmitError::Decode(format!("failed to parse body: {e}")))
    }
}

/// Human-readable reason from an error body: `message`, then `Error`, then
/// `Result`, then the raw text.
fn server_message(bytes: &[u8]) -> String {
    if let Ok(Value::Object(body)) = serde_json::from_slice::<Value>(bytes) {
        for key in ["message", "Error", "Result"] {
            if let Some(Value::String(text)) = body.get(key)
                && !text.is_empty()
            {
                return text.clone();
            }
        }
    }
    String::from_utf8_lossy(bytes).trim().to_string()
}

async fn multipart_form(fields: &FormFields) -> Result<Form, SubmitError> {
    let mut form = Form::new();
    for (name, value) in fields.iter() {
        form = match value {
            FieldValue::Text(text) => form.text(name.to_string(), text.clone()),
            FieldValue::File(file) => {
                let data =
                    tokio::fs::read(&file.path)
                        .await
                        .map_err(|source| SubmitError::Attachment {
                            path: file.path.display().to_string(),
                            source,
                        })?;
                let part = Part::bytes(data)
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)?;
                form.part(name.to_string(), part)
            }
        };
    }
    Ok(form)
}
