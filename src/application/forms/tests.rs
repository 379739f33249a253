use httpmock::MockServer;
use serde_json::json;

use super::*;
use crate::application::submit::testing::{RecordingIndicator, RecordingSink};
use crate::application::submit::{SubmitControl, SubmitState};
use crate::domain::filter::FIXED_UTC_OFFSET;
use crate::domain::provider::NCP_DEFAULT_ENDPOINT;

fn fields(pairs: &[(&str, &str)]) -> FormFields {
    pairs.iter().copied().collect()
}

fn migration_form() -> FormFields {
    fields(&[
        ("sourcePoint[provider]", "aws"),
        ("sourcePoint[credentialId]", "3"),
        ("sourcePoint[bucket]", "src-bucket"),
        ("targetPoint[provider]", "ncp"),
        ("targetPoint[credentialId]", "7"),
        ("targetPoint[bucket]", "dst-bucket"),
        ("targetPoint[endpoint]", ""),
        ("sourceFilter[contains]", "a, b"),
        ("sourceFilter[minSize]", ""),
        ("sourceFilter[modifiedAfter]", "2024-03-01 12:30"),
    ])
}

#[test]
fn migration_payload_is_fully_normalized() {
    let request = migration_request("objectstorage", &migration_form()).expect("valid");
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.route.path(), "/migrate/objectstorage");

    let RequestBody::Json(body) = request.body else {
        panic!("migration must be sent as JSON");
    };
    assert_eq!(body["sourcePoint"]["credentialId"], json!(3));
    assert!(body["sourcePoint"].get("endpoint").is_none());
    assert_eq!(body["targetPoint"]["credentialId"], json!(7));
    assert_eq!(body["targetPoint"]["endpoint"], json!(NCP_DEFAULT_ENDPOINT));
    assert_eq!(body["sourceFilter"]["contains"], json!(["a", "b"]));
    assert_eq!(body["sourceFilter"]["minSize"], Value::Null);
    assert_eq!(
        body["sourceFilter"]["modifiedAfter"],
        json!(format!("2024-03-01T12:30{FIXED_UTC_OFFSET}"))
    );
}

#[test]
fn checkbox_values_become_booleans_outside_the_filter() {
    let payload = job_payload(
        &fields(&[
            ("targetPoint[provider]", "aws"),
            ("targetPoint[credentialId]", "1"),
            ("deleteSource", "on"),
            ("sourceFilter[exact]", "on"),
        ]),
        true,
    )
    .expect("valid");
    assert_eq!(payload.get("deleteSource"), Some(&json!(true)));
    assert_eq!(payload.get("sourceFilter").map(|f| &f["exact"]), Some(&json!("on")));
}

#[test]
fn generate_switches_to_multipart_for_gcp_targets() {
    let form = fields(&[("targetPoint[provider]", "gcp"), ("targetPoint[bucket]", "b")]);
    let request = generate_request("gcs", &form).expect("valid");
    assert_eq!(request.route.path(), "/generate/gcs");
    assert!(matches!(request.body, RequestBody::Multipart(_)));

    let request = generate_request("s3", &form).expect("valid");
    assert!(matches!(request.body, RequestBody::Json(_)));
}

#[test]
fn backup_with_attachment_is_multipart() {
    let mut form = fields(&[("targetPoint[path]", "/tmp/dump")]);
    form.push(
        "gcpCredential",
        crate::domain::form::FieldValue::File(crate::domain::form::FilePart::from_path(
            "key.json",
        )),
    );
    let request = backup_request("objectstorage", &form).expect("valid");
    assert!(matches!(request.body, RequestBody::Multipart(_)));
}

#[test]
fn unselected_credential_blocks_the_request() {
    let mut form = migration_form();
    form.push_text("sourcePoint[credentialId]", "none");
    let err = migration_request("objectstorage", &form).expect_err("placeholder credential");
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::MissingCredential {
            point: "sourcePoint"
        })
    ));
}

#[test]
fn credential_json_must_parse() {
    let request = CredentialForm {
        csp_type: "aws".into(),
        name: "prod".into(),
        credential_json: "{not json".into(),
    };
    let err = credential_create_request(&request).expect_err("invalid json");
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::InvalidValue { .. })
    ));

    let request = CredentialForm {
        csp_type: "none".into(),
        ..request
    };
    assert!(matches!(
        credential_create_request(&request),
        Err(SubmitError::Validation(ValidationError::MissingSelection { .. }))
    ));
}

#[test]
fn credential_json_is_sent_as_an_object() {
    let form = CredentialForm {
        csp_type: "aws".into(),
        name: "prod".into(),
        credential_json: r#"{"accessKey":"a","secretKey":"s"}"#.into(),
    };
    let request = credential_create_request(&form).expect("valid");
    assert_eq!(request.route.path(), "/credentials");
    let RequestBody::Json(body) = request.body else {
        panic!("credential must be sent as JSON");
    };
    assert!(body["credentialJson"].is_object());
    assert_eq!(body["credentialJson"]["accessKey"], "a");
}

#[test]
fn job_result_renders_result_field() {
    let text = ResultKind::JobResult
        .render(&json!({"Result": "migrated 3 objects", "Error": null}))
        .expect("render");
    assert_eq!(text, "migrated 3 objects");

    let text = ResultKind::CredentialSaved
        .render(&json!({"credentialId": 12, "cspType": "aws"}))
        .expect("render");
    assert_eq!(text, "credential 12 registered");
    assert!(ResultKind::CredentialSaved.render(&Value::Null).is_err());
}

#[tokio::test]
async fn migration_round_trip_shows_server_result() -> Result<(), SubmitError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/migrate/objectstorage")
            .json_body_includes(
                r#"{
                    "sourcePoint": {"credentialId": 3},
                    "targetPoint": {"credentialId": 7, "endpoint": "https://kr.object.ncloudstorage.com"},
                    "sourceFilter": {"minSize": null, "contains": ["a", "b"]}
                }"#,
            );
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"Result":"migration finished","Error":null}"#);
    });

    let dispatcher = Dispatcher::with_base(&server.base_url())?;
    let control = SubmitControl::new("migrate");
    let sink = RecordingSink::default();
    let indicator = RecordingIndicator::default();
    let view = FormView::new(&control, &sink, &indicator);

    let text = submit_migration(&view, &dispatcher, "objectstorage", &migration_form()).await?;

    mock.assert();
    assert_eq!(text, "migration finished");
    assert_eq!(sink.shown(), vec!["migration finished".to_string()]);
    assert!(sink.alerts().is_empty());
    assert_eq!(indicator.events(), vec!["on", "off"]);
    assert_eq!(control.state(), SubmitState::Idle);
    assert_eq!(control.last_outcome(), SubmitState::Succeeded);
    Ok(())
}

#[tokio::test]
async fn validation_failure_alerts_without_touching_the_control() -> Result<(), SubmitError> {
    // Nothing listens here; reaching the network would surface a transport error.
    let dispatcher = Dispatcher::with_base("http://127.0.0.1:9")?;
    let control = SubmitControl::new("backup");
    let sink = RecordingSink::default();
    let indicator = RecordingIndicator::default();
    let view = FormView::new(&control, &sink, &indicator);

    let form = fields(&[("sourcePoint[provider]", "aws"), ("sourcePoint[bucket]", "none")]);
    let err = submit_backup(&view, &dispatcher, "objectstorage", &form)
        .await
        .expect_err("bucket placeholder");

    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::MissingBucket {
            point: "sourcePoint"
        })
    ));
    assert_eq!(sink.alerts(), vec![err.to_string()]);
    assert!(indicator.events().is_empty());
    assert_eq!(control.last_outcome(), SubmitState::Idle);
    Ok(())
}

#[tokio::test]
async fn server_error_is_alerted_and_marks_failure() -> Result<(), SubmitError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/restore/rdb");
        then.status(500)
            .header("content-type", "application/json")
            .body(r#"{"Result":"","Error":"dump file not found"}"#);
    });

    let dispatcher = Dispatcher::with_base(&server.base_url())?;
    let control = SubmitControl::new("restore");
    let sink = RecordingSink::default();
    let indicator = RecordingIndicator::default();
    let view = FormView::new(&control, &sink, &indicator);

    let form = fields(&[("targetPoint[provider]", "aws"), ("targetPoint[credentialId]", "2")]);
    let err = submit_restore(&view, &dispatcher, "rdb", &form)
        .await
        .expect_err("server failure");

    assert!(matches!(err, SubmitError::Server { .. }));
    assert!(sink.shown().is_empty());
    assert_eq!(sink.alerts().len(), 1);
    assert!(sink.alerts()[0].contains("dump file not found"));
    assert_eq!(indicator.events(), vec!["on", "off"]);
    assert_eq!(control.last_outcome(), SubmitState::Failed);
    Ok(())
}

#[tokio::test]
async fn credential_creation_reports_new_id() -> Result<(), SubmitError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/credentials")
            .json_body_includes(
                r#"{"cspType":"ncp","name":"ops","credentialJson":{"accessKey":"a","secretKey":"s"}}"#,
            );
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"credentialId":21,"cspType":"ncp","name":"ops"}"#);
    });

    let dispatcher = Dispatcher::with_base(&server.base_url())?;
    let control = SubmitControl::new("credentials");
    let sink = RecordingSink::default();
    let view = FormView::new(&control, &sink, &crate::application::submit::NoIndicator);

    let request = CredentialForm {
        csp_type: "ncp".into(),
        name: "ops".into(),
        credential_json: r#"{"accessKey":"a","secretKey":"s"}"#.into(),
    };
    let text = create_credential(&view, &dispatcher, &request).await?;

    mock.assert();
    assert_eq!(text, "credential 21 registered");
    assert_eq!(sink.shown(), vec![text]);
    Ok(())
}

#[tokio::test]
async fn gcs_generation_uploads_text_and_file_parts() -> Result<(), SubmitError> {
    let dir = tempfile::tempdir().expect("tmp dir");
    let key_path = dir.path().join("key.json");
    std::fs::write(&key_path, r#"{"type":"service_account"}"#).expect("write key");

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/generate/gcs")
            .body_includes(r#"name="targetPoint[bucket]""#)
            .body_includes("gen-bucket")
            .body_includes(r#"filename="key.json""#)
            .body_includes(r#"{"type":"service_account"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"Result":"gen ok","Error":null}"#);
    });

    let dispatcher = Dispatcher::with_base(&server.base_url())?;
    let control = SubmitControl::new("generate");
    let sink = RecordingSink::default();
    let indicator = RecordingIndicator::default();
    let view = FormView::new(&control, &sink, &indicator);

    let mut form = fields(&[("targetPoint[provider]", "gcp"), ("targetPoint[bucket]", "gen-bucket")]);
    form.push(
        "gcpCredential",
        crate::domain::form::FieldValue::File(crate::domain::form::FilePart::from_path(
            key_path.clone(),
        )),
    );
    let text = submit_generate(&view, &dispatcher, "gcs", &form).await?;

    mock.assert();
    assert_eq!(text, "gen ok");
    assert_eq!(control.last_outcome(), SubmitState::Succeeded);
    Ok(())
}

#[tokio::test]
async fn credential_list_filters_by_provider() -> Result<(), SubmitError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/credentials");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"[
                    {"credentialId":1,"cspType":"aws","name":"a"},
                    {"credentialId":2,"cspType":"ncp","name":"n"},
                    {"credentialId":3,"cspType":"AWS","name":"b"}
                ]"#,
            );
    });

    let dispatcher = Dispatcher::with_base(&server.base_url())?;
    let all = list_credentials(&dispatcher, None).await?;
    assert_eq!(all.len(), 3);

    let aws = list_credentials(&dispatcher, Some("aws")).await?;
    let ids: Vec<u64> = aws.iter().map(|c| c.credential_id).collect();
    assert_eq!(ids, vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn task_lookup_uses_task_route() -> Result<(), SubmitError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/task/abc-1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"taskId":"abc-1","status":"done"}"#);
    });

    let dispatcher = Dispatcher::with_base(&server.base_url())?;
    let task = get_task(&dispatcher, "abc-1").await?;
    mock.assert();
    assert_eq!(task["status"], "done");
    Ok(())
}
