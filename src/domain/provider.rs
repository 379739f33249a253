//! Point descriptor normalization (`sourcePoint` / `targetPoint`).

use datamgr_api_types::Provider;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ValidationError;
use super::payload::Payload;

/// Endpoint used for NCP object storage when the form leaves it blank.
pub const NCP_DEFAULT_ENDPOINT: &str = "https://kr.object.ncloudstorage.com";

/// Placeholder value of an unselected `<select>`.
pub const UNSELECTED: &str = "none";

pub const POINT_GROUPS: [&str; 2] = ["sourcePoint", "targetPoint"];

/// Normalize every point descriptor present in the payload.
pub fn normalize_points(payload: &mut Payload) -> Result<(), ValidationError> {
    for point in POINT_GROUPS {
        if let Some(group) = payload.group_mut(point) {
            normalize_point(point, group)?;
        }
    }
    Ok(())
}

/// Parse `credentialId`, reject placeholder selections and apply the
/// endpoint policy: only `ncp` points carry an `endpoint`, defaulted when
/// blank.
pub fn normalize_point(
    point: &'static str,
    group: &mut Map<String, Value>,
) -> Result<(), ValidationError> {
    if let Some(raw) = group.get("credentialId") {
        let id = parse_credential_id(point, raw)?;
        group.insert("credentialId".to_string(), Value::from(id));
    }

    if let Some(Value::String(bucket)) = group.get("bucket")
        && bucket == UNSELECTED
    {
        return Err(ValidationError::MissingBucket { point });
    }

    let provider = group
        .get("provider")
        .and_then(Value::as_str)
        .map(Provider::from);

    if provider == Some(Provider::Ncp) {
        let blank = group
            .get("endpoint")
            .and_then(Value::as_str)
            .is_none_or(|endpoint| endpoint.trim().is_empty());
        if blank {
            debug!(point, endpoint = NCP_DEFAULT_ENDPOINT, "defaulting ncp endpoint");
            group.insert(
                "endpoint".to_string(),
                Value::String(NCP_DEFAULT_ENDPOINT.to_string()),
            );
        }
    } else {
        group.remove("endpoint");
    }

    Ok(())
}

fn parse_credential_id(point: &'static str, raw: &Value) -> Result<i64, ValidationError> {
    match raw {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| ValidationError::InvalidCredential {
                point,
                value: number.to_string(),
            }),
        Value::String(text) => {
            let text = text.trim();
            if text == UNSELECTED || text.is_empty() {
                return Err(ValidationError::MissingCredential { point });
            }
            text.parse::<i64>()
                .map_err(|_| ValidationError::InvalidCredential {
                    point,
                    value: text.to_string(),
                })
        }
        other => Err(ValidationError::InvalidCredential {
            point,
            value: other.to_string(),
        }),
    }
}
