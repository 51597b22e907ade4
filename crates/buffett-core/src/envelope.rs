use serde::Serialize;

use crate::{ProviderId, UtcDateTime, ValidationError};

pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Machine-readable wrapper around a command's payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(meta: EnvelopeMeta, data: T) -> Self {
        Self { meta, data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub source: ProviderId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        schema_version: impl Into<String>,
        source: ProviderId,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: schema_version.into(),
            generated_at: UtcDateTime::now(),
            source,
            warnings: Vec::new(),
        };

        if meta.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }
        if !is_valid_schema_version(&meta.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: meta.schema_version,
            });
        }

        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let parts = version.split('.').collect::<Vec<_>>();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_semver_schema() {
        let meta = EnvelopeMeta::new("request-12345", SCHEMA_VERSION, ProviderId::Yahoo)
            .expect("meta should be valid");
        assert_eq!(meta.schema_version, "v1.0.0");
        assert!(meta.warnings.is_empty());
    }

    #[test]
    fn rejects_bad_schema_version() {
        for bad in ["1.0.0", "v1.0", "v1.x.0", "v1.0.0.0"] {
            let err = EnvelopeMeta::new("request-12345", bad, ProviderId::Manual)
                .expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidSchemaVersion { .. }));
        }
    }

    #[test]
    fn rejects_short_request_id() {
        let err = EnvelopeMeta::new("abc", SCHEMA_VERSION, ProviderId::Manual)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidRequestId);
    }

    #[test]
    fn warnings_are_omitted_when_empty() {
        let meta = EnvelopeMeta::new("request-12345", SCHEMA_VERSION, ProviderId::Fixture)
            .expect("meta should be valid");
        let json = serde_json::to_value(Envelope::new(meta, 1)).expect("serializes");

        assert_eq!(json["meta"]["source"], "fixture");
        assert!(json["meta"].get("warnings").is_none());
        assert_eq!(json["data"], 1);
    }
}
