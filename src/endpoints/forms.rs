//! Forms endpoint: schema retrieval, local validation, submission
//!
//! Submissions are POSTs and therefore never pass through a retry policy;
//! a duplicate submission is worse than a surfaced transient error.

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::retry::RetryPolicy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-\+\(\)]+$").unwrap());

/// Result of validating form data against a schema
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Field name -> validation messages
    pub errors: HashMap<String, Vec<String>>,
}

/// Form schema access and submission
pub struct Forms {
    transport: Arc<Transport>,
    retry: RetryPolicy,
}

impl Forms {
    pub fn new(transport: Arc<Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Form definition including fields and validation rules
    pub async fn form(&self, resource: &str, form_slug: &str) -> Result<Value> {
        let path = format!("/v1/{resource}/forms/{form_slug}");
        self.retry
            .execute("get form", || {
                let transport = Arc::clone(&self.transport);
                let path = path.clone();
                async move { transport.get(&path, &[]).await }
            })
            .await
    }

    /// Just the form's schema block
    pub async fn schema(&self, resource: &str, form_slug: &str) -> Result<Value> {
        let form = self.form(resource, form_slug).await?;
        Ok(match form.get("schema") {
            Some(schema) => schema.clone(),
            None => form,
        })
    }

    /// Submit form data; issued exactly once
    pub async fn submit(&self, resource: &str, form_slug: &str, data: &Value) -> Result<Value> {
        let path = format!("/v1/{resource}/forms/{form_slug}");
        self.transport.post(&path, data).await
    }

    /// Validate `data` against a form schema locally
    pub fn validate(schema: &Value, data: &Value) -> ValidationOutcome {
        let mut errors: HashMap<String, Vec<String>> = HashMap::new();

        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return ValidationOutcome {
                valid: true,
                errors,
            };
        };

        for (field, config) in properties {
            let value = data.get(field);
            let required = config
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);

            if required && is_blank(value) {
                errors
                    .entry(field.clone())
                    .or_default()
                    .push(format!("The {field} field is required."));
                continue;
            }

            let Some(value) = value.filter(|v| !is_blank(Some(*v))) else {
                continue;
            };

            let field_type = config.get("type").and_then(Value::as_str).unwrap_or("text");
            if let Some(message) = check_type(field, field_type, value) {
                errors.entry(field.clone()).or_default().push(message);
            }
        }

        ValidationOutcome {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Validate locally, then submit
    ///
    /// Local validation failures surface as [`Error::Validation`] with the
    /// same field->messages shape the server would produce; nothing is
    /// sent in that case.
    pub async fn submit_validated(
        &self,
        resource: &str,
        form_slug: &str,
        data: &Value,
    ) -> Result<Value> {
        let schema = self.schema(resource, form_slug).await?;
        let outcome = Self::validate(&schema, data);
        if !outcome.valid {
            return Err(Error::Validation {
                message: "form validation failed".to_string(),
                errors: outcome.errors,
            });
        }
        self.submit(resource, form_slug, data).await
    }
}

impl std::fmt::Debug for Forms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forms").finish_non_exhaustive()
    }
}

/// Absent, null, or an empty string
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Type-specific check; returns the validation message on failure
fn check_type(field: &str, field_type: &str, value: &Value) -> Option<String> {
    match field_type {
        "email" => {
            let ok = value.as_str().is_some_and(|s| EMAIL_RE.is_match(s));
            (!ok).then(|| format!("The {field} must be a valid email address."))
        }
        "url" => {
            let ok = value.as_str().is_some_and(|s| Url::parse(s).is_ok());
            (!ok).then(|| format!("The {field} must be a valid URL."))
        }
        "number" => {
            let ok = value.is_number()
                || value.as_str().is_some_and(|s| s.parse::<f64>().is_ok());
            (!ok).then(|| format!("The {field} must be a number."))
        }
        "phone_number" => {
            let ok = value.as_str().is_some_and(is_valid_phone);
            (!ok).then(|| format!("The {field} must be a valid phone number."))
        }
        _ => None,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone) && phone.chars().filter(char::is_ascii_digit).count() >= 10
}
