use std::collections::HashMap;
use thiserror::Error;

use crate::config::{FormConfig, Settings};
use crate::domain::param_info::{kinds, ParamInfo};
use crate::widgets::WidgetRegistry;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown parameter kind '{kind}' at {field}")]
    UnknownKind { field: String, kind: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        Self::validate_with_registry(settings, &WidgetRegistry::with_defaults())
    }

    /// Validate against a registry that may carry custom kinds.
    pub fn validate_with_registry(
        settings: &Settings,
        registry: &WidgetRegistry,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_forms(&settings.forms, registry) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &crate::config::ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_forms(forms: &[FormConfig], registry: &WidgetRegistry) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_names = HashMap::new();

        for (idx, form) in forms.iter().enumerate() {
            if let Some(prev_idx) = seen_names.insert(&form.name, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Form name '{}' appears at indices {} and {}",
                    form.name, prev_idx, idx
                )));
            }

            if form.name.is_empty() {
                errors.push(ValidationError::MissingField(format!("forms[{}].name", idx)));
            }

            Self::validate_schema(&form.schema, &format!("forms[{}].schema", idx), registry, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Recursively check one schema node and its children.
    pub fn validate_schema(
        info: &ParamInfo,
        path: &str,
        registry: &WidgetRegistry,
        errors: &mut Vec<ValidationError>,
    ) {
        if info.short_name.is_empty() {
            errors.push(ValidationError::MissingField(format!("{}.short_name", path)));
        }

        if !registry.contains(&info.kind) {
            errors.push(ValidationError::UnknownKind {
                field: path.to_string(),
                kind: info.kind.clone(),
            });
        }

        match info.kind.as_str() {
            kinds::CHOICE if info.choices.is_empty() => {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.choices", path),
                    reason: "A choice parameter needs at least one option".to_string(),
                });
            }
            kinds::ARRAY | kinds::TESTCASE if info.subparameter.is_none() => {
                errors.push(ValidationError::MissingField(format!("{}.subparameter", path)));
            }
            _ => {}
        }

        let mut seen_short_names = HashMap::new();
        for (idx, sub) in info.subparameters.iter().enumerate() {
            if let Some(prev_idx) = seen_short_names.insert(&sub.short_name, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Short name '{}' appears at {}.subparameters[{}] and [{}]",
                    sub.short_name, path, prev_idx, idx
                )));
            }
            Self::validate_schema(sub, &format!("{}.subparameters[{}]", path, idx), registry, errors);
        }

        if let Some(sub) = &info.subparameter {
            Self::validate_schema(sub, &format!("{}.subparameter", path), registry, errors);
        }
    }
}
