use crate::config::types::{FieldSpec, ScrapeConfig, MAX_DEPTH_CEILING};
use crate::ConfigError;

/// Validates a resolved configuration.
///
/// Runs before any navigation; a violation here is a configuration
/// error, never a runtime one.
pub fn validate(config: &ScrapeConfig) -> Result<(), ConfigError> {
    validate_depth(config.max_depth)?;
    validate_fields(&config.fields)?;
    validate_timing(config)?;
    Ok(())
}

/// Enforces the absolute depth ceiling.
fn validate_depth(max_depth: u32) -> Result<(), ConfigError> {
    if max_depth > MAX_DEPTH_CEILING {
        return Err(ConfigError::DepthLimit {
            requested: max_depth,
            ceiling: MAX_DEPTH_CEILING,
        });
    }
    Ok(())
}

/// Validates field specs: unique non-empty names, at least one
/// non-empty selector each.
fn validate_fields(fields: &[FieldSpec]) -> Result<(), ConfigError> {
    let mut seen = std::collections::HashSet::new();

    for field in fields {
        if field.name.is_empty() {
            return Err(ConfigError::Validation(
                "field name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate field name '{}'",
                field.name
            )));
        }

        if field.selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "field '{}' must have at least one selector",
                field.name
            )));
        }

        for selector in field.selectors.as_slice() {
            if selector.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "field '{}' has an empty selector",
                    field.name
                )));
            }
        }
    }

    Ok(())
}

/// Validates retry and timeout settings.
fn validate_timing(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.retry_count < 1 {
        return Err(ConfigError::Validation(format!(
            "retry_count must be >= 1, got {}",
            config.retry_count
        )));
    }

    if config.selector_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "selector_timeout must be > 0".to_string(),
        ));
    }

    if config.page_load_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "page_load_timeout must be > 0".to_string(),
        ));
    }

    Ok(())
}
