use lodix_api::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Request-facing knobs, all overridable from the environment in `main`.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Rejects configurations that would make the service misbehave quietly.
/// Called once at startup; the process refuses to boot on violation.
pub fn validate_startup_config(config: &ApiConfig) -> Result<(), String> {
    if config.max_body_bytes == 0 {
        return Err("max_body_bytes must be > 0".to_string());
    }
    if config.default_page_size == 0 || config.max_page_size == 0 {
        return Err("page sizes must be > 0".to_string());
    }
    if config.default_page_size > config.max_page_size {
        return Err(format!(
            "default_page_size {} exceeds max_page_size {}",
            config.default_page_size, config.max_page_size
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        validate_startup_config(&ApiConfig::default()).expect("default config");
    }

    #[test]
    fn inverted_page_sizes_are_rejected() {
        let config = ApiConfig {
            default_page_size: 200,
            max_page_size: 100,
            ..ApiConfig::default()
        };
        assert!(validate_startup_config(&config).is_err());
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let config = ApiConfig {
            max_body_bytes: 0,
            ..ApiConfig::default()
        };
        assert!(validate_startup_config(&config).is_err());
    }
}
