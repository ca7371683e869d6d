use crate::config::types::WindockConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// Checks that every configured value is finite and inside its meaningful
/// range. Unset values are always valid because their defaults are.
pub fn validate_config(config: &WindockConfig) -> Result<(), ConfigError> {
    let invalid = |message: String| Err(ConfigError::InvalidConfiguration { message });

    for (name, value) in [
        ("geometry.min_width", config.geometry.min_width),
        ("geometry.min_height", config.geometry.min_height),
    ] {
        if let Some(v) = value
            && (!v.is_finite() || v < 0.0)
        {
            return invalid(format!("{} must be a non-negative number, got {}", name, v));
        }
    }

    if let Some(timeout) = config.accessibility.messaging_timeout_secs
        && (!timeout.is_finite() || timeout <= 0.0)
    {
        return invalid(format!(
            "accessibility.messaging_timeout_secs must be positive, got {}",
            timeout
        ));
    }

    if let Some(iou) = config.matching.iou_threshold
        && !(iou > 0.0 && iou <= 1.0)
    {
        return invalid(format!(
            "matching.iou_threshold must be in (0, 1], got {}",
            iou
        ));
    }

    if let Some(percent) = config.display.min_overlap_percent
        && !(0.0..=100.0).contains(&percent)
    {
        return invalid(format!(
            "display.min_overlap_percent must be in [0, 100], got {}",
            percent
        ));
    }

    if let Some(px) = config.display.min_overlap_px
        && (!px.is_finite() || px < 0.0)
    {
        return invalid(format!(
            "display.min_overlap_px must be a non-negative number, got {}",
            px
        ));
    }

    if let Some(path) = &config.cache.path
        && path.as_os_str().is_empty()
    {
        return invalid("cache.path must not be empty".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WindockError;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WindockConfig::default()).is_ok());
    }

    #[test]
    fn test_iou_threshold_out_of_range() {
        let mut config = WindockConfig::default();
        config.matching.iou_threshold = Some(0.0);
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
        assert!(err.to_string().contains("iou_threshold"));

        config.matching.iou_threshold = Some(1.5);
        assert!(validate_config(&config).is_err());

        config.matching.iou_threshold = Some(1.0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_overlap_percent_out_of_range() {
        let mut config = WindockConfig::default();
        config.display.min_overlap_percent = Some(150.0);
        assert!(validate_config(&config).is_err());

        config.display.min_overlap_percent = Some(f64::NAN);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_negative_sizes_rejected() {
        let mut config = WindockConfig::default();
        config.geometry.min_width = Some(-1.0);
        assert!(validate_config(&config).is_err());

        let mut config = WindockConfig::default();
        config.display.min_overlap_px = Some(-10.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = WindockConfig::default();
        config.accessibility.messaging_timeout_secs = Some(0.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_cache_path_rejected() {
        let mut config = WindockConfig::default();
        config.cache.path = Some(PathBuf::new());
        assert!(validate_config(&config).is_err());
    }
}
