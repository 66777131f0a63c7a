//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quality = self.conversion.quality;
        if !(0.0..=100.0).contains(&quality) {
            return Err(ConfigError::ValidationError(
                "conversion.quality must be between 0 and 100".into(),
            ));
        }
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be at least 1".into(),
            ));
        }
        if self.pipeline.buffer_size == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.buffer_size must be > 0".into(),
            ));
        }
        if self.resize.thumbnail_percent > 100 {
            return Err(ConfigError::ValidationError(
                "resize.thumbnail_percent must be between 0 and 100".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_parallel_workers() {
        let mut config = Config::default();
        config.processing.parallel_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[test]
    fn test_validate_rejects_quality_out_of_range() {
        let mut config = Config::default();
        config.conversion.quality = 100.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("conversion.quality"));

        config.conversion.quality = -1.0;
        assert!(config.validate().is_err());

        config.conversion.quality = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_thumbnail_over_100() {
        let mut config = Config::default();
        config.resize.thumbnail_percent = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("thumbnail_percent"));

        config.resize.thumbnail_percent = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let mut config = Config::default();
        config.pipeline.buffer_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("buffer_size"));
    }
}
