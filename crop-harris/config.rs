use crate::builder::DetectorBuilder;
use crate::detector::HarrisCropper;
use crate::error::CropResult;
use crop_core::{Connectivity, CropConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detector configuration with metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Metadata
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,
    /// Pipeline parameters
    #[cfg_attr(feature = "serde", serde(default))]
    pub core: CropConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorConfig {
    /// Create new configuration with default settings
    pub fn new() -> Self {
        Self {
            core: CropConfig::default(),
            name: None,
            description: None,
            version: None,
        }
    }

    /// Narrow blur and a looser cutoff: more, tighter proposals
    pub fn fine_preset() -> Self {
        Self {
            core: CropConfig {
                block_size: 5,
                blur_kernel_size: 15,
                blur_sigma: 2.5,
                threshold_factor: 1.0,
                ..CropConfig::default()
            },
            name: Some("Fine".to_string()),
            description: Some("Small objects, tight boxes, more proposals".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Wide blur and a stricter cutoff: fewer, larger proposals
    pub fn coarse_preset() -> Self {
        Self {
            core: CropConfig {
                block_size: 11,
                blur_kernel_size: 61,
                blur_sigma: 10.0,
                threshold_factor: 1.2,
                connectivity: Connectivity::Eight,
                ..CropConfig::default()
            },
            name: Some("Coarse".to_string()),
            description: Some("Large objects, merged blobs, fewer proposals".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Build the pipeline described by this configuration
    pub fn build(&self) -> CropResult<HarrisCropper> {
        HarrisCropper::new(self.core.clone())
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "DetectorConfig: block={}, aperture={}, k={}, blur={}x{} (sigma {}), factor={}, connectivity={:?}, label={}, threads={}",
            self.core.block_size,
            self.core.aperture_size,
            self.core.k,
            self.core.blur_kernel_size,
            self.core.blur_kernel_size,
            self.core.blur_sigma,
            self.core.threshold_factor,
            self.core.connectivity,
            self.core.label,
            self.core.n_threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> CropResult<()> {
        self.build().map(|_| ())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CropError;

    #[test]
    fn test_presets_validate() {
        assert!(DetectorConfig::new().validate().is_ok());
        assert!(DetectorConfig::fine_preset().validate().is_ok());
        assert!(DetectorConfig::coarse_preset().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = DetectorConfig::new();
        cfg.core.aperture_size = 9;
        assert_eq!(cfg.validate(), Err(CropError::InvalidApertureSize(9)));

        let mut cfg = DetectorConfig::new();
        cfg.core.threshold_factor = -1.0;
        assert!(matches!(cfg.validate(), Err(CropError::InvalidThresholdFactor(_))));
    }

    #[test]
    fn test_metadata_and_summary() {
        let cfg = DetectorConfig::new().with_metadata("Field", "Soccer field proposals");
        assert_eq!(cfg.name.as_deref(), Some("Field"));
        assert_eq!(cfg.version.as_deref(), Some("1.0"));
        let summary = cfg.summary();
        assert!(summary.contains("block=9"));
        assert!(summary.contains("blur=31x31"));
        assert!(summary.contains("label=ball"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_roundtrip() {
        let cfg = DetectorConfig::coarse_preset();
        let json = cfg.to_json().unwrap();
        assert_eq!(DetectorConfig::from_json(&json).unwrap(), cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_partial_uses_defaults() {
        let cfg = DetectorConfig::from_toml(
            r#"
            name = "partial"

            [core]
            threshold_factor = 1.3
            connectivity = "four"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.core.threshold_factor, 1.3);
        assert_eq!(cfg.core.connectivity, Connectivity::Four);
        assert_eq!(cfg.core.block_size, 9);
        assert_eq!(cfg.name.as_deref(), Some("partial"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_validates() {
        let result = DetectorConfig::from_json(r#"{ "core": { "blur_kernel_size": 10 } }"#);
        assert!(result.is_err());
    }
}
