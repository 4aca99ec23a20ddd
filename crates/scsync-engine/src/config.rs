use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub aws: AwsSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Catalog validations
        if self.catalog.templates_prefix.trim_matches('/').is_empty() {
            return Err("catalog.templates_prefix must not be empty".into());
        }
        if self.catalog.mapping_suffix.is_empty() {
            return Err("catalog.mapping_suffix must not be empty".into());
        }
        if self.catalog.packages_dir.is_empty() {
            return Err("catalog.packages_dir must not be empty".into());
        }
        let base = &self.catalog.template_url_base;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err("catalog.template_url_base must start with http:// or https://".into());
        }
        if matches!(self.catalog.template_bucket.as_deref(), Some("")) {
            return Err("catalog.template_bucket must not be empty when set".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

/// Where templates go and how manifests are found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Key prefix of stored templates inside the bucket
    #[serde(default = "default_templates_prefix")]
    pub templates_prefix: String,
    /// Base of the URL the catalog loads templates from
    #[serde(default = "default_template_url_base")]
    pub template_url_base: String,
    /// Directory of vendor folders inside the artifact
    #[serde(default = "default_packages_dir")]
    pub packages_dir: String,
    /// File name suffix identifying manifests
    #[serde(default = "default_mapping_suffix")]
    pub mapping_suffix: String,
    /// Bucket for templates; defaults to the artifact bucket
    #[serde(default)]
    pub template_bucket: Option<String>,
}

fn default_templates_prefix() -> String {
    "sc-templates".into()
}
fn default_template_url_base() -> String {
    "https://s3.amazonaws.com".into()
}
fn default_packages_dir() -> String {
    "packages".into()
}
fn default_mapping_suffix() -> String {
    "mapping.yaml".into()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            templates_prefix: default_templates_prefix(),
            template_url_base: default_template_url_base(),
            packages_dir: default_packages_dir(),
            mapping_suffix: default_mapping_suffix(),
            template_bucket: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsSettings {
    /// Region override; the SDK default chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for every client (e.g. a local emulator)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::SyncConfig;
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    /// Environment variable naming the config file when no path is given.
    pub const CONFIG_PATH_ENV: &str = "SCSYNC_CONFIG";

    pub fn load_config(path: Option<&str>) -> Result<SyncConfig, String> {
        let mut builder = Config::builder();
        let explicit = path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok());
        match explicit {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if !pathbuf.exists() {
                    return Err(format!("config file not found: {}", pathbuf.display()));
                }
                builder = builder.add_source(File::from(pathbuf));
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from("scsync.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., SCSYNC__CATALOG__TEMPLATES_PREFIX=templates
        builder = builder.add_source(
            Environment::with_prefix("SCSYNC")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: SyncConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn load_config_with_default_path<P: AsRef<Path>>(
        path: Option<P>,
    ) -> Result<SyncConfig, String> {
        let p = path
            .as_ref()
            .map(|p| p.as_ref().to_string_lossy().to_string());
        load_config(p.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SyncConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.catalog.templates_prefix, "sc-templates");
        assert_eq!(cfg.catalog.template_url_base, "https://s3.amazonaws.com");
        assert_eq!(cfg.catalog.mapping_suffix, "mapping.yaml");
        assert!(cfg.catalog.template_bucket.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = SyncConfig::default();
        cfg.catalog.templates_prefix = "/".into();
        assert!(cfg.validate().is_err());

        let mut cfg = SyncConfig::default();
        cfg.catalog.template_url_base = "s3.amazonaws.com".into();
        assert!(cfg.validate().is_err());

        let mut cfg = SyncConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().is_err());
    }
}
