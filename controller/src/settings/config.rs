// controller/src/settings/config.rs

use std::{
    fs::{
        self,
        File,
    },
    io::{
        BufReader,
        BufWriter,
    },
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

use anyhow::Context;
use directories::UserDirs;
use serde::{
    Deserialize,
    Serialize,
};
use serde_with::with_prefix;
use utils_state::{
    State,
    StateCacheType,
};

use super::EspSettings;
use crate::enhancements::MAX_ACTION_DELAY;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TriggerSettings {
    /// Applied before the press, while holding and after the release.
    pub delay_ms: u64,

    /// Part names which count as a hit.
    pub valid_parts: Vec<String>,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            delay_ms: 50,
            valid_parts: vec!["Head".to_string(), "Torso".to_string()],
        }
    }
}

impl TriggerSettings {
    /// Configured delay, capped at `MAX_ACTION_DELAY`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms).min(MAX_ACTION_DELAY)
    }
}

with_prefix!(serde_prefix_trigger "trigger_");

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub esp_enabled: bool,
    pub esp: EspSettings,

    pub trigger_enabled: bool,
    #[serde(flatten, with = "serde_prefix_trigger")]
    pub trigger: TriggerSettings,

    pub target_frame_rate: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            esp_enabled: true,
            esp: EspSettings::default(),

            trigger_enabled: false,
            trigger: TriggerSettings::default(),

            target_frame_rate: 60,
        }
    }
}

impl State for AppSettings {
    type Parameter = ();

    fn cache_type() -> StateCacheType {
        StateCacheType::Persistent
    }
}

pub fn get_managed_configs_dir() -> anyhow::Result<PathBuf> {
    let user_dirs = UserDirs::new().context("failed to get user directories")?;
    let documents_dir = user_dirs
        .document_dir()
        .context("failed to find documents directory")?;

    Ok(documents_dir.join("OverlayConfig").join("configs"))
}

pub fn get_settings_path() -> anyhow::Result<PathBuf> {
    Ok(get_managed_configs_dir()?.join("default.yaml"))
}

/// Load the settings from `path` or the default location.
/// A missing file gets created with the default settings.
pub fn load_app_settings(path: Option<&Path>) -> anyhow::Result<AppSettings> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => get_settings_path()?,
    };

    if !config_path.is_file() {
        log::info!(
            "App config file {} does not exist. Creating default.",
            config_path.display()
        );

        let config = AppSettings::default();
        save_app_settings(&config, &config_path)?;
        return Ok(config);
    }

    let file = File::open(&config_path)
        .with_context(|| format!("failed to open app config at {}", config_path.display()))?;
    let mut reader = BufReader::new(file);
    let config: AppSettings = serde_yaml::from_reader(&mut reader)
        .with_context(|| format!("failed to parse app config at {}", config_path.display()))?;

    log::info!("Loaded app config from {}", config_path.display());
    Ok(config)
}

pub fn save_app_settings(settings: &AppSettings, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create config directory at {}", parent.display())
        })?;
    }

    let config = File::options()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open app config at {}", path.display()))?;

    let mut config = BufWriter::new(config);
    serde_yaml::to_writer(&mut config, settings).context("failed to serialize config")?;
    log::debug!("Saved app config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_settings_are_prefixed() {
        let yaml = serde_yaml::to_string(&AppSettings::default()).unwrap();
        assert!(yaml.contains("trigger_enabled"));
        assert!(yaml.contains("trigger_delay_ms"));
        assert!(yaml.contains("trigger_valid_parts"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: AppSettings = serde_yaml::from_str(
            r#"
esp_enabled: false
trigger_delay_ms: 120
esp:
  draw_line: false
"#,
        )
        .unwrap();

        assert!(!settings.esp_enabled);
        assert!(!settings.esp.draw_line);
        assert!(settings.esp.draw_box);
        assert_eq!(settings.trigger.delay(), Duration::from_millis(120));
        assert_eq!(settings.trigger.valid_parts, TriggerSettings::default().valid_parts);
        assert_eq!(settings.target_frame_rate, 60);
    }

    #[test]
    fn trigger_delay_is_capped() {
        let settings = TriggerSettings {
            delay_ms: u64::MAX,
            ..Default::default()
        };
        assert_eq!(settings.delay(), MAX_ACTION_DELAY);
    }

    #[test]
    fn settings_file_is_created_and_reloaded() {
        let path = std::env::temp_dir()
            .join(format!("overlay-config-{}", std::process::id()))
            .join("default.yaml");
        let _ = fs::remove_file(&path);

        let created = load_app_settings(Some(path.as_path())).unwrap();
        assert!(path.is_file());

        let mut modified = created.clone();
        modified.trigger_enabled = true;
        modified.esp.width_offset = 3.0;
        save_app_settings(&modified, &path).unwrap();

        let loaded = load_app_settings(Some(path.as_path())).unwrap();
        assert_eq!(loaded, modified);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_settings_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("overlay-config-invalid-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("default.yaml");
        fs::write(&path, "esp_enabled: [not, a, bool]").unwrap();

        assert!(load_app_settings(Some(path.as_path())).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
