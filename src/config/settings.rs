use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

fn default_latitude() -> f64 {
    -6.2088
}
fn default_longitude() -> f64 {
    106.8456
}
fn default_location_name() -> String {
    "Jakarta".to_string()
}
fn default_calc_method() -> String {
    "Singapore".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_timezone_offset() -> i32 {
    420
}
fn default_hijri_offset() -> i32 {
    0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLanguage {
    #[default]
    En,
    Id,
}

impl AppLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppLanguage::En => "en",
            AppLanguage::Id => "id",
        }
    }
}

impl FromStr for AppLanguage {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(AppLanguage::En),
            "id" | "indonesian" | "bahasa" => Ok(AppLanguage::Id),
            _ => Err(anyhow::anyhow!("Unknown language: {} (use en or id)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeColor {
    #[default]
    #[serde(rename = "#00695c")]
    Teal,
    #[serde(rename = "#1976D2")]
    Blue,
    #[serde(rename = "#7B1FA2")]
    Purple,
    #[serde(rename = "#E64A19")]
    Orange,
}

impl ThemeColor {
    pub fn hex(&self) -> &'static str {
        match self {
            ThemeColor::Teal => "#00695c",
            ThemeColor::Blue => "#1976D2",
            ThemeColor::Purple => "#7B1FA2",
            ThemeColor::Orange => "#E64A19",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ThemeColor::Teal => (0x00, 0x69, 0x5c),
            ThemeColor::Blue => (0x19, 0x76, 0xD2),
            ThemeColor::Purple => (0x7B, 0x1F, 0xA2),
            ThemeColor::Orange => (0xE6, 0x4A, 0x19),
        }
    }
}

impl FromStr for ThemeColor {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "teal" | "#00695c" => Ok(ThemeColor::Teal),
            "blue" | "#1976d2" => Ok(ThemeColor::Blue),
            "purple" | "#7b1fa2" => Ok(ThemeColor::Purple),
            "orange" | "#e64a19" => Ok(ThemeColor::Orange),
            _ => Err(anyhow::anyhow!(
                "Unknown theme color: {} (use teal, blue, purple or orange)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub app_language: AppLanguage,
    #[serde(default)]
    pub theme_color: ThemeColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "tilawah")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("tilawah.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.location.name, "Jakarta");
        assert_eq!(cfg.display.theme_color, ThemeColor::Teal);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[location]\nname = \"Bandung\"\nlatitude = -6.9\n\n[display]\ntheme_color = \"#7B1FA2\"\n",
        )
        .unwrap();
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.location.name, "Bandung");
        assert_eq!(cfg.location.latitude, -6.9);
        assert_eq!(cfg.location.longitude, 106.8456);
        assert_eq!(cfg.location.madhab, "Shafi");
        assert_eq!(cfg.display.theme_color, ThemeColor::Purple);
        assert_eq!(cfg.display.app_language, AppLanguage::En);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.location.timezone_offset = 480;
        cfg.display.app_language = AppLanguage::Id;
        cfg.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn bad_theme_color_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ntheme_color = \"#ffffff\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn parse_user_choices() {
        assert_eq!("Blue".parse::<ThemeColor>().unwrap(), ThemeColor::Blue);
        assert_eq!("#E64A19".parse::<ThemeColor>().unwrap(), ThemeColor::Orange);
        assert_eq!("id".parse::<AppLanguage>().unwrap(), AppLanguage::Id);
        assert!("fr".parse::<AppLanguage>().is_err());
    }
}
