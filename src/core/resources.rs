use bevy::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件路径（相对工作目录）
pub const CONFIG_PATH: &str = "assets/config/game.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 全局配置（挂在 Resource），所有字段都有默认值
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub inventory: InventoryConfig,
    pub save: SaveConfig,
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub width: usize,
    pub height: usize,
    /// 两次点击间隔小于该值视为双击（秒）
    pub double_click_secs: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 4,
            double_click_secs: 0.35,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub file_name: String,
    pub app_dir: String,
    /// 覆盖默认的数据目录
    pub directory: Option<PathBuf>,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            file_name: "inventory_save.json".into(),
            app_dir: "bevy_inventory".into(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub hover_volume: f32,
    pub dialog_open: String,
    pub dialog_confirm: String,
    pub dialog_cancel: String,
    /// 音效名 → 资源路径
    pub clips: BTreeMap<String, String>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        let clips = [
            ("Move", "sounds/move.wav"),
            ("UsePotionSound", "sounds/use_potion.wav"),
            ("UseQuestSound", "sounds/use_quest.wav"),
            ("OpenWindow", "sounds/open_window.wav"),
            ("Crushed", "sounds/crushed.wav"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();

        Self {
            hover_volume: 0.3,
            dialog_open: "OpenWindow".into(),
            dialog_confirm: "Crushed".into(),
            dialog_cancel: "OpenWindow".into(),
            clips,
        }
    }
}

impl GameConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// 读取失败时退回默认配置；文件不存在不算错误
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("配置文件 {} 无效，使用默认配置: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn slot_count(&self) -> usize {
        self.inventory.width * self.inventory.height
    }
}
