use anyhow::Context;
use bevy::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::record::SaveRecord;
use crate::core::resources::SaveConfig;
use crate::data::catalog::ItemCatalog;
use crate::inventory::components::Inventory;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file io error: {0}")]
    Io(#[from] io::Error),
    #[error("save file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// 一次读档的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// 没有存档，背包保持原样
    Missing,
    Loaded {
        restored: usize,
        /// 目录里找不到的物品 id
        skipped: Vec<String>,
    },
}

/// 背包存档文件
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<数据目录>/<app_dir>/<file_name>`，配置里给了 directory 时直接用它
    pub fn in_data_dir(config: &SaveConfig) -> anyhow::Result<Self> {
        let dir = match &config.directory {
            Some(dir) => dir.clone(),
            None => {
                let mut base = dirs::data_dir()
                    .or_else(|| {
                        dirs::home_dir().map(|mut h| {
                            h.push(".local");
                            h.push("share");
                            h
                        })
                    })
                    .context("failed to resolve data directory - tried data_dir() and home_dir()/.local/share")?;
                base.push(&config.app_dir);
                base
            }
        };

        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create save directory at {}", dir.display()))?;

        Ok(Self::new(dir.join(&config.file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn save(&self, inventory: &Inventory) -> Result<(), SaveError> {
        let record = SaveRecord::capture(inventory);
        let json = serde_json::to_string_pretty(&record)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        debug!("背包已保存到 {}", self.path.display());
        Ok(())
    }

    /// 先完整解析，再清空背包按原下标放回
    pub fn load(&self, inventory: &mut Inventory, catalog: &ItemCatalog) -> Result<LoadReport, SaveError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadReport::Missing),
            Err(e) => return Err(e.into()),
        };
        let record: SaveRecord = serde_json::from_str(&text)?;

        inventory.clear_all_slots();

        let mut restored = 0;
        let mut skipped = Vec::new();
        for (index, entry) in record.slots.iter().enumerate().take(inventory.slot_count()) {
            if entry.is_empty() {
                continue;
            }
            let Some(item) = catalog.get(&entry.item_id) else {
                warn!("存档中的物品 {} 不在物品表中，已跳过", entry.item_id);
                skipped.push(entry.item_id.clone());
                continue;
            };
            match inventory.restore_slot(index, item, entry.quantity) {
                Ok(()) => restored += 1,
                Err(e) => warn!("读档时格子 {index} 未能完整放回: {e}"),
            }
        }

        if record.slots.len() > inventory.slot_count() {
            warn!(
                "存档有 {} 格，背包只有 {} 格，多出的部分已忽略",
                record.slots.len(),
                inventory.slot_count()
            );
        }

        Ok(LoadReport::Loaded { restored, skipped })
    }

    /// 返回是否真的删掉了文件
    pub fn delete(&self) -> Result<bool, SaveError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
