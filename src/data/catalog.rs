use bevy::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use super::schema::{Item, ItemDefinition};

/// 只读物品目录：按 id 查找共享的 Item 句柄
#[derive(Resource, Debug, Default)]
pub struct ItemCatalog {
    items: Vec<Item>,
    by_id: HashMap<String, usize>,
}

impl ItemCatalog {
    /// 重复 id 以第一条为准；堆叠上限 0 视为 1
    pub fn from_definitions(defs: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut catalog = Self::default();
        for mut def in defs {
            if catalog.by_id.contains_key(&def.id) {
                warn!("物品表中存在重复 ID: {}，已忽略", def.id);
                continue;
            }
            if def.max_stack_size == 0 {
                warn!("物品 {} 的堆叠上限为 0，按 1 处理", def.id);
                def.max_stack_size = 1;
            }
            catalog.by_id.insert(def.id.clone(), catalog.items.len());
            catalog.items.push(Item::new(def));
        }
        catalog
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.by_id.get(id).map(|&i| &self.items[i])
    }

    /// 用 id / 名称 / uuid 查询（调试命令用）
    pub fn find(&self, token: &str) -> Option<&Item> {
        if let Some(item) = self.get(token) {
            return Some(item);
        }
        let token = token.to_lowercase();
        self.items.iter().find(|item| {
            item.id.eq_ignore_ascii_case(&token)
                || item.name.eq_ignore_ascii_case(&token)
                || uuid_from_id(&item.id).to_string() == token
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn uuid_from_id(id: &str) -> Uuid {
    // 固定 namespace + id 生成 v5 UUID，同一 id 永远得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}
