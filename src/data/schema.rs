use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::Deserialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// 物品大类，排序时按声明顺序：Weapon < Potion < Quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Potion,
    Quest,
}

/// 静态物品表条目，加载后只读
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDefinition {
    pub id:   String,
    pub name: String,
    #[serde(default)] pub description: String,
    /// 图标资源路径
    #[serde(default)] pub icon: String,
    pub category: ItemCategory,
    #[serde(default = "default_stackable")] pub stackable: bool,
    #[serde(default = "default_max_stack")] pub max_stack_size: u32,
    #[serde(default)] pub consumable: bool,
}

fn default_stackable() -> bool {
    true
}

fn default_max_stack() -> u32 {
    1
}

impl ItemDefinition {
    /// 实际堆叠上限：不可堆叠恒为 1，且至少为 1
    pub fn max_stack(&self) -> u32 {
        if self.stackable {
            self.max_stack_size.max(1)
        } else {
            1
        }
    }
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemDefinition>,
}

/// 共享的物品句柄。所有格子引用同一份定义，相等性只比较 id
#[derive(Clone)]
pub struct Item(Arc<ItemDefinition>);

impl Item {
    pub fn new(def: ItemDefinition) -> Self {
        Self(Arc::new(def))
    }

    pub fn definition(&self) -> &ItemDefinition {
        &self.0
    }
}

impl Deref for Item {
    type Target = ItemDefinition;

    fn deref(&self) -> &ItemDefinition {
        &self.0
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.id == other.0.id
    }
}

impl Eq for Item {}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item({})", self.0.id)
    }
}

#[cfg(test)]
pub(crate) fn test_item(id: &str, category: ItemCategory, max_stack_size: u32) -> Item {
    Item::new(ItemDefinition {
        id: id.into(),
        name: id.into(),
        description: format!("{id} description"),
        icon: String::new(),
        category,
        stackable: max_stack_size > 1,
        max_stack_size,
        consumable: category == ItemCategory::Potion,
    })
}
