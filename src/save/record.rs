use serde::{Deserialize, Serialize};

use crate::inventory::components::Inventory;

/// 存档里的一格；空格子写成 `{"itemId":"","quantity":0}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    #[serde(rename = "itemId", default)]
    pub item_id: String,
    #[serde(default)]
    pub quantity: u32,
}

impl SlotRecord {
    pub fn is_empty(&self) -> bool {
        self.item_id.is_empty() || self.quantity == 0
    }
}

/// 整个背包的存档，格子顺序即下标
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
}

impl SaveRecord {
    pub fn capture(inventory: &Inventory) -> Self {
        let slots = inventory
            .slots()
            .iter()
            .map(|slot| match slot.item() {
                Some(item) => SlotRecord {
                    item_id: item.id.clone(),
                    quantity: slot.quantity(),
                },
                None => SlotRecord::default(),
            })
            .collect();
        Self { slots }
    }
}
