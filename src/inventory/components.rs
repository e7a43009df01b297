use bevy::prelude::*;
use std::fmt;
use thiserror::Error;

use super::slot::InventorySlot;
use crate::data::schema::Item;

/// 背包变化回调：参数是变化后的背包
pub type InventoryListener = Box<dyn Fn(&Inventory) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddItemError {
    /// 已放入的部分不会回滚
    #[error("inventory has no room for {remaining} more {item} ({placed} placed)")]
    NoRoom {
        item: String,
        placed: u32,
        remaining: u32,
    },
}

/// 玩家背包（挂在 Resource）：width × height 个固定格子
#[derive(Resource)]
pub struct Inventory {
    width: usize,
    height: usize,
    slots: Vec<InventorySlot>,
    listeners: Vec<(ListenerId, InventoryListener)>,
    next_listener: u64,
}

impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slots", &self.slots)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Inventory {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slots: vec![InventorySlot::default(); width * height],
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get_slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    /// 某种物品在所有格子里的总数
    pub fn total_quantity(&self, id: &str) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.item().is_some_and(|item| item.id == id))
            .map(InventorySlot::quantity)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(InventorySlot::is_empty)
    }

    // --------------------------- 监听 ---------------------------

    pub fn subscribe(&mut self, listener: impl Fn(&Inventory) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(self);
        }
    }

    // --------------------------- 修改 ---------------------------

    /// 尽力放入：先补满已有同类堆叠，再按顺序占用空格子。
    ///
    /// 空间不够时返回 `NoRoom`，但途中已经放进去的数量保留在背包里，
    /// 调用方需要重新读取背包状态。失败时不发通知。
    pub fn add_item(&mut self, item: &Item, count: u32) -> Result<(), AddItemError> {
        if count == 0 {
            return Ok(());
        }

        let max_stack = item.max_stack();
        let mut remaining = count;

        if item.stackable {
            for slot in self.slots.iter_mut() {
                if remaining == 0 {
                    break;
                }
                if slot.item() == Some(item) && slot.quantity() < max_stack {
                    let amount = (max_stack - slot.quantity()).min(remaining);
                    slot.add(amount);
                    remaining -= amount;
                }
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                let amount = remaining.min(max_stack);
                *slot = InventorySlot::new(item.clone(), amount);
                remaining -= amount;
            }
        }

        if remaining == 0 {
            self.notify();
            return Ok(());
        }

        warn!("背包空间不足，{} 还剩 {} 个放不下", item.name, remaining);
        Err(AddItemError::NoRoom {
            item: item.id.clone(),
            placed: count - remaining,
            remaining,
        })
    }

    /// 越界时什么都不做
    pub fn remove_item(&mut self, index: usize, count: u32) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        slot.remove(count);
        self.notify();
    }

    /// 同种可堆叠物品合并到目标格（多余的留在原格），否则整格交换
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from == to || from >= self.slots.len() || to >= self.slots.len() {
            return;
        }

        let mergeable = match (self.slots[from].item(), self.slots[to].item()) {
            (Some(a), Some(b)) => a == b && a.stackable,
            _ => false,
        };

        if mergeable {
            let max_stack = self.slots[to].item().map_or(1, |item| item.max_stack());
            let total = self.slots[from].quantity().saturating_add(self.slots[to].quantity());
            if total <= max_stack {
                self.slots[to].set_quantity(total);
                self.slots[from].clear();
            } else {
                self.slots[to].set_quantity(max_stack);
                self.slots[from].set_quantity(total - max_stack);
            }
        } else {
            self.slots.swap(from, to);
        }

        self.notify();
    }

    pub fn clear_all_slots(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.clear();
        }
        self.notify();
    }

    /// 非空格子按 (类别, 名称) 排在前面，空格子保持原顺序排在后面
    pub fn sort_by_type_and_name(&mut self) {
        let (mut filled, empty): (Vec<_>, Vec<_>) =
            self.slots.drain(..).partition(|slot| !slot.is_empty());

        filled.sort_by(|a, b| match (a.item(), b.item()) {
            (Some(a), Some(b)) => a
                .category
                .cmp(&b.category)
                .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes())),
            _ => std::cmp::Ordering::Equal,
        });

        self.slots = filled;
        self.slots.extend(empty);

        debug!("背包已按类别和名称排序");
        self.notify();
    }

    /// 从最后一格往前找，拿掉第一个非空格子里的 1 个物品
    pub fn remove_last_item(&mut self) -> Option<usize> {
        let Some(index) = self.slots.iter().rposition(|slot| !slot.is_empty()) else {
            info!("背包里没有可移除的物品");
            return None;
        };
        if let Some(item) = self.slots[index].item() {
            debug!("移除最后一个物品: {} (格子 {index})", item.name);
        }
        self.remove_item(index, 1);
        Some(index)
    }

    /// 读档用：尽量把物品放回原来的格子，放不下时退回 add_item
    pub fn restore_slot(&mut self, index: usize, item: &Item, quantity: u32) -> Result<(), AddItemError> {
        if quantity == 0 {
            return Ok(());
        }
        let fits = quantity <= item.max_stack()
            && self.slots.get(index).is_some_and(InventorySlot::is_empty);
        if !fits {
            return self.add_item(item, quantity);
        }
        self.slots[index] = InventorySlot::new(item.clone(), quantity);
        self.notify();
        Ok(())
    }
}
