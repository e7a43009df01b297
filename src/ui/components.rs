use bevy::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::controller::{DropTarget, SlotController};
use crate::inventory::components::ListenerId;

/// 所有格子共享的一行描述文字
#[derive(Resource, Debug, Default)]
pub struct DescriptionLine(String);

impl DescriptionLine {
    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// 每个格子一个状态机，下标即背包格子下标
#[derive(Resource, Debug, Default)]
pub struct SlotControllers(pub Vec<SlotController>);

impl SlotControllers {
    pub fn get_mut(&mut self, index: usize) -> Option<&mut SlotController> {
        self.0.get_mut(index)
    }
}

/// 背包变化监听器置位，刷新系统复位
#[derive(Resource, Default)]
pub struct InventoryRedraw {
    dirty: Arc<AtomicBool>,
    pub(crate) listener: Option<ListenerId>,
}

impl InventoryRedraw {
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.dirty.clone()
    }

    pub fn mark(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

/// 指针松开时收集到的信息，观察者写入、`resolve_drag_release` 消费
#[derive(Resource, Debug, Default)]
pub struct DragRelay {
    pub source: Option<usize>,
    pub target: Option<DropTarget>,
    pub ended: bool,
}

impl DragRelay {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// --------------------------- UI 标记 ---------------------------

#[derive(Component)]
pub struct InventoryRoot;

#[derive(Component, Debug, Clone, Copy)]
pub struct SlotView {
    pub index: usize,
}

/// 格子里的图标，记录所属格子
#[derive(Component, Debug, Clone, Copy)]
pub struct SlotIcon {
    pub index: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct SlotQuantity {
    pub index: usize,
}

#[derive(Component)]
pub struct TrashArea;

/// 跟随指针的拖拽图标
#[derive(Component)]
pub struct DragIcon;

#[derive(Component)]
pub struct DescriptionText;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    Sort,
    RemoveLast,
}
