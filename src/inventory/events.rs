use bevy::prelude::*;

/// 按物品 id 往背包里塞
#[derive(Event)]
pub struct GiveItemEvent {
    pub id:    String,
    pub count: u32,
}

#[derive(Event)]
pub struct ListInventoryEvent;   // 让 CLI 请求打印背包

#[derive(Event)]
pub struct RemoveItemEvent {
    pub index: usize,
    pub count: u32,
}

#[derive(Event)]
pub struct MoveItemEvent {
    pub from: usize,
    pub to:   usize,
}

#[derive(Event)]
pub struct SortInventoryEvent;

#[derive(Event)]
pub struct RemoveLastItemEvent;

#[derive(Event)]
pub struct ClearInventoryEvent;

/// 双击（或命令行 use）使用某格物品
#[derive(Event)]
pub struct UseItemEvent {
    pub index: usize,
}

/// 武器被“使用”时只发出装备意图，背包本身不变
#[derive(Event, Debug, Clone)]
pub struct EquipRequested {
    pub index:   usize,
    pub item_id: String,
}
