use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::core::resources::GameConfig;
use crate::data::catalog::ItemCatalog;
use crate::ui::components::{DescriptionLine, InventoryRedraw};
use bevy::prelude::*;

/// 背包空间不足时显示在描述栏里的提示（界面字体只有拉丁字符）
pub const NO_ROOM_MESSAGE: &str = "Inventory is full";

/// 按配置创建背包
pub fn setup_inventory(mut commands: Commands, config: Res<GameConfig>) {
    let (width, height) = (config.inventory.width, config.inventory.height);
    info!("背包尺寸 {width}×{height}");
    commands.insert_resource(Inventory::new(width, height));
}

/// 处理"give"——按 id 查目录后放入背包
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<ItemCatalog>,
    mut description: Option<ResMut<DescriptionLine>>,
    redraw: Option<Res<InventoryRedraw>>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_give.read() {
        let Some(item) = catalog.find(&ev.id) else {
            warn!("不存在物品 ID {}", ev.id);
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
            continue;
        };

        match inventory.add_item(item, ev.count) {
            Ok(()) => {
                log.write(LogEvent(format!("获得 {} ×{}", item.name, ev.count)));
            }
            Err(AddItemError::NoRoom { placed, remaining, .. }) => {
                if let Some(line) = description.as_deref_mut() {
                    line.set(NO_ROOM_MESSAGE);
                }
                // 失败不发通知，但已放入的部分要重绘
                if placed > 0 {
                    if let Some(redraw) = redraw.as_deref() {
                        redraw.mark();
                    }
                }
                log.write(LogEvent(format!(
                    "背包已满：{} 放入 {placed} 个，{remaining} 个放不下",
                    item.name
                )));
            }
        }
    }
}

/// 打印背包内容
pub fn print_inventory(mut ev_list: EventReader<ListInventoryEvent>, inventory: Res<Inventory>) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut empty = true;
    for (idx, slot) in inventory.slots().iter().enumerate() {
        if let Some(item) = slot.item() {
            empty = false;
            println!(
                "[{idx}] {} ×{} (id={}, {:?})",
                item.name, slot.quantity(), item.id, item.category
            );
        }
    }

    if empty {
        println!("  (empty)");
    }
}

pub fn remove_item(
    mut ev_remove: EventReader<RemoveItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_remove.read() {
        if ev.index >= inventory.slot_count() {
            log.write(LogEvent("背包索引超出范围".to_string()));
            continue;
        }
        inventory.remove_item(ev.index, ev.count);
    }
}

pub fn move_item(mut ev_move: EventReader<MoveItemEvent>, mut inventory: ResMut<Inventory>) {
    for ev in ev_move.read() {
        debug!("移动物品：格子 {} → 格子 {}", ev.from, ev.to);
        inventory.move_item(ev.from, ev.to);
    }
}

pub fn sort_inventory(
    mut ev_sort: EventReader<SortInventoryEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_sort.is_empty() {
        return;
    }
    ev_sort.clear();
    inventory.sort_by_type_and_name();
    log.write(LogEvent("背包已按类别和名称排序".to_string()));
}

pub fn remove_last_item(
    mut ev_pop: EventReader<RemoveLastItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_pop.read() {
        match inventory.remove_last_item() {
            Some(index) => log.write(LogEvent(format!("已从格子 {index} 移除 1 个物品"))),
            None => log.write(LogEvent("背包里没有物品".to_string())),
        };
    }
}

pub fn clear_inventory(
    mut ev_clear: EventReader<ClearInventoryEvent>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_clear.is_empty() {
        return;
    }
    ev_clear.clear();
    inventory.clear_all_slots();
    log.write(LogEvent("背包已清空".to_string()));
}

/// 装备系统不在本模块里，这里只记录意图
pub fn log_equip_requests(
    mut ev_equip: EventReader<EquipRequested>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_equip.read() {
        info!("请求装备武器 {} (格子 {})", ev.item_id, ev.index);
        log.write(LogEvent(format!("装备武器：{}", ev.item_id)));
    }
}
