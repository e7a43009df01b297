use super::store::{LoadReport, SaveStore};
use super::{DeleteSaveEvent, InventorySave, LoadInventoryEvent, SaveInventoryEvent};
use crate::core::events::LogEvent;
use crate::core::resources::GameConfig;
use crate::data::catalog::ItemCatalog;
use crate::inventory::components::Inventory;
use bevy::prelude::*;
use bevy::window::AppLifecycle;

pub fn resolve_save_store(mut commands: Commands, config: Res<GameConfig>) {
    match SaveStore::in_data_dir(&config.save) {
        Ok(store) => {
            info!("存档路径: {}", store.path().display());
            commands.insert_resource(InventorySave(Some(store)));
        }
        Err(e) => error!("无法确定存档目录，本次不会存档: {e:#}"),
    }
}

fn write_save(save: &InventorySave, inventory: &Inventory) -> Option<String> {
    let store = save.0.as_ref()?;
    Some(match store.save(inventory) {
        Ok(()) => format!("已存档到 {}", store.path().display()),
        Err(e) => {
            error!("存档失败: {e}");
            format!("存档失败: {e}")
        }
    })
}

fn read_save(save: &InventorySave, inventory: &mut Inventory, catalog: &ItemCatalog) -> Option<String> {
    let store = save.0.as_ref()?;
    Some(match store.load(inventory, catalog) {
        Ok(LoadReport::Missing) => "没有找到存档".to_string(),
        Ok(LoadReport::Loaded { restored, skipped }) if skipped.is_empty() => {
            format!("读档完成：恢复 {restored} 格")
        }
        Ok(LoadReport::Loaded { restored, skipped }) => {
            format!("读档完成：恢复 {restored} 格，跳过未知物品 {}", skipped.join(", "))
        }
        Err(e) => {
            error!("读档失败，背包保持不变: {e}");
            format!("读档失败: {e}")
        }
    })
}

pub fn load_on_enter(
    save: Res<InventorySave>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<ItemCatalog>,
) {
    if let Some(message) = read_save(&save, &mut inventory, &catalog) {
        info!("{message}");
    }
}

pub fn handle_save_commands(
    mut ev_save: EventReader<SaveInventoryEvent>,
    mut ev_load: EventReader<LoadInventoryEvent>,
    mut ev_delete: EventReader<DeleteSaveEvent>,
    save: Res<InventorySave>,
    mut inventory: ResMut<Inventory>,
    catalog: Res<ItemCatalog>,
    mut log: EventWriter<LogEvent>,
) {
    let no_store = || LogEvent("存档目录不可用".to_string());

    for _ in ev_save.read() {
        log.write(write_save(&save, &inventory).map_or_else(no_store, LogEvent));
    }

    for _ in ev_load.read() {
        log.write(read_save(&save, &mut inventory, &catalog).map_or_else(no_store, LogEvent));
    }

    for _ in ev_delete.read() {
        let Some(store) = save.0.as_ref() else {
            log.write(no_store());
            continue;
        };
        let message = match store.delete() {
            Ok(true) => "存档已删除".to_string(),
            Ok(false) => "没有存档可删除".to_string(),
            Err(e) => format!("删除存档失败: {e}"),
        };
        log.write(LogEvent(message));
    }
}

pub fn save_on_suspend(
    mut lifecycle: EventReader<AppLifecycle>,
    save: Res<InventorySave>,
    inventory: Res<Inventory>,
) {
    if lifecycle.read().any(|ev| *ev == AppLifecycle::WillSuspend) {
        if let Some(message) = write_save(&save, &inventory) {
            info!("{message}");
        }
    }
}

pub fn save_on_exit(
    mut exits: EventReader<AppExit>,
    save: Res<InventorySave>,
    inventory: Res<Inventory>,
) {
    if exits.is_empty() {
        return;
    }
    exits.clear();
    if let Some(message) = write_save(&save, &inventory) {
        info!("{message}");
    }
}
