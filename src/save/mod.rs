pub mod record;
pub mod store;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use systems::*;

/// 存档文件位置；数据目录解析失败时为 None，存读档都会跳过
#[derive(Resource, Debug, Default)]
pub struct InventorySave(pub Option<store::SaveStore>);

#[derive(Event)]
pub struct SaveInventoryEvent;

#[derive(Event)]
pub struct LoadInventoryEvent;

#[derive(Event)]
pub struct DeleteSaveEvent;

/// 进入游戏时读档，退出或挂起时存档
pub struct SavePlugin;
impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InventorySave>()
            .add_event::<SaveInventoryEvent>()
            .add_event::<LoadInventoryEvent>()
            .add_event::<DeleteSaveEvent>()
            .add_systems(Startup, resolve_save_store)
            .add_systems(OnEnter(AppState::InGame), load_on_enter)
            .add_systems(
                Update,
                (handle_save_commands, save_on_suspend).run_if(in_state(AppState::InGame)),
            )
            // 读档前就退出不能写盘，否则会用空背包覆盖存档
            .add_systems(Last, save_on_exit.run_if(in_state(AppState::InGame)));
    }
}
