pub mod components;
pub mod controller;
mod systems;

use crate::core::states::AppState;
use crate::dialog::DialogSystems;
use bevy::prelude::*;
use components::*;
use systems::*;

/// 背包界面：格子网格、拖拽、悬停描述与双击使用
pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DescriptionLine>()
            .init_resource::<SlotControllers>()
            .init_resource::<InventoryRedraw>()
            .init_resource::<DragRelay>()
            .add_systems(Startup, spawn_camera)
            .add_systems(OnEnter(AppState::InGame), build_inventory_ui)
            .add_systems(OnExit(AppState::InGame), teardown_inventory_ui)
            .add_systems(
                Update,
                (
                    (handle_toolbar, resolve_drag_release).before(DialogSystems),
                    (apply_prompt_results, use_items)
                        .chain()
                        .after(DialogSystems),
                    (refresh_slot_views, sync_description_text)
                        .after(apply_prompt_results)
                        .after(use_items),
                )
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
