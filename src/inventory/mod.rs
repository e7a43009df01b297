pub mod components;
pub mod events;
pub mod slot;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<GiveItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<RemoveItemEvent>()
            .add_event::<MoveItemEvent>()
            .add_event::<SortInventoryEvent>()
            .add_event::<RemoveLastItemEvent>()
            .add_event::<ClearInventoryEvent>()
            .add_event::<UseItemEvent>()
            .add_event::<EquipRequested>()
            .add_systems(Startup, setup_inventory)
            .add_systems(
                Update,
                (
                    give_item,
                    remove_item,
                    move_item,
                    sort_inventory,
                    remove_last_item,
                    clear_inventory,
                    print_inventory,
                    log_equip_requests,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
