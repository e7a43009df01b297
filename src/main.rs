use bevy::prelude::*;

mod core;
mod data;
mod dialog;
mod interface;
mod inventory;
mod save;
mod sound;
mod ui;

use core::CorePlugin;
use interface::debug_cli::DebugCliPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Inventory".into(),
                resolution: (720.0, 560.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(CorePlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(inventory::InventoryPlugin)
        .add_plugins(sound::SoundPlugin)
        .add_plugins(dialog::DialogPlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(DebugCliPlugin)
        .run();
}
