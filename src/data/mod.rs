pub mod catalog;
pub mod loader;
pub mod schema;

use bevy::asset::LoadState;
use bevy::prelude::*;
use catalog::ItemCatalog;
use schema::ItemList;
use crate::core::states::AppState;

/// 物品表资源路径（相对 assets/）
pub const ITEM_TABLE_PATH: &str = "data/items.ron";

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemList>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_asset::<ItemList>()
            .register_asset_loader(loader::RonItemLoader)
            .init_resource::<ItemAssets>()
            .init_resource::<ItemCatalog>()
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
) {
    let handle: Handle<ItemList> = asset_server.load(ITEM_TABLE_PATH);
    item_assets.handle = Some(handle);
}

/// 物品表就绪后构建目录并进入游戏
fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    item_assets: Res<ItemAssets>,
    asset_server: Res<AssetServer>,
    mut lists: ResMut<Assets<ItemList>>,
) {
    let Some(h) = &item_assets.handle else {
        return;
    };
    if let Some(list) = lists.remove(h) {
        let catalog = ItemCatalog::from_definitions(list.items);
        info!("✔ Items loaded: {}", catalog.len());
        commands.insert_resource(catalog);
        next.set(AppState::InGame);
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(h) {
        // 物品表坏了也照样进游戏，只是目录为空
        error!("物品表加载失败: {err}");
        commands.insert_resource(ItemCatalog::default());
        next.set(AppState::InGame);
    }
}
