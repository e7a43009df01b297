use bevy::prelude::*;

/// 游戏运行的大状态
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    /// 读取物品表
    Loading,
    /// 物品表就绪，背包 UI 与存档可用
    InGame,
}
