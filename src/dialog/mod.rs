pub mod components;
pub(crate) mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use components::*;
use systems::*;

/// 确认框相关系统所在的集合，便于其它插件排序
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DialogSystems;

/// 模态确认框：其它模块通过 `PromptService` 请求，结果以 `PromptResolved` 返回
pub struct DialogPlugin;
impl Plugin for DialogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfirmationDialog>()
            .add_event::<PromptResolved>()
            .add_systems(OnEnter(AppState::InGame), spawn_dialog)
            .add_systems(OnExit(AppState::InGame), despawn_dialog)
            .add_systems(
                Update,
                (handle_dialog_input, flush_dialog_events, sync_dialog_view)
                    .chain()
                    .in_set(DialogSystems)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resources::GameConfig;
    use crate::sound::components::CueQueue;
    use bevy::state::app::StatesPlugin;

    fn backdrops(app: &mut App) -> usize {
        let world = app.world_mut();
        world
            .query_filtered::<Entity, With<DialogBackdrop>>()
            .iter(world)
            .count()
    }

    fn go_to(app: &mut App, state: AppState) {
        app.world_mut().resource_mut::<NextState<AppState>>().set(state);
        app.update();
    }

    #[test]
    fn reentering_the_game_keeps_a_single_dialog() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<CueQueue>()
            .insert_resource(GameConfig::default())
            .add_plugins(DialogPlugin);

        go_to(&mut app, AppState::InGame);
        assert_eq!(backdrops(&mut app), 1);

        app.world_mut()
            .resource_mut::<ConfirmationDialog>()
            .show(Prompt {
                title: "t".into(),
                message: "m".into(),
                on_confirm: PromptAction::DropSlot { slot_index: 0 },
                on_cancel: PromptAction::RestoreSlot { slot_index: 0 },
            });
        go_to(&mut app, AppState::Loading);
        assert_eq!(backdrops(&mut app), 0);
        assert!(!app.world().resource::<ConfirmationDialog>().is_open());

        go_to(&mut app, AppState::InGame);
        assert_eq!(backdrops(&mut app), 1);
    }
}
