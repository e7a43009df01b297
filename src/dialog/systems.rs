use super::components::*;
use crate::core::resources::GameConfig;
use crate::sound::components::{CueQueue, CueService};
use bevy::prelude::*;
use bevy::ui::FocusPolicy;

const PANEL_COLOR: Color = Color::srgb(0.16, 0.16, 0.2);
const BUTTON_COLOR: Color = Color::srgb(0.28, 0.28, 0.34);
const BUTTON_HOVER_COLOR: Color = Color::srgb(0.38, 0.38, 0.46);

/// 生成隐藏的确认框
pub fn spawn_dialog(mut commands: Commands) {
    commands
        .spawn((
            DialogBackdrop,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(100),
            Visibility::Hidden,
            Interaction::default(),
            FocusPolicy::Block,
        ))
        .with_children(|backdrop| {
            backdrop
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(12.0),
                        padding: UiRect::all(Val::Px(20.0)),
                        min_width: Val::Px(320.0),
                        ..default()
                    },
                    BackgroundColor(PANEL_COLOR),
                    FocusPolicy::Block,
                ))
                .with_children(|panel| {
                    panel.spawn((
                        DialogTitle,
                        Text::new(""),
                        TextFont { font_size: 22.0, ..default() },
                    ));
                    panel.spawn((
                        DialogMessage,
                        Text::new(""),
                        TextFont { font_size: 16.0, ..default() },
                    ));
                    panel
                        .spawn(Node {
                            column_gap: Val::Px(16.0),
                            ..default()
                        })
                        .with_children(|row| {
                            for (button, label) in
                                [(DialogButton::Confirm, "OK"), (DialogButton::Cancel, "Cancel")]
                            {
                                row.spawn((
                                    button,
                                    Button,
                                    Node {
                                        padding: UiRect::axes(Val::Px(18.0), Val::Px(8.0)),
                                        ..default()
                                    },
                                    BackgroundColor(BUTTON_COLOR),
                                ))
                                .with_child(Text::new(label));
                            }
                        });
                });
        });
}

/// 离开游戏状态时拆掉确认框，挂起的请求一并丢弃
pub fn despawn_dialog(
    mut commands: Commands,
    mut dialog: ResMut<ConfirmationDialog>,
    backdrops: Query<Entity, With<DialogBackdrop>>,
) {
    *dialog = ConfirmationDialog::default();
    for entity in &backdrops {
        commands.entity(entity).despawn();
    }
}

/// 按钮点击确认/取消，点遮罩空白处等同取消
pub fn handle_dialog_input(
    mut buttons: Query<(&Interaction, &DialogButton, &mut BackgroundColor), Changed<Interaction>>,
    backdrop: Query<&Interaction, (Changed<Interaction>, With<DialogBackdrop>)>,
    mut dialog: ResMut<ConfirmationDialog>,
) {
    if !dialog.is_open() {
        return;
    }

    for (interaction, button, mut color) in &mut buttons {
        match interaction {
            Interaction::Pressed => match button {
                DialogButton::Confirm => dialog.confirm(),
                DialogButton::Cancel => dialog.cancel(),
            },
            Interaction::Hovered => color.0 = BUTTON_HOVER_COLOR,
            Interaction::None => color.0 = BUTTON_COLOR,
        }
    }

    if backdrop.iter().any(|i| *i == Interaction::Pressed) {
        dialog.cancel();
    }
}

/// 对话框状态变化后刷新显示
pub fn sync_dialog_view(
    dialog: Res<ConfirmationDialog>,
    mut backdrop: Query<&mut Visibility, With<DialogBackdrop>>,
    mut title: Query<&mut Text, (With<DialogTitle>, Without<DialogMessage>)>,
    mut message: Query<&mut Text, (With<DialogMessage>, Without<DialogTitle>)>,
) {
    if !dialog.is_changed() {
        return;
    }

    let visibility = if dialog.is_open() { Visibility::Inherited } else { Visibility::Hidden };
    for mut v in &mut backdrop {
        *v = visibility;
    }

    if let Some(prompt) = dialog.current() {
        for mut text in &mut title {
            text.0 = prompt.title.clone();
        }
        for mut text in &mut message {
            text.0 = prompt.message.clone();
        }
    }
}

/// 播放对话框音效并广播最终动作
pub fn flush_dialog_events(
    mut dialog: ResMut<ConfirmationDialog>,
    mut cues: ResMut<CueQueue>,
    mut resolved: EventWriter<PromptResolved>,
    config: Res<GameConfig>,
) {
    // 只读访问不触发 change detection
    if !dialog.bypass_change_detection().has_events() {
        return;
    }

    for event in dialog.drain_events() {
        match event {
            DialogEvent::Opened => {
                cues.play(&config.sound.dialog_open);
            }
            DialogEvent::Confirmed(action) => {
                info!("确认框：确认");
                cues.play(&config.sound.dialog_confirm);
                resolved.write(PromptResolved(action));
            }
            DialogEvent::Cancelled(action) => {
                info!("确认框：取消");
                cues.play(&config.sound.dialog_cancel);
                resolved.write(PromptResolved(action));
            }
            DialogEvent::Superseded(action) => {
                resolved.write(PromptResolved(action));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_event::<PromptResolved>()
            .init_resource::<ConfirmationDialog>()
            .init_resource::<CueQueue>()
            .insert_resource(GameConfig::default())
            .add_systems(Update, flush_dialog_events);
        app
    }

    fn resolved(app: &mut App) -> Vec<PromptResolved> {
        let events = app.world().resource::<Events<PromptResolved>>();
        events.get_cursor().read(events).copied().collect()
    }

    #[test]
    fn confirm_plays_cues_and_emits_the_confirm_action() {
        let mut app = app();
        {
            let mut dialog = app.world_mut().resource_mut::<ConfirmationDialog>();
            dialog.show(Prompt {
                title: "丢弃物品".into(),
                message: "确定？".into(),
                on_confirm: PromptAction::DropSlot { slot_index: 4 },
                on_cancel: PromptAction::RestoreSlot { slot_index: 4 },
            });
            dialog.confirm();
        }
        app.update();

        assert_eq!(resolved(&mut app), vec![PromptResolved(PromptAction::DropSlot { slot_index: 4 })]);
        let names: Vec<_> = app
            .world()
            .resource::<CueQueue>()
            .pending()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["OpenWindow".to_string(), "Crushed".to_string()]);
    }
}
