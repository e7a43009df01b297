use super::{components::*, controller::*};
use crate::core::events::LogEvent;
use crate::core::resources::GameConfig;
use crate::data::schema::ItemCategory;
use crate::dialog::components::{ConfirmationDialog, PromptAction, PromptResolved};
use crate::inventory::components::Inventory;
use crate::inventory::events::{
    EquipRequested, RemoveLastItemEvent, SortInventoryEvent, UseItemEvent,
};
use crate::sound::components::{CueQueue, StopCues};
use bevy::picking::events::{Click, Drag, DragDrop, DragEnd, DragStart, Out, Over, Pointer};
use bevy::picking::pointer::PointerButton;
use bevy::color::Alpha;
use bevy::picking::Pickable;
use bevy::prelude::*;

const SLOT_SIZE: f32 = 64.0;
const ICON_SIZE: f32 = 48.0;
const SLOT_GAP: f32 = 6.0;
const DIMMED_ALPHA: f32 = 0.3;

const SLOT_COLOR: Color = Color::srgb(0.2, 0.2, 0.24);
const TRASH_COLOR: Color = Color::srgb(0.45, 0.14, 0.14);
const BUTTON_COLOR: Color = Color::srgb(0.28, 0.28, 0.34);

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// 没有图标资源时按类别给个色块
fn category_color(category: ItemCategory) -> Color {
    match category {
        ItemCategory::Weapon => Color::srgb(0.7, 0.7, 0.75),
        ItemCategory::Potion => Color::srgb(0.8, 0.25, 0.3),
        ItemCategory::Quest => Color::srgb(0.85, 0.7, 0.25),
    }
}

// --------------------------- 构建 / 拆除 ---------------------------

/// 按背包尺寸生成格子网格、工具栏、垃圾桶和拖拽图标
pub fn build_inventory_ui(
    mut commands: Commands,
    mut inventory: ResMut<Inventory>,
    mut redraw: ResMut<InventoryRedraw>,
    config: Res<GameConfig>,
) {
    let slot_count = inventory.slot_count();
    let controllers = (0..slot_count)
        .map(|i| SlotController::new(i).with_hover_volume(config.sound.hover_volume))
        .collect();
    commands.insert_resource(SlotControllers(controllers));
    commands.insert_resource(DragRelay::default());

    let flag = redraw.flag();
    redraw.listener = Some(inventory.subscribe(move |_| {
        flag.store(true, std::sync::atomic::Ordering::Release);
    }));
    redraw.mark();

    let columns = inventory.width().max(1) as u16;

    commands
        .spawn((
            InventoryRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|root| {
            root.spawn((
                DescriptionText,
                Text::new(""),
                TextFont { font_size: 16.0, ..default() },
                Node { min_height: Val::Px(24.0), ..default() },
            ));

            root.spawn(Node {
                display: Display::Grid,
                grid_template_columns: RepeatedGridTrack::px(columns, SLOT_SIZE),
                column_gap: Val::Px(SLOT_GAP),
                row_gap: Val::Px(SLOT_GAP),
                ..default()
            })
            .with_children(|grid| {
                for index in 0..slot_count {
                    grid.spawn((
                        SlotView { index },
                        Node {
                            width: Val::Px(SLOT_SIZE),
                            height: Val::Px(SLOT_SIZE),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(SLOT_COLOR),
                    ))
                    .with_children(|slot| {
                        slot.spawn((
                            SlotIcon { index },
                            ImageNode::default(),
                            Node {
                                width: Val::Px(ICON_SIZE),
                                height: Val::Px(ICON_SIZE),
                                ..default()
                            },
                            Pickable::IGNORE,
                        ));
                        slot.spawn((
                            SlotQuantity { index },
                            Text::new(""),
                            TextFont { font_size: 14.0, ..default() },
                            Node {
                                position_type: PositionType::Absolute,
                                right: Val::Px(4.0),
                                bottom: Val::Px(2.0),
                                ..default()
                            },
                            Pickable::IGNORE,
                        ));
                    })
                    .observe(on_slot_drag_start)
                    .observe(on_slot_drag)
                    .observe(on_slot_drag_end)
                    .observe(on_slot_drop)
                    .observe(on_slot_click)
                    .observe(on_slot_over)
                    .observe(on_slot_out);
                }
            });

            root.spawn(Node {
                column_gap: Val::Px(12.0),
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|row| {
                for (button, label) in [(ToolbarButton::Sort, "Sort"), (ToolbarButton::RemoveLast, "Drop last")] {
                    row.spawn((
                        button,
                        Button,
                        Node {
                            padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                            ..default()
                        },
                        BackgroundColor(BUTTON_COLOR),
                    ))
                    .with_child(Text::new(label));
                }

                row.spawn((
                    TrashArea,
                    Node {
                        width: Val::Px(SLOT_SIZE),
                        height: Val::Px(SLOT_SIZE),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(TRASH_COLOR),
                ))
                .with_child((Text::new("Trash"), Pickable::IGNORE))
                .observe(on_trash_drop);
            });
        });

    commands.spawn((
        DragIcon,
        ImageNode::default(),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Px(ICON_SIZE),
            height: Val::Px(ICON_SIZE),
            ..default()
        },
        GlobalZIndex(50),
        Visibility::Hidden,
        Pickable::IGNORE,
    ));
}

pub fn teardown_inventory_ui(
    mut commands: Commands,
    mut inventory: ResMut<Inventory>,
    mut redraw: ResMut<InventoryRedraw>,
    mut ev_stop: EventWriter<StopCues>,
    roots: Query<Entity, Or<(With<InventoryRoot>, With<DragIcon>)>>,
) {
    if let Some(id) = redraw.listener.take() {
        inventory.unsubscribe(id);
    }
    for entity in &roots {
        commands.entity(entity).despawn();
    }
    commands.insert_resource(SlotControllers::default());
    ev_stop.write(StopCues);
}

// --------------------------- 指针观察者 ---------------------------

fn on_slot_drag_start(
    trigger: Trigger<Pointer<DragStart>>,
    slots: Query<&SlotView>,
    dialog: Res<ConfirmationDialog>,
    mut controllers: ResMut<SlotControllers>,
    mut relay: ResMut<DragRelay>,
    mut icons: Query<(&SlotIcon, &mut ImageNode)>,
    mut ghost: Query<(&mut Node, &mut Visibility, &mut ImageNode), (With<DragIcon>, Without<SlotIcon>)>,
) {
    let event = trigger.event();
    if event.button != PointerButton::Primary || dialog.is_open() {
        return;
    }
    let Ok(view) = slots.get(trigger.target()) else {
        return;
    };
    let position = event.pointer_location.position;
    let Some(controller) = controllers.get_mut(view.index) else {
        return;
    };
    if !controller.begin_drag(position) {
        return;
    }

    relay.reset();
    relay.source = Some(view.index);

    let mut dragged = None;
    for (icon, mut image) in &mut icons {
        if icon.index == view.index {
            dragged = Some((image.image.clone(), image.color));
            image.color = image.color.with_alpha(DIMMED_ALPHA);
        }
    }

    if let Ok((mut node, mut visibility, mut image)) = ghost.single_mut() {
        if let Some((handle, color)) = dragged {
            image.image = handle;
            image.color = color;
        }
        node.left = Val::Px(position.x - ICON_SIZE / 2.0);
        node.top = Val::Px(position.y - ICON_SIZE / 2.0);
        *visibility = Visibility::Inherited;
    }
}

fn on_slot_drag(
    trigger: Trigger<Pointer<Drag>>,
    relay: Res<DragRelay>,
    mut ghost: Query<&mut Node, With<DragIcon>>,
) {
    if relay.source.is_none() {
        return;
    }
    let position = trigger.event().pointer_location.position;
    if let Ok(mut node) = ghost.single_mut() {
        node.left = Val::Px(position.x - ICON_SIZE / 2.0);
        node.top = Val::Px(position.y - ICON_SIZE / 2.0);
    }
}

fn on_slot_drag_end(
    trigger: Trigger<Pointer<DragEnd>>,
    slots: Query<&SlotView>,
    mut relay: ResMut<DragRelay>,
) {
    let Ok(view) = slots.get(trigger.target()) else {
        return;
    };
    if relay.source == Some(view.index) {
        relay.ended = true;
    }
}

fn on_slot_drop(
    trigger: Trigger<Pointer<DragDrop>>,
    slots: Query<&SlotView>,
    mut relay: ResMut<DragRelay>,
) {
    if relay.source.is_none() {
        return;
    }
    if let Ok(view) = slots.get(trigger.target()) {
        relay.target = Some(DropTarget::Slot(view.index));
    }
}

fn on_trash_drop(_trigger: Trigger<Pointer<DragDrop>>, mut relay: ResMut<DragRelay>) {
    if relay.source.is_some() {
        relay.target = Some(DropTarget::Trash);
    }
}

fn on_slot_click(
    trigger: Trigger<Pointer<Click>>,
    slots: Query<&SlotView>,
    time: Res<Time>,
    config: Res<GameConfig>,
    dialog: Res<ConfirmationDialog>,
    mut controllers: ResMut<SlotControllers>,
    mut ev_use: EventWriter<UseItemEvent>,
) {
    if trigger.event().button != PointerButton::Primary || dialog.is_open() {
        return;
    }
    let Ok(view) = slots.get(trigger.target()) else {
        return;
    };
    let Some(controller) = controllers.get_mut(view.index) else {
        return;
    };
    if controller.click(time.elapsed_secs_f64(), config.inventory.double_click_secs) {
        ev_use.write(UseItemEvent { index: view.index });
    }
}

fn on_slot_over(
    trigger: Trigger<Pointer<Over>>,
    slots: Query<&SlotView>,
    controllers: Res<SlotControllers>,
    mut cues: ResMut<CueQueue>,
    mut line: ResMut<DescriptionLine>,
) {
    let Ok(view) = slots.get(trigger.target()) else {
        return;
    };
    if let Some(controller) = controllers.0.get(view.index) {
        controller.hover_enter(&mut *cues, &mut line);
    }
}

fn on_slot_out(
    trigger: Trigger<Pointer<Out>>,
    slots: Query<&SlotView>,
    controllers: Res<SlotControllers>,
    mut line: ResMut<DescriptionLine>,
) {
    let Ok(view) = slots.get(trigger.target()) else {
        return;
    };
    if let Some(controller) = controllers.0.get(view.index) {
        controller.hover_exit(&mut line);
    }
}

// --------------------------- 每帧系统 ---------------------------

/// 松开指针后把收集到的落点交给对应格子的状态机
pub fn resolve_drag_release(
    mut relay: ResMut<DragRelay>,
    mut controllers: ResMut<SlotControllers>,
    mut inventory: ResMut<Inventory>,
    mut dialog: ResMut<ConfirmationDialog>,
    redraw: Res<InventoryRedraw>,
    mut ghost: Query<&mut Visibility, With<DragIcon>>,
) {
    if !relay.ended {
        return;
    }
    let target = relay.target.unwrap_or(DropTarget::Elsewhere);
    let source = relay.source;
    relay.reset();

    if let Ok(mut visibility) = ghost.single_mut() {
        *visibility = Visibility::Hidden;
    }

    let Some(controller) = source.and_then(|i| controllers.get_mut(i)) else {
        return;
    };
    match controller.release(target, &mut inventory, &mut *dialog) {
        DragRelease::Moved { from, to } => debug!("格子 {from} → 格子 {to}"),
        DragRelease::Restored { .. } => redraw.mark(),
        DragRelease::AwaitingConfirmation | DragRelease::NotDragging => {}
    }
}

/// 确认框的结果回到发起的格子
pub fn apply_prompt_results(
    mut ev_resolved: EventReader<PromptResolved>,
    mut controllers: ResMut<SlotControllers>,
    mut inventory: ResMut<Inventory>,
    redraw: Res<InventoryRedraw>,
    mut log: EventWriter<LogEvent>,
) {
    for PromptResolved(action) in ev_resolved.read() {
        let Some(controller) = controllers.get_mut(action.slot_index()) else {
            continue;
        };
        if let PromptAction::DropSlot { slot_index } = action {
            if let Some(item) = controller.displayed().item() {
                log.write(LogEvent(format!(
                    "丢弃 {} ×{} (格子 {slot_index})",
                    item.name,
                    controller.displayed().quantity()
                )));
            }
        }
        controller.resolve_prompt(*action, &mut inventory);
        redraw.mark();
    }
}

/// 双击或命令行的“使用”
pub fn use_items(
    mut ev_use: EventReader<UseItemEvent>,
    mut controllers: ResMut<SlotControllers>,
    mut inventory: ResMut<Inventory>,
    mut cues: ResMut<CueQueue>,
    mut ev_equip: EventWriter<EquipRequested>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_use.read() {
        let Some(controller) = controllers.get_mut(ev.index) else {
            log.write(LogEvent("背包索引超出范围".to_string()));
            continue;
        };
        controller.refresh(inventory.get_slot(ev.index));
        let name = controller
            .displayed()
            .item()
            .map(|item| item.name.clone())
            .unwrap_or_default();

        match controller.use_item(&mut inventory, &mut *cues) {
            UseOutcome::Consumed { .. } => {
                log.write(LogEvent(format!("使用 {name}")));
            }
            UseOutcome::EquipRequested { item_id } => {
                ev_equip.write(EquipRequested { index: ev.index, item_id });
            }
            UseOutcome::Empty => {
                log.write(LogEvent("该背包格为空".to_string()));
            }
            UseOutcome::Busy => {
                log.write(LogEvent("该背包格正在拖拽或等待确认".to_string()));
            }
        }
    }
}

pub fn handle_toolbar(
    buttons: Query<(&Interaction, &ToolbarButton), Changed<Interaction>>,
    dialog: Res<ConfirmationDialog>,
    mut ev_sort: EventWriter<SortInventoryEvent>,
    mut ev_pop: EventWriter<RemoveLastItemEvent>,
) {
    if dialog.is_open() {
        return;
    }
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            ToolbarButton::Sort => {
                ev_sort.write(SortInventoryEvent);
            }
            ToolbarButton::RemoveLast => {
                ev_pop.write(RemoveLastItemEvent);
            }
        }
    }
}

/// 背包变化后整体重绘所有格子
pub fn refresh_slot_views(
    redraw: Res<InventoryRedraw>,
    inventory: Res<Inventory>,
    mut controllers: ResMut<SlotControllers>,
    asset_server: Res<AssetServer>,
    mut icons: Query<(&SlotIcon, &mut ImageNode)>,
    mut quantities: Query<(&SlotQuantity, &mut Text)>,
) {
    if !redraw.take() {
        return;
    }

    for controller in controllers.0.iter_mut() {
        let index = controller.index();
        controller.refresh(inventory.get_slot(index));
    }

    for (icon, mut image) in &mut icons {
        let Some(controller) = controllers.0.get(icon.index) else {
            continue;
        };
        let alpha = if controller.is_dragging() { DIMMED_ALPHA } else { 1.0 };
        match controller.displayed().item() {
            Some(item) if !item.icon.is_empty() => {
                image.image = asset_server.load(item.icon.clone());
                image.color = Color::WHITE.with_alpha(alpha);
            }
            Some(item) => {
                image.image = Handle::default();
                image.color = category_color(item.category).with_alpha(alpha);
            }
            None => {
                image.image = Handle::default();
                image.color = Color::NONE;
            }
        }
    }

    for (label, mut text) in &mut quantities {
        let quantity = controllers
            .0
            .get(label.index)
            .map_or(0, |c| c.displayed().quantity());
        text.0 = if quantity > 1 { quantity.to_string() } else { String::new() };
    }
}

pub fn sync_description_text(
    line: Res<DescriptionLine>,
    mut texts: Query<&mut Text, With<DescriptionText>>,
) {
    if !line.is_changed() {
        return;
    }
    for mut text in &mut texts {
        text.0 = line.text().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::test_item;
    use crate::dialog::systems::flush_dialog_events;

    fn app() -> App {
        let mut inventory = Inventory::new(3, 1);
        inventory
            .restore_slot(0, &test_item("potion", ItemCategory::Potion, 10), 4)
            .unwrap();
        inventory
            .restore_slot(1, &test_item("sword", ItemCategory::Weapon, 1), 1)
            .unwrap();

        let controllers = (0..inventory.slot_count())
            .map(|i| {
                let mut c = SlotController::new(i);
                c.refresh(inventory.get_slot(i));
                c
            })
            .collect();

        let mut app = App::new();
        app.add_event::<PromptResolved>()
            .add_event::<UseItemEvent>()
            .add_event::<EquipRequested>()
            .add_event::<LogEvent>()
            .init_resource::<ConfirmationDialog>()
            .init_resource::<CueQueue>()
            .init_resource::<InventoryRedraw>()
            .init_resource::<DragRelay>()
            .insert_resource(GameConfig::default())
            .insert_resource(inventory)
            .insert_resource(SlotControllers(controllers))
            .add_systems(
                Update,
                (resolve_drag_release, flush_dialog_events, apply_prompt_results, use_items).chain(),
            );
        app
    }

    /// 模拟把某格拖到垃圾桶上松手
    fn drop_on_trash(app: &mut App, index: usize) {
        let world = app.world_mut();
        assert!(world
            .resource_mut::<SlotControllers>()
            .get_mut(index)
            .unwrap()
            .begin_drag(Vec2::ZERO));
        let mut relay = world.resource_mut::<DragRelay>();
        relay.source = Some(index);
        relay.target = Some(DropTarget::Trash);
        relay.ended = true;
    }

    fn phase(app: &App, index: usize) -> DragPhase {
        app.world().resource::<SlotControllers>().0[index].phase()
    }

    fn cue_names(app: &App) -> Vec<String> {
        app.world()
            .resource::<CueQueue>()
            .pending()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn confirmed_trash_drop_empties_the_slot() {
        let mut app = app();
        drop_on_trash(&mut app, 0);
        app.update();

        assert!(app.world().resource::<ConfirmationDialog>().is_open());
        assert!(matches!(phase(&app, 0), DragPhase::AwaitingConfirmation { .. }));
        assert_eq!(app.world().resource::<Inventory>().total_quantity("potion"), 4);
        assert!(!app.world().resource::<DragRelay>().ended);

        app.world().resource::<InventoryRedraw>().take();
        app.world_mut().resource_mut::<ConfirmationDialog>().confirm();
        app.update();

        assert!(app.world().resource::<Inventory>().get_slot(0).unwrap().is_empty());
        assert_eq!(phase(&app, 0), DragPhase::Idle);
        assert!(app.world().resource::<InventoryRedraw>().take());
        assert!(!app.world().resource::<ConfirmationDialog>().is_open());
        assert_eq!(cue_names(&app), vec!["OpenWindow".to_string(), "Crushed".to_string()]);
    }

    #[test]
    fn cancelled_trash_drop_keeps_the_stack() {
        let mut app = app();
        drop_on_trash(&mut app, 0);
        app.update();

        app.world().resource::<InventoryRedraw>().take();
        app.world_mut().resource_mut::<ConfirmationDialog>().cancel();
        app.update();

        assert_eq!(app.world().resource::<Inventory>().get_slot(0).unwrap().quantity(), 4);
        assert_eq!(phase(&app, 0), DragPhase::Idle);
        assert!(app.world().resource::<InventoryRedraw>().take());
        assert_eq!(cue_names(&app), vec!["OpenWindow".to_string(), "OpenWindow".to_string()]);
    }

    #[test]
    fn using_a_weapon_emits_an_equip_request() {
        let mut app = app();
        app.world_mut().send_event(UseItemEvent { index: 1 });
        app.update();

        let events = app.world().resource::<Events<EquipRequested>>();
        let requests: Vec<_> = events.get_cursor().read(events).cloned().collect();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].index, 1);
        assert_eq!(requests[0].item_id, "sword");
        assert_eq!(app.world().resource::<Inventory>().total_quantity("sword"), 1);
    }

    #[test]
    fn using_a_potion_mid_drag_changes_nothing() {
        let mut app = app();
        assert!(app
            .world_mut()
            .resource_mut::<SlotControllers>()
            .get_mut(0)
            .unwrap()
            .begin_drag(Vec2::ZERO));

        app.world_mut().send_event(UseItemEvent { index: 0 });
        app.update();

        assert_eq!(app.world().resource::<Inventory>().total_quantity("potion"), 4);
        assert!(cue_names(&app).is_empty());
    }
}
