//! 单个背包格子的交互状态机：拖拽、丢弃确认、双击使用、悬停描述。
//!
//! 只依赖背包模型和两个注入的服务（确认框、音效），不直接碰 ECS，
//! 由 `ui::systems` 把指针事件翻译成这里的调用。

use bevy::math::Vec2;

use super::components::DescriptionLine;
use crate::data::schema::ItemCategory;
use crate::dialog::components::{Prompt, PromptAction, PromptService};
use crate::inventory::components::Inventory;
use crate::inventory::slot::InventorySlot;
use crate::sound::components::CueService;

pub const HOVER_CUE: &str = "Move";
pub const USE_POTION_CUE: &str = "UsePotionSound";
pub const USE_QUEST_CUE: &str = "UseQuestSound";
pub const DEFAULT_HOVER_VOLUME: f32 = 0.3;

/// 松开拖拽时指针下方的东西
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Slot(usize),
    Trash,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging { origin: Vec2 },
    /// 拖到垃圾桶，等待确认框结果
    AwaitingConfirmation { origin: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragRelease {
    Moved { from: usize, to: usize },
    AwaitingConfirmation,
    /// 外观回到拖拽前的位置
    Restored { origin: Vec2 },
    NotDragging,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOutcome {
    Consumed { category: ItemCategory },
    EquipRequested { item_id: String },
    /// 格子为空
    Empty,
    /// 正在拖拽或等待丢弃确认
    Busy,
}

#[derive(Debug, Clone)]
pub struct SlotController {
    index: usize,
    displayed: InventorySlot,
    phase: DragPhase,
    last_click: Option<f64>,
    hover_volume: f32,
}

impl SlotController {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            displayed: InventorySlot::default(),
            phase: DragPhase::Idle,
            last_click: None,
            hover_volume: DEFAULT_HOVER_VOLUME,
        }
    }

    pub fn with_hover_volume(mut self, volume: f32) -> Self {
        self.hover_volume = volume;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn displayed(&self) -> &InventorySlot {
        &self.displayed
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    pub fn refresh(&mut self, slot: Option<&InventorySlot>) {
        self.displayed = slot.cloned().unwrap_or_default();
    }

    fn refresh_from(&mut self, inventory: &Inventory) {
        self.refresh(inventory.get_slot(self.index));
    }

    pub fn begin_drag(&mut self, origin: Vec2) -> bool {
        if self.displayed.is_empty() || self.phase != DragPhase::Idle {
            return false;
        }
        self.phase = DragPhase::Dragging { origin };
        // 拖拽松手后的点击不能和拖拽前的点击拼成双击
        self.last_click = None;
        true
    }

    pub fn release(
        &mut self,
        target: DropTarget,
        inventory: &mut Inventory,
        prompts: &mut dyn PromptService,
    ) -> DragRelease {
        let DragPhase::Dragging { origin } = self.phase else {
            return DragRelease::NotDragging;
        };

        match target {
            DropTarget::Slot(to) if to != self.index => {
                self.phase = DragPhase::Idle;
                inventory.move_item(self.index, to);
                self.refresh_from(inventory);
                DragRelease::Moved { from: self.index, to }
            }
            DropTarget::Trash => {
                let Some(item) = self.displayed.item() else {
                    self.phase = DragPhase::Idle;
                    return DragRelease::Restored { origin };
                };
                prompts.show(Prompt {
                    title: "Discard item".into(),
                    message: format!(
                        "Discard {} x{}?",
                        item.name,
                        self.displayed.quantity()
                    ),
                    on_confirm: PromptAction::DropSlot { slot_index: self.index },
                    on_cancel: PromptAction::RestoreSlot { slot_index: self.index },
                });
                self.phase = DragPhase::AwaitingConfirmation { origin };
                DragRelease::AwaitingConfirmation
            }
            _ => {
                self.phase = DragPhase::Idle;
                DragRelease::Restored { origin }
            }
        }
    }

    /// 返回需要恢复的外观起点
    pub fn resolve_prompt(&mut self, action: PromptAction, inventory: &mut Inventory) -> Option<Vec2> {
        let origin = match self.phase {
            DragPhase::AwaitingConfirmation { origin } | DragPhase::Dragging { origin } => Some(origin),
            DragPhase::Idle => None,
        };
        self.phase = DragPhase::Idle;

        if let PromptAction::DropSlot { .. } = action {
            let quantity = inventory.get_slot(self.index).map_or(0, InventorySlot::quantity);
            if quantity > 0 {
                inventory.remove_item(self.index, quantity);
            }
            self.refresh_from(inventory);
        }
        origin
    }

    /// 记录一次左键点击，返回是否构成双击
    pub fn click(&mut self, now: f64, window: f64) -> bool {
        match self.last_click {
            Some(previous) if now - previous <= window => {
                self.last_click = None;
                true
            }
            _ => {
                self.last_click = Some(now);
                false
            }
        }
    }

    pub fn use_item(&mut self, inventory: &mut Inventory, cues: &mut dyn CueService) -> UseOutcome {
        if self.is_dragging() {
            return UseOutcome::Busy;
        }
        let Some(item) = self.displayed.item().cloned() else {
            return UseOutcome::Empty;
        };

        match item.category {
            ItemCategory::Potion => {
                cues.play(USE_POTION_CUE);
                inventory.remove_item(self.index, 1);
            }
            ItemCategory::Quest => {
                cues.play(USE_QUEST_CUE);
                inventory.remove_item(self.index, 1);
            }
            ItemCategory::Weapon => {
                return UseOutcome::EquipRequested { item_id: item.id.clone() };
            }
        }
        self.refresh_from(inventory);
        UseOutcome::Consumed { category: item.category }
    }

    pub fn hover_enter(&self, cues: &mut dyn CueService, line: &mut DescriptionLine) {
        if let Some(item) = self.displayed.item() {
            cues.play_at_volume(HOVER_CUE, self.hover_volume);
            line.set(item.description.clone());
        }
    }

    pub fn hover_exit(&self, line: &mut DescriptionLine) {
        line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{test_item, Item};
    use crate::sound::components::CueRequest;

    #[derive(Default)]
    struct RecordingPrompts(Vec<Prompt>);

    impl PromptService for RecordingPrompts {
        fn show(&mut self, prompt: Prompt) {
            self.0.push(prompt);
        }
    }

    #[derive(Default)]
    struct RecordingCues(Vec<CueRequest>);

    impl CueService for RecordingCues {
        fn play_at_volume(&mut self, name: &str, volume: f32) {
            self.0.push(CueRequest { name: name.into(), volume });
        }
    }

    fn potion() -> Item {
        test_item("potion", ItemCategory::Potion, 10)
    }

    fn setup(contents: &[(usize, Item, u32)]) -> (Inventory, Vec<SlotController>) {
        let mut inventory = Inventory::new(4, 1);
        for (index, item, quantity) in contents {
            inventory.restore_slot(*index, item, *quantity).unwrap();
        }
        let controllers = (0..inventory.slot_count())
            .map(|i| {
                let mut c = SlotController::new(i);
                c.refresh(inventory.get_slot(i));
                c
            })
            .collect();
        (inventory, controllers)
    }

    #[test]
    fn empty_slots_cannot_be_dragged() {
        let (_, mut controllers) = setup(&[]);
        assert!(!controllers[0].begin_drag(Vec2::ZERO));
        assert_eq!(controllers[0].phase(), DragPhase::Idle);
    }

    #[test]
    fn dropping_on_another_slot_moves_the_item() {
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 3), (2, potion(), 4)]);
        let mut prompts = RecordingPrompts::default();

        assert!(controllers[0].begin_drag(Vec2::new(10.0, 20.0)));
        let release = controllers[0].release(DropTarget::Slot(2), &mut inventory, &mut prompts);

        assert_eq!(release, DragRelease::Moved { from: 0, to: 2 });
        assert_eq!(inventory.get_slot(2).unwrap().quantity(), 7);
        assert!(controllers[0].displayed().is_empty());
        assert_eq!(controllers[0].phase(), DragPhase::Idle);
        assert!(prompts.0.is_empty());
    }

    #[test]
    fn dropping_elsewhere_or_on_itself_restores_the_visual() {
        let (mut inventory, mut controllers) = setup(&[(1, potion(), 2)]);
        let mut prompts = RecordingPrompts::default();
        let origin = Vec2::new(5.0, 6.0);

        controllers[1].begin_drag(origin);
        assert_eq!(
            controllers[1].release(DropTarget::Elsewhere, &mut inventory, &mut prompts),
            DragRelease::Restored { origin }
        );

        controllers[1].begin_drag(origin);
        assert_eq!(
            controllers[1].release(DropTarget::Slot(1), &mut inventory, &mut prompts),
            DragRelease::Restored { origin }
        );
        assert_eq!(inventory.get_slot(1).unwrap().quantity(), 2);
    }

    #[test]
    fn release_without_drag_does_nothing() {
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 2)]);
        let mut prompts = RecordingPrompts::default();
        assert_eq!(
            controllers[0].release(DropTarget::Trash, &mut inventory, &mut prompts),
            DragRelease::NotDragging
        );
        assert!(prompts.0.is_empty());
    }

    #[test]
    fn trash_drop_asks_for_confirmation_then_drops_everything() {
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 6)]);
        let mut prompts = RecordingPrompts::default();

        controllers[0].begin_drag(Vec2::ONE);
        assert_eq!(
            controllers[0].release(DropTarget::Trash, &mut inventory, &mut prompts),
            DragRelease::AwaitingConfirmation
        );
        assert!(controllers[0].is_dragging());

        let prompt = &prompts.0[0];
        assert!(prompt.message.contains("potion"));
        assert!(prompt.message.contains('6'));
        assert_eq!(prompt.on_confirm, PromptAction::DropSlot { slot_index: 0 });
        assert_eq!(prompt.on_cancel, PromptAction::RestoreSlot { slot_index: 0 });

        let origin = controllers[0].resolve_prompt(prompt.on_confirm, &mut inventory);
        assert_eq!(origin, Some(Vec2::ONE));
        assert!(inventory.get_slot(0).unwrap().is_empty());
        assert!(controllers[0].displayed().is_empty());
        assert_eq!(controllers[0].phase(), DragPhase::Idle);
    }

    #[test]
    fn cancelled_trash_drop_keeps_the_item() {
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 6)]);
        let mut prompts = RecordingPrompts::default();

        controllers[0].begin_drag(Vec2::ZERO);
        controllers[0].release(DropTarget::Trash, &mut inventory, &mut prompts);
        let origin = controllers[0].resolve_prompt(prompts.0[0].on_cancel, &mut inventory);

        assert_eq!(origin, Some(Vec2::ZERO));
        assert_eq!(inventory.get_slot(0).unwrap().quantity(), 6);
        assert_eq!(controllers[0].phase(), DragPhase::Idle);
    }

    #[test]
    fn double_click_window() {
        let mut controller = SlotController::new(0);
        assert!(!controller.click(1.0, 0.35));
        assert!(controller.click(1.2, 0.35));
        assert!(!controller.click(1.3, 0.35));
        assert!(!controller.click(2.0, 0.35));
    }

    #[test]
    fn using_consumables_plays_a_cue_and_removes_one() {
        let quest = test_item("letter", ItemCategory::Quest, 1);
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 2), (1, quest, 1)]);
        let mut cues = RecordingCues::default();

        assert_eq!(
            controllers[0].use_item(&mut inventory, &mut cues),
            UseOutcome::Consumed { category: ItemCategory::Potion }
        );
        assert_eq!(inventory.get_slot(0).unwrap().quantity(), 1);
        assert_eq!(controllers[0].displayed().quantity(), 1);

        assert_eq!(
            controllers[1].use_item(&mut inventory, &mut cues),
            UseOutcome::Consumed { category: ItemCategory::Quest }
        );
        assert!(inventory.get_slot(1).unwrap().is_empty());

        let names: Vec<_> = cues.0.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![USE_POTION_CUE, USE_QUEST_CUE]);
    }

    #[test]
    fn using_a_weapon_only_requests_equip() {
        let sword = test_item("sword", ItemCategory::Weapon, 1);
        let (mut inventory, mut controllers) = setup(&[(0, sword, 1)]);
        let mut cues = RecordingCues::default();

        assert_eq!(
            controllers[0].use_item(&mut inventory, &mut cues),
            UseOutcome::EquipRequested { item_id: "sword".into() }
        );
        assert_eq!(inventory.get_slot(0).unwrap().quantity(), 1);
        assert!(cues.0.is_empty());
    }

    #[test]
    fn using_an_empty_slot_is_ignored() {
        let (mut inventory, mut controllers) = setup(&[]);
        let mut cues = RecordingCues::default();
        assert_eq!(controllers[0].use_item(&mut inventory, &mut cues), UseOutcome::Empty);
    }

    #[test]
    fn using_a_slot_mid_drag_reports_busy() {
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 2)]);
        let mut cues = RecordingCues::default();
        assert!(controllers[0].begin_drag(Vec2::ZERO));

        assert_eq!(controllers[0].use_item(&mut inventory, &mut cues), UseOutcome::Busy);
        assert_eq!(inventory.get_slot(0).unwrap().quantity(), 2);
        assert!(cues.0.is_empty());
    }

    #[test]
    fn a_drag_breaks_the_double_click() {
        let (mut inventory, mut controllers) = setup(&[(0, potion(), 2)]);
        let mut prompts = RecordingPrompts::default();

        assert!(!controllers[0].click(1.0, 0.35));
        assert!(controllers[0].begin_drag(Vec2::ZERO));
        controllers[0].release(DropTarget::Slot(0), &mut inventory, &mut prompts);

        // 松手落回自己格子时的点击只算第一下
        assert!(!controllers[0].click(1.2, 0.35));
        assert!(controllers[0].click(1.4, 0.35));
    }

    #[test]
    fn hover_shows_description_and_plays_quiet_cue() {
        let (_, controllers) = setup(&[(0, potion(), 1)]);
        let mut cues = RecordingCues::default();
        let mut line = DescriptionLine::default();

        controllers[1].hover_enter(&mut cues, &mut line);
        assert!(cues.0.is_empty());
        assert_eq!(line.text(), "");

        controllers[0].hover_enter(&mut cues, &mut line);
        assert_eq!(line.text(), "potion description");
        assert_eq!(cues.0, vec![CueRequest { name: HOVER_CUE.into(), volume: 0.3 }]);

        controllers[0].hover_exit(&mut line);
        assert_eq!(line.text(), "");
    }
}
