use bevy::prelude::*;

/// 对话框关闭后要执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// 丢弃该格全部物品
    DropSlot { slot_index: usize },
    /// 取消拖拽，恢复该格外观
    RestoreSlot { slot_index: usize },
}

impl PromptAction {
    pub fn slot_index(&self) -> usize {
        match *self {
            PromptAction::DropSlot { slot_index } | PromptAction::RestoreSlot { slot_index } => {
                slot_index
            }
        }
    }
}

/// 一次确认请求：确认与取消恰好触发其一，且只触发一次
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub on_confirm: PromptAction,
    pub on_cancel: PromptAction,
}

pub trait PromptService {
    fn show(&mut self, prompt: Prompt);
}

/// 对话框状态变化，由 `flush_dialog_events` 统一处理
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Opened,
    Confirmed(PromptAction),
    Cancelled(PromptAction),
    /// 被新的请求顶掉，按取消处理但不播放音效
    Superseded(PromptAction),
}

/// 模态确认框（挂在 Resource）
#[derive(Resource, Debug, Default)]
pub struct ConfirmationDialog {
    current: Option<Prompt>,
    events: Vec<DialogEvent>,
}

impl ConfirmationDialog {
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Prompt> {
        self.current.as_ref()
    }

    pub fn confirm(&mut self) {
        if let Some(prompt) = self.current.take() {
            self.events.push(DialogEvent::Confirmed(prompt.on_confirm));
        }
    }

    pub fn cancel(&mut self) {
        if let Some(prompt) = self.current.take() {
            self.events.push(DialogEvent::Cancelled(prompt.on_cancel));
        }
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PromptService for ConfirmationDialog {
    fn show(&mut self, prompt: Prompt) {
        if let Some(old) = self.current.take() {
            self.events.push(DialogEvent::Superseded(old.on_cancel));
        }
        debug!("显示确认框: {}", prompt.message);
        self.current = Some(prompt);
        self.events.push(DialogEvent::Opened);
    }
}

/// 对话框给出的最终动作
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptResolved(pub PromptAction);

// --------------------------- UI 标记 ---------------------------

/// 全屏遮罩，同时拦截下层的点击
#[derive(Component)]
pub struct DialogBackdrop;

#[derive(Component)]
pub struct DialogTitle;

#[derive(Component)]
pub struct DialogMessage;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Confirm,
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_prompt(slot_index: usize) -> Prompt {
        Prompt {
            title: "丢弃物品".into(),
            message: format!("slot {slot_index}"),
            on_confirm: PromptAction::DropSlot { slot_index },
            on_cancel: PromptAction::RestoreSlot { slot_index },
        }
    }

    #[test]
    fn confirm_fires_only_the_confirm_action() {
        let mut dialog = ConfirmationDialog::default();
        dialog.show(drop_prompt(3));
        assert!(dialog.is_open());
        dialog.confirm();
        dialog.confirm();
        dialog.cancel();
        assert!(!dialog.is_open());
        assert_eq!(
            dialog.drain_events(),
            vec![
                DialogEvent::Opened,
                DialogEvent::Confirmed(PromptAction::DropSlot { slot_index: 3 }),
            ]
        );
    }

    #[test]
    fn cancel_fires_the_cancel_action() {
        let mut dialog = ConfirmationDialog::default();
        dialog.show(drop_prompt(1));
        dialog.cancel();
        assert_eq!(
            dialog.drain_events(),
            vec![
                DialogEvent::Opened,
                DialogEvent::Cancelled(PromptAction::RestoreSlot { slot_index: 1 }),
            ]
        );
        assert!(dialog.drain_events().is_empty());
    }

    #[test]
    fn showing_again_replaces_and_cancels_the_old_prompt() {
        let mut dialog = ConfirmationDialog::default();
        dialog.show(drop_prompt(1));
        dialog.show(drop_prompt(2));
        assert_eq!(dialog.current().unwrap().on_confirm.slot_index(), 2);
        dialog.confirm();
        assert_eq!(
            dialog.drain_events(),
            vec![
                DialogEvent::Opened,
                DialogEvent::Superseded(PromptAction::RestoreSlot { slot_index: 1 }),
                DialogEvent::Opened,
                DialogEvent::Confirmed(PromptAction::DropSlot { slot_index: 2 }),
            ]
        );
    }
}
