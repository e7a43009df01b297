use bevy::prelude::*;
use std::collections::HashMap;

/// 按名字播放一次性音效
pub trait CueService {
    fn play(&mut self, name: &str) {
        self.play_at_volume(name, 1.0);
    }

    fn play_at_volume(&mut self, name: &str, volume: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct CueRequest {
    pub name: String,
    pub volume: f32,
}

/// 本帧要播放的音效，由 `play_queued_cues` 统一取走
#[derive(Resource, Debug, Default)]
pub struct CueQueue {
    pending: Vec<CueRequest>,
}

impl CueQueue {
    pub fn drain(&mut self) -> impl Iterator<Item = CueRequest> + '_ {
        self.pending.drain(..)
    }

    pub fn pending(&self) -> &[CueRequest] {
        &self.pending
    }
}

impl CueService for CueQueue {
    fn play_at_volume(&mut self, name: &str, volume: f32) {
        if name.is_empty() {
            warn!("音效名为空，忽略");
            return;
        }
        self.pending.push(CueRequest {
            name: name.to_string(),
            volume,
        });
    }
}

/// 音效名 → 音频资源
#[derive(Resource, Debug, Default)]
pub struct SoundBank {
    clips: HashMap<String, Handle<AudioSource>>,
}

impl SoundBank {
    /// 同名音效已存在时拒绝覆盖
    pub fn register(&mut self, name: impl Into<String>, clip: Handle<AudioSource>) -> bool {
        let name = name.into();
        if name.is_empty() {
            error!("音效名不能为空");
            return false;
        }
        if self.clips.contains_key(&name) {
            warn!("音效 '{name}' 已存在");
            return false;
        }
        self.clips.insert(name, clip);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Handle<AudioSource>> {
        self.clips.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Handle<AudioSource>> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// 正在播放的音效实体
#[derive(Component)]
pub struct CuePlayback;

/// 停止所有正在播放的音效
#[derive(Event)]
pub struct StopCues;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_records_names_and_volumes() {
        let mut queue = CueQueue::default();
        queue.play("Move");
        queue.play_at_volume("Crushed", 0.3);
        queue.play("");
        assert_eq!(
            queue.pending(),
            &[
                CueRequest { name: "Move".into(), volume: 1.0 },
                CueRequest { name: "Crushed".into(), volume: 0.3 },
            ]
        );
        assert_eq!(queue.drain().count(), 2);
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn bank_rejects_duplicates_and_empty_names() {
        let mut bank = SoundBank::default();
        assert!(bank.register("Move", Handle::default()));
        assert!(!bank.register("Move", Handle::default()));
        assert!(!bank.register("", Handle::default()));
        assert_eq!(bank.len(), 1);
        assert!(bank.contains("Move"));
        assert!(bank.remove("Move").is_some());
        assert!(bank.is_empty());
    }
}
