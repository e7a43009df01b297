pub mod components;
mod systems;

use bevy::prelude::*;
use components::*;
use systems::*;

/// 音效插件：具名音效表 + 播放队列
pub struct SoundPlugin;
impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundBank>()
            .init_resource::<CueQueue>()
            .add_event::<StopCues>()
            .add_systems(Startup, load_sound_bank)
            .add_systems(PostUpdate, (stop_cues, play_queued_cues).chain());
    }
}
