use super::components::*;
use crate::core::resources::GameConfig;
use bevy::audio::Volume;
use bevy::prelude::*;

/// 按配置把音效注册进 SoundBank
pub fn load_sound_bank(
    mut bank: ResMut<SoundBank>,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
) {
    for (name, path) in &config.sound.clips {
        bank.register(name.clone(), asset_server.load(path.clone()));
    }
    info!("已注册 {} 个音效", bank.len());
}

/// 每帧把排队的音效生成为一次性 AudioPlayer
pub fn play_queued_cues(
    mut commands: Commands,
    mut queue: ResMut<CueQueue>,
    bank: Res<SoundBank>,
) {
    for cue in queue.drain() {
        let Some(clip) = bank.get(&cue.name) else {
            warn!("未找到音效: {}", cue.name);
            continue;
        };
        debug!("播放音效: {} (音量 {})", cue.name, cue.volume);
        commands.spawn((
            AudioPlayer::new(clip.clone()),
            PlaybackSettings::DESPAWN.with_volume(Volume::Linear(cue.volume)),
            CuePlayback,
        ));
    }
}

pub fn stop_cues(
    mut commands: Commands,
    mut ev_stop: EventReader<StopCues>,
    playing: Query<Entity, With<CuePlayback>>,
) {
    if ev_stop.is_empty() {
        return;
    }
    ev_stop.clear();
    for entity in &playing {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cues_spawn_players_and_unknown_ones_are_dropped() {
        let mut app = App::new();
        let mut bank = SoundBank::default();
        bank.register("Move", Handle::default());
        app.insert_resource(bank)
            .init_resource::<CueQueue>()
            .add_systems(Update, play_queued_cues);

        {
            let mut queue = app.world_mut().resource_mut::<CueQueue>();
            queue.play_at_volume("Move", 0.3);
            queue.play("Missing");
        }
        app.update();

        let world = app.world_mut();
        let count = world.query::<&CuePlayback>().iter(world).count();
        assert_eq!(count, 1);
        assert!(world.resource::<CueQueue>().pending().is_empty());
    }

    #[test]
    fn stop_cues_despawns_everything_playing() {
        let mut app = App::new();
        app.add_event::<StopCues>()
            .add_systems(Update, stop_cues);
        app.world_mut().spawn(CuePlayback);
        app.world_mut().spawn(CuePlayback);

        app.update();
        let world = app.world_mut();
        assert_eq!(world.query::<&CuePlayback>().iter(world).count(), 2);

        app.world_mut().send_event(StopCues);
        app.update();
        let world = app.world_mut();
        assert_eq!(world.query::<&CuePlayback>().iter(world).count(), 0);
    }
}
