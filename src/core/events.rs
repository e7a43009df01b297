use bevy::prelude::*;

/// 面向控制台的一行反馈
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

/// 把 LogEvent 打印到终端
pub fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
