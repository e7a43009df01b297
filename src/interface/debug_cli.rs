//! 文字 CLI：读取 stdin → 解析命令 → 转成背包 / 存档事件

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::str::SplitWhitespace;
use std::sync::{Arc, Mutex};

use crate::core::{events::LogEvent, states::AppState};
use crate::data::catalog::{uuid_from_id, ItemCatalog};
use crate::inventory::components::Inventory;
use crate::inventory::events::*;
use crate::save::{DeleteSaveEvent, LoadInventoryEvent, SaveInventoryEvent};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

const HELP: &str = "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  items                  列出所有物品
  items <token>          用 id / uuid / 名称 查询单个物品
  give <id> [count]      给予物品
  inventory              查看背包
  remove <index> [count] 移除某格物品
  move <from> <to>       移动 / 合并 / 交换两格
  use <index>            使用某格物品
  sort                   按类别和名称整理
  pop                    移除最后一个物品
  clear                  清空背包
  save / load            存档 / 读档
  delete-save            删除存档";

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Give { id: String, count: u32 },
    Inventory,
    Remove { index: usize, count: u32 },
    Move { from: usize, to: usize },
    Use { index: usize },
    Sort,
    Pop,
    Clear,
    Save,
    Load,
    DeleteSave,
    /// 参数缺失或不是数字
    Usage(&'static str),
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[derive(bevy::ecs::system::SystemParam)]
struct InventoryWriters<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
    remove: EventWriter<'w, RemoveItemEvent>,
    moves: EventWriter<'w, MoveItemEvent>,
    use_item: EventWriter<'w, UseItemEvent>,
    sort: EventWriter<'w, SortInventoryEvent>,
    pop: EventWriter<'w, RemoveLastItemEvent>,
    clear: EventWriter<'w, ClearInventoryEvent>,
}

#[derive(bevy::ecs::system::SystemParam)]
struct SaveWriters<'w> {
    save: EventWriter<'w, SaveInventoryEvent>,
    load: EventWriter<'w, LoadInventoryEvent>,
    delete: EventWriter<'w, DeleteSaveEvent>,
}

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    inventory: Res<Inventory>,
    mut inv: InventoryWriters,
    mut saves: SaveWriters,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                let used = inventory.slots().iter().filter(|s| !s.is_empty()).count();
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}, Slots: {used}/{}",
                    state.get(),
                    catalog.len(),
                    inventory.slot_count()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Items(None) => {
                for item in catalog.iter() {
                    log.write(LogEvent(format!(
                        "{} | {} | {} | {:?}",
                        uuid_from_id(&item.id),
                        item.id,
                        item.name,
                        item.category
                    )));
                }
            }

            Command::Items(Some(token)) => match catalog.find(&token) {
                Some(item) => {
                    log.write(LogEvent(format!(
                        "==================================================
UUID     : {}
ID       : {}
Name     : {}
Category : {:?}
Stack    : {}
Desc     : {}
==================================================",
                        uuid_from_id(&item.id),
                        item.id,
                        item.name,
                        item.category,
                        item.max_stack(),
                        item.description
                    )));
                }
                None => {
                    log.write(LogEvent("未找到匹配物品".into()));
                }
            },

            Command::Give { id, count } => {
                inv.give.write(GiveItemEvent { id, count });
            }

            Command::Inventory => {
                inv.list.write(ListInventoryEvent);
            }

            Command::Remove { index, count } => {
                inv.remove.write(RemoveItemEvent { index, count });
            }

            Command::Move { from, to } => {
                inv.moves.write(MoveItemEvent { from, to });
            }

            Command::Use { index } => {
                inv.use_item.write(UseItemEvent { index });
            }

            Command::Sort => {
                inv.sort.write(SortInventoryEvent);
            }

            Command::Pop => {
                inv.pop.write(RemoveLastItemEvent);
            }

            Command::Clear => {
                inv.clear.write(ClearInventoryEvent);
            }

            Command::Save => {
                saves.save.write(SaveInventoryEvent);
            }

            Command::Load => {
                saves.load.write(LoadInventoryEvent);
            }

            Command::DeleteSave => {
                saves.delete.write(DeleteSaveEvent);
            }

            Command::Usage(usage) => {
                log.write(LogEvent(format!("用法: {usage}")));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();

    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(str::to_string)),
        "give" => match parts.next() {
            Some(id) => {
                let id = id.to_string();
                let count = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1);
                Command::Give { id, count }
            }
            None => Command::Usage("give <id> [count]"),
        },
        "inventory" | "inv" => Command::Inventory,
        "remove" | "rm" => match (number(&mut parts, None), number(&mut parts, Some(1))) {
            (Some(index), Some(count)) => Command::Remove { index: index as usize, count },
            _ => Command::Usage("remove <index> [count]"),
        },
        "move" | "mv" => match (number(&mut parts, None), number(&mut parts, None)) {
            (Some(from), Some(to)) => Command::Move { from: from as usize, to: to as usize },
            _ => Command::Usage("move <from> <to>"),
        },
        "use" | "u" => match number(&mut parts, None) {
            Some(index) => Command::Use { index: index as usize },
            None => Command::Usage("use <index>"),
        },
        "sort" => Command::Sort,
        "pop" => Command::Pop,
        "clear" => Command::Clear,
        "save" => Command::Save,
        "load" => Command::Load,
        "delete-save" => Command::DeleteSave,
        other => Command::Unsupported(other.into()),
    }
}

/// 缺省时用 default；给了但不是数字返回 None
fn number(parts: &mut SplitWhitespace<'_>, default: Option<u32>) -> Option<u32> {
    match parts.next() {
        Some(s) => s.parse().ok(),
        None => default,
    }
}
