use crate::catalog::Catalog;
use crate::commands::LayoutCommand;
use crate::init_config::CanvasConfig;
use crate::profile_scope;
use crossbeam::channel::Sender;
use std::io::BufRead;
use std::time::Duration;

const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// One line of user input.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
    Add(String),
    Remove(usize),
    Clear,
    Start,
    Quit,
}

/// Parse `add <name>`, `remove <index>`, `clear`, `start` or `quit`. Blank
/// lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<InputAction>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let action = match word {
        "add" if !rest.is_empty() => InputAction::Add(rest.to_string()),
        "add" => return Err("usage: add <catalog name>".to_string()),
        "remove" => {
            let index = rest
                .parse::<usize>()
                .map_err(|_| format!("usage: remove <index>, got `{}`", rest))?;
            InputAction::Remove(index)
        }
        "clear" => InputAction::Clear,
        "start" => InputAction::Start,
        "quit" | "exit" => InputAction::Quit,
        other => return Err(format!("unknown command `{}`", other)),
    };
    Ok(Some(action))
}

/// Feed user input to a running layout until `quit`, end of input, or the
/// layout loop going away.
pub fn run_input_loop<R: BufRead>(
    input: R,
    commands: &Sender<LayoutCommand>,
    catalog: &Catalog,
    canvas: &CanvasConfig,
) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("[layout] input error: {}", err);
                break;
            }
        };
        let action = match parse_line(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("[layout] {}", msg);
                continue;
            }
        };
        if action == InputAction::Quit {
            break;
        }
        if !handle_action(action, commands, catalog, canvas) {
            eprintln!("[layout] layout loop stopped; ending input");
            break;
        }
    }
}

/// Returns false once the command queue is closed.
fn handle_action(
    action: InputAction,
    commands: &Sender<LayoutCommand>,
    catalog: &Catalog,
    canvas: &CanvasConfig,
) -> bool {
    profile_scope!("command_handling");
    let cmd = match action {
        InputAction::Add(name) => match catalog.plate_spec(&name, canvas) {
            Ok(spec) => LayoutCommand::Add { spec },
            Err(err) => {
                eprintln!("[layout] {}", err);
                return true;
            }
        },
        InputAction::Remove(index) => {
            let (reply_tx, reply_rx) = crossbeam::channel::bounded(1);
            let cmd = LayoutCommand::Remove {
                index,
                reply: Some(reply_tx),
            };
            if commands.send(cmd).is_err() {
                return false;
            }
            match reply_rx.recv_timeout(REPLY_TIMEOUT) {
                Ok(Ok(_)) => eprintln!("[layout] removed particle {}", index),
                Ok(Err(err)) => eprintln!("[layout] {}", err),
                Err(_) => eprintln!("[layout] no reply to remove {}", index),
            }
            return true;
        }
        InputAction::Clear => LayoutCommand::Clear,
        InputAction::Start => LayoutCommand::Start,
        InputAction::Quit => return true,
    };
    commands.send(cmd).is_ok()
}
