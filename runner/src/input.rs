use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use snake_common::games::snake::Direction;
use snake_common::log;

use crate::session::SessionCommand;

pub fn parse_command(line: &str) -> Option<SessionCommand> {
    if line == " " {
        return Some(SessionCommand::TogglePause);
    }
    match line.trim().to_ascii_lowercase().as_str() {
        "w" | "up" => Some(SessionCommand::Turn(Direction::Up)),
        "s" | "down" => Some(SessionCommand::Turn(Direction::Down)),
        "a" | "left" => Some(SessionCommand::Turn(Direction::Left)),
        "d" | "right" => Some(SessionCommand::Turn(Direction::Right)),
        "p" | "esc" | "pause" => Some(SessionCommand::TogglePause),
        "q" | "quit" => Some(SessionCommand::Stop),
        _ => None,
    }
}

/// Forwards stdin lines as session commands until stdin closes or the session is gone.
pub async fn forward_stdin(command_tx: mpsc::UnboundedSender<SessionCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(command) = parse_command(&line) else {
                    log!("Unknown input {:?}; use w/a/s/d, p to pause, q to quit", line);
                    continue;
                };
                if command_tx.send(command).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(parse_command("w"), Some(SessionCommand::Turn(Direction::Up)));
        assert_eq!(parse_command("A"), Some(SessionCommand::Turn(Direction::Left)));
        assert_eq!(parse_command(" down "), Some(SessionCommand::Turn(Direction::Down)));
        assert_eq!(parse_command("Right"), Some(SessionCommand::Turn(Direction::Right)));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(parse_command(" "), Some(SessionCommand::TogglePause));
        assert_eq!(parse_command("p"), Some(SessionCommand::TogglePause));
        assert_eq!(parse_command("q"), Some(SessionCommand::Stop));
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command(""), None);
    }
}
