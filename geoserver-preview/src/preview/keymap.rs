// ABOUTME: Key bindings for the interactive map preview
// ABOUTME: Maps terminal key events to preview commands; anything else is ignored

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Close,
    ZoomIn,
    ZoomOut,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    Refresh,
    NextStyle,
    PrevStyle,
}

/// Command bound to `key`, if any. Key releases never map.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Raw mode swallows SIGINT, so ctrl-c has to close explicitly
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Close),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Close),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::ZoomIn),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Command::ZoomOut),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::PanUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::PanDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::PanLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::PanRight),
        KeyCode::Char('r') => Some(Command::Refresh),
        KeyCode::Char('s') => Some(Command::NextStyle),
        KeyCode::Char('S') => Some(Command::PrevStyle),
        _ => None,
    }
}
