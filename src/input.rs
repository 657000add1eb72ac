use bracket_terminal::prelude::VirtualKeyCode;

use crate::map::Direction;
use crate::session::{Command, Phase};

/// Maps a key press to a command for the current phase. Continue is only
/// offered on the menu when `has_save` is set.
pub fn command_for_key(phase: Phase, key: VirtualKeyCode, has_save: bool) -> Option<Command> {
    match phase {
        Phase::Menu => match key {
            VirtualKeyCode::N | VirtualKeyCode::Return => Some(Command::NewGame),
            VirtualKeyCode::R if has_save => Some(Command::Continue),
            VirtualKeyCode::Q | VirtualKeyCode::Escape => Some(Command::Quit),
            _ => None,
        },
        Phase::Playing => match key {
            VirtualKeyCode::W | VirtualKeyCode::Up => Some(Command::Move(Direction::North)),
            VirtualKeyCode::D | VirtualKeyCode::Right => Some(Command::Move(Direction::East)),
            VirtualKeyCode::S | VirtualKeyCode::Down => Some(Command::Move(Direction::South)),
            VirtualKeyCode::A | VirtualKeyCode::Left => Some(Command::Move(Direction::West)),
            VirtualKeyCode::Space => Some(Command::Interact),
            VirtualKeyCode::V => Some(Command::Save),
            VirtualKeyCode::L => Some(Command::Load),
            VirtualKeyCode::H => Some(Command::Help),
            VirtualKeyCode::P => Some(Command::Pause),
            _ => None,
        },
        Phase::Paused => match key {
            VirtualKeyCode::P => Some(Command::Resume),
            VirtualKeyCode::Q => Some(Command::QuitToMenu),
            _ => None,
        },
        Phase::Won => match key {
            VirtualKeyCode::Return | VirtualKeyCode::Escape => Some(Command::QuitToMenu),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_only_while_playing() {
        assert_eq!(
            command_for_key(Phase::Playing, VirtualKeyCode::Left, false),
            Some(Command::Move(Direction::West))
        );
        assert_eq!(
            command_for_key(Phase::Playing, VirtualKeyCode::W, false),
            Some(Command::Move(Direction::North))
        );
        assert_eq!(command_for_key(Phase::Paused, VirtualKeyCode::W, false), None);
        assert_eq!(command_for_key(Phase::Menu, VirtualKeyCode::W, false), None);
    }

    #[test]
    fn p_toggles_between_playing_and_paused() {
        assert_eq!(command_for_key(Phase::Playing, VirtualKeyCode::P, false), Some(Command::Pause));
        assert_eq!(command_for_key(Phase::Paused, VirtualKeyCode::P, false), Some(Command::Resume));
    }

    #[test]
    fn continue_needs_a_save() {
        assert_eq!(command_for_key(Phase::Menu, VirtualKeyCode::R, false), None);
        assert_eq!(
            command_for_key(Phase::Menu, VirtualKeyCode::R, true),
            Some(Command::Continue)
        );
    }

    #[test]
    fn won_returns_to_menu() {
        assert_eq!(
            command_for_key(Phase::Won, VirtualKeyCode::Return, false),
            Some(Command::QuitToMenu)
        );
        assert_eq!(command_for_key(Phase::Won, VirtualKeyCode::Space, false), None);
    }
}
