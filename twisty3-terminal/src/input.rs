/// Keyboard mapping from terminal events to puzzle actions
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use twisty3_core::{Color, Motion, TurnCommand};

/// Orbit step per key press, in radians.
const ORBIT_STEP: f32 = 0.1;

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Turn(TurnCommand),
    Undo,
    Highlight(Color),
    Orbit { d_pitch: f32, d_yaw: f32 },
    Quit,
}

/// Map a key event to an action.
///
/// Lowercase `f`/`r`/`u` turn forward; with shift (uppercase) they turn
/// backward. Digits `1`-`6` pick the highlighted face.
pub fn action_for_key(event: &KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let action = match event.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' => Action::Quit,
        KeyCode::Char(c @ ('f' | 'r' | 'u' | 'F' | 'R' | 'U')) => {
            let motion = match c.to_ascii_lowercase() {
                'f' => Motion::Front,
                'r' => Motion::Right,
                _ => Motion::Up,
            };
            let backward = c.is_ascii_uppercase() || event.modifiers.contains(KeyModifiers::SHIFT);
            Action::Turn(TurnCommand::new(motion, !backward))
        }
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            Action::Highlight(Color::FACES[index])
        }
        KeyCode::Backspace => Action::Undo,
        KeyCode::Char('w') | KeyCode::Up => Action::Orbit {
            d_pitch: ORBIT_STEP,
            d_yaw: 0.0,
        },
        KeyCode::Char('s') | KeyCode::Down => Action::Orbit {
            d_pitch: -ORBIT_STEP,
            d_yaw: 0.0,
        },
        KeyCode::Char('a') | KeyCode::Left => Action::Orbit {
            d_pitch: 0.0,
            d_yaw: -ORBIT_STEP,
        },
        KeyCode::Char('d') | KeyCode::Right => Action::Orbit {
            d_pitch: 0.0,
            d_yaw: ORBIT_STEP,
        },
        _ => return None,
    };
    Some(action)
}
