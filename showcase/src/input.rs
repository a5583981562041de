use winit::event::VirtualKeyCode;

use engine::app::KeyEvent;

/// Gameplay keys currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub space: bool,
    pub shift: bool,
    /// Arrow keys.
    pub left: bool,
    pub right: bool,
    /// WASD / ZQSD movement.
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
}

impl Controls {
    /// Updates the held state for `key`; returns `false` for keys that are not gameplay keys.
    pub fn apply(&mut self, key: VirtualKeyCode, pressed: bool) -> bool {
        let slot = match key {
            VirtualKeyCode::Space => &mut self.space,
            VirtualKeyCode::LShift | VirtualKeyCode::RShift => &mut self.shift,
            VirtualKeyCode::Left => &mut self.left,
            VirtualKeyCode::Right => &mut self.right,
            VirtualKeyCode::A | VirtualKeyCode::Q => &mut self.move_left,
            VirtualKeyCode::D => &mut self.move_right,
            VirtualKeyCode::S => &mut self.move_down,
            VirtualKeyCode::W | VirtualKeyCode::Z => &mut self.move_up,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Run-level commands, as opposed to held gameplay keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Restart,
}

/// Turns raw key events into held controls and one-shot commands.
#[derive(Debug, Default)]
pub struct InputState {
    pub controls: Controls,
    pause_down: bool,
    restart_down: bool,
}

impl InputState {
    pub fn on_key(&mut self, event: KeyEvent) -> Option<Command> {
        let KeyEvent { key, pressed } = event;
        match key {
            VirtualKeyCode::P => edge(&mut self.pause_down, pressed).then_some(Command::TogglePause),
            VirtualKeyCode::R => edge(&mut self.restart_down, pressed).then_some(Command::Restart),
            _ => {
                self.controls.apply(key, pressed);
                None
            }
        }
    }
}

// OS key-repeat re-sends "pressed" while a key is held; only the first press counts.
fn edge(down: &mut bool, pressed: bool) -> bool {
    let fired = pressed && !*down;
    *down = pressed;
    fired
}
