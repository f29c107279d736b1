use winit::event::VirtualKeyCode;

use crate::input::KeyCode;

pub fn key_code(key: VirtualKeyCode) -> KeyCode {
    match key {
        VirtualKeyCode::Space => KeyCode::Space,
        VirtualKeyCode::Up => KeyCode::ArrowUp,
        VirtualKeyCode::Down => KeyCode::ArrowDown,
        VirtualKeyCode::Left => KeyCode::ArrowLeft,
        VirtualKeyCode::Right => KeyCode::ArrowRight,
        _ => KeyCode::Other,
    }
}
