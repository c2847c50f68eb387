use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

/// Check if ESC is currently down (works even when the app doesn't have
/// focus); the GUI polls this as the emergency stop.
pub fn is_escape_key_down() -> bool {
    unsafe {
        let key_state = GetAsyncKeyState(0x1B); // VK_ESCAPE
        (key_state as u16) & 0x8000 != 0
    }
}
