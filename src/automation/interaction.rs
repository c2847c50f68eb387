use std::thread;
use std::time::Duration;

use crate::config::MouseButton;

/// Delay for a specified number of milliseconds
pub fn delay_ms(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Pointer primitive driven by the action executor. Behind a trait so the
/// sequence logic can run against a scripted device in tests.
pub trait PointerDevice {
    fn move_to(&mut self, x: i32, y: i32) -> bool;
    fn click(&mut self, x: i32, y: i32, button: MouseButton) -> bool;
}

/// Physical mouse backed by rustautogui.
#[cfg(windows)]
pub struct SystemPointer {
    gui: rustautogui::RustAutoGui,
}

#[cfg(windows)]
impl SystemPointer {
    pub fn new() -> Result<Self, String> {
        let gui = rustautogui::RustAutoGui::new(false)
            .map_err(|e| format!("Failed to initialize RustAutoGui: {}", e))?;
        Ok(Self { gui })
    }
}

#[cfg(windows)]
impl PointerDevice for SystemPointer {
    fn move_to(&mut self, x: i32, y: i32) -> bool {
        // The cursor cannot leave the desktop; clamp instead of failing
        let (x, y) = (x.max(0) as u32, y.max(0) as u32);
        self.gui.move_mouse_to_pos(x, y, 0.0).is_ok()
    }

    fn click(&mut self, x: i32, y: i32, button: MouseButton) -> bool {
        let (x, y) = (x.max(0) as u32, y.max(0) as u32);

        // Two click attempts with a 50ms pause between them
        for attempt in 0..2 {
            if self.gui.move_mouse_to_pos(x, y, 0.0).is_err() {
                if attempt == 0 {
                    thread::sleep(Duration::from_millis(50));
                    continue;
                }
                return false;
            }

            // Short sleep to stabilize cursor
            thread::sleep(Duration::from_millis(20));

            let clicked = match button {
                MouseButton::Left => self.gui.left_click(),
                MouseButton::Right => self.gui.right_click(),
                MouseButton::Middle => self.gui.middle_click(),
            };
            match clicked {
                Ok(_) => return true,
                Err(_) if attempt == 0 => thread::sleep(Duration::from_millis(50)),
                Err(_) => return false,
            }
        }
        false
    }
}
