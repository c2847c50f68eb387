use windows::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, RECT};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowThreadProcessId, IsWindow, IsWindowVisible,
    SetForegroundWindow, ShowWindow, SW_RESTORE,
};

/// Find the pid of a running process by executable name. The ".exe" suffix
/// is optional and matching is case-insensitive.
pub fn find_process_by_name(process_name: &str) -> Option<u32> {
    let wanted = process_name.to_lowercase();
    let wanted_exe = format!("{}.exe", wanted);

    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0).ok()?;

        let mut entry = PROCESSENTRY32W::default();
        entry.dwSize = std::mem::size_of::<PROCESSENTRY32W>() as u32;

        let mut found = None;
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let exe = utf16_until_nul(&entry.szExeFile).to_lowercase();
                if exe == wanted || exe == wanted_exe {
                    found = Some(entry.th32ProcessID);
                    break;
                }
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snapshot);

        if found.is_none() {
            log::warn!("Process '{}' not found", process_name);
        }
        found
    }
}

fn utf16_until_nul(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

struct EnumWindowsData {
    pid: u32,
    hwnd: Option<HWND>,
}

unsafe extern "system" fn enum_windows_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let data = &mut *(lparam.0 as *mut EnumWindowsData);

    if !IsWindowVisible(hwnd).as_bool() {
        return BOOL::from(true);
    }
    let mut pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));
    if pid == data.pid {
        data.hwnd = Some(hwnd);
        // Stop enumerating, we have our window
        return BOOL::from(false);
    }
    BOOL::from(true)
}

/// Find a visible top-level window belonging to the named process.
pub fn find_window_by_process(process_name: &str) -> Option<HWND> {
    let pid = find_process_by_name(process_name)?;

    let mut data = EnumWindowsData { pid, hwnd: None };
    unsafe {
        // EnumWindows reports an error when the callback stops it early;
        // the out-param is what matters here.
        let _ = EnumWindows(Some(enum_windows_proc), LPARAM(&mut data as *mut _ as isize));
    }

    match data.hwnd {
        Some(hwnd) => {
            log::info!(
                "Found window {:?} for process '{}' (pid {})",
                hwnd,
                process_name,
                pid
            );
            Some(hwnd)
        }
        None => {
            log::warn!("No visible window found for process '{}'", process_name);
            None
        }
    }
}

/// Restore the window if minimized and bring it to the foreground.
pub fn activate_window(hwnd: HWND) -> bool {
    unsafe {
        let _ = ShowWindow(hwnd, SW_RESTORE);
        SetForegroundWindow(hwnd).as_bool()
    }
}

/// Check if window handle is valid
pub fn is_window_valid(hwnd: HWND) -> bool {
    unsafe { IsWindow(hwnd).as_bool() }
}

/// Get window rectangle as (left, top, right, bottom)
pub fn get_window_rect(hwnd: HWND) -> Option<(i32, i32, i32, i32)> {
    unsafe {
        let mut rect = RECT::default();
        if GetWindowRect(hwnd, &mut rect).is_ok() {
            Some((rect.left, rect.top, rect.right, rect.bottom))
        } else {
            None
        }
    }
}
