use image::{ImageBuffer, Rgb, RgbImage};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits,
    GetWindowDC, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
    SRCCOPY,
};

use crate::core::window::get_window_rect;

/// Capture the full window rect into an RGB image using BitBlt.
/// Note: this captures visible pixels, so the window should be visible.
pub fn capture_window(hwnd: HWND) -> Result<RgbImage, String> {
    let (left, top, right, bottom) =
        get_window_rect(hwnd).ok_or_else(|| "Failed to get window rect".to_string())?;
    let width = right - left;
    let height = bottom - top;
    if width <= 0 || height <= 0 {
        return Err(format!("Window has no visible area ({}x{})", width, height));
    }

    unsafe {
        // Get window device context
        let hdc = GetWindowDC(hwnd);
        if hdc.is_invalid() {
            return Err("Failed to get window device context".to_string());
        }

        let mem_dc = CreateCompatibleDC(hdc);
        if mem_dc.is_invalid() {
            let _ = ReleaseDC(hwnd, hdc);
            return Err("Failed to create compatible DC".to_string());
        }

        let bitmap = CreateCompatibleBitmap(hdc, width, height);
        if bitmap.is_invalid() {
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(hwnd, hdc);
            return Err("Failed to create compatible bitmap".to_string());
        }

        let old_bitmap = SelectObject(mem_dc, bitmap);

        if BitBlt(mem_dc, 0, 0, width, height, hdc, 0, 0, SRCCOPY).is_err() {
            let _ = SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(hwnd, hdc);
            return Err("BitBlt failed - could not capture window".to_string());
        }

        let mut bmi = BITMAPINFO::default();
        bmi.bmiHeader = BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height, // Negative for top-down bitmap
            biPlanes: 1,
            biBitCount: 24, // BGR, 3 bytes per pixel
            biCompression: BI_RGB.0 as u32,
            ..Default::default()
        };

        // Rows of a 24-bit DIB are padded to DWORD boundaries.
        let row_stride = ((width * 3 + 3) & !3) as usize;
        let mut buffer: Vec<u8> = vec![0; row_stride * height as usize];

        let scan_lines = GetDIBits(
            mem_dc,
            bitmap,
            0,
            height as u32,
            Some(buffer.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        );

        // Cleanup GDI objects
        let _ = SelectObject(mem_dc, old_bitmap);
        let _ = DeleteObject(bitmap);
        let _ = DeleteDC(mem_dc);
        let _ = ReleaseDC(hwnd, hdc);

        if scan_lines == 0 {
            return Err("Failed to get bitmap bits".to_string());
        }

        // Windows hands out BGR, the matcher wants RGB
        let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);
        for y in 0..height as usize {
            let row = y * row_stride;
            for x in 0..width as usize {
                let idx = row + x * 3;
                let b = buffer[idx];
                let g = buffer[idx + 1];
                let r = buffer[idx + 2];
                img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
            }
        }

        Ok(img)
    }
}
