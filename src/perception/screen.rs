//! Display geometry queries and region frame grabs.
//!
//! None of this feeds the decision pipeline directly; the resolution query
//! selects the calibration profile and the frame grab exists for offline
//! calibration work.

use image::RgbaImage;

use crate::calibration::Resolution;
use crate::errors::{HudScanError, HudScanResult};

/// Logical resolution of the primary display.
#[cfg(windows)]
pub fn display_resolution() -> HudScanResult<Resolution> {
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

    let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
    let height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
    metrics_to_resolution(width, height)
}

/// Logical resolution of the primary display.
#[cfg(not(windows))]
pub fn display_resolution() -> HudScanResult<Resolution> {
    let monitor = primary_monitor()?;
    Ok(Resolution::new(monitor.width(), monitor.height()))
}

/// Bounding size of the combined multi-monitor virtual screen.
#[cfg(windows)]
pub fn virtual_resolution() -> HudScanResult<Resolution> {
    use windows::Win32::UI::WindowsAndMessaging::{
        GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN,
    };

    let width = unsafe { GetSystemMetrics(SM_CXVIRTUALSCREEN) };
    let height = unsafe { GetSystemMetrics(SM_CYVIRTUALSCREEN) };
    metrics_to_resolution(width, height)
}

/// Bounding size of the combined multi-monitor virtual screen.
#[cfg(not(windows))]
pub fn virtual_resolution() -> HudScanResult<Resolution> {
    let monitors = monitors()?;
    let left = monitors.iter().map(|m| m.x()).min().unwrap_or(0);
    let top = monitors.iter().map(|m| m.y()).min().unwrap_or(0);
    let right = monitors
        .iter()
        .map(|m| m.x() + m.width() as i32)
        .max()
        .unwrap_or(0);
    let bottom = monitors
        .iter()
        .map(|m| m.y() + m.height() as i32)
        .max()
        .unwrap_or(0);
    Ok(Resolution::new(
        (right - left).max(0) as u32,
        (bottom - top).max(0) as u32,
    ))
}

/// Device-pixel resolution of the primary display.
#[cfg(windows)]
pub fn physical_resolution() -> HudScanResult<Resolution> {
    use windows::Win32::Graphics::Gdi::{GetDeviceCaps, DESKTOPHORZRES, DESKTOPVERTRES};

    let dc = crate::perception::gdi::screen_dc();
    let width = unsafe { GetDeviceCaps(Some(dc), DESKTOPHORZRES) };
    let height = unsafe { GetDeviceCaps(Some(dc), DESKTOPVERTRES) };
    metrics_to_resolution(width, height)
}

/// Device-pixel resolution of the primary display.
#[cfg(not(windows))]
pub fn physical_resolution() -> HudScanResult<Resolution> {
    let monitor = primary_monitor()?;
    let scale = monitor.scale_factor();
    Ok(Resolution::new(
        (monitor.width() as f32 * scale).round() as u32,
        (monitor.height() as f32 * scale).round() as u32,
    ))
}

/// Grabs the `(left, top, width, height)` screen region as an RGBA image.
pub fn grab(left: i32, top: i32, width: u32, height: u32) -> HudScanResult<RgbaImage> {
    let monitors = monitors()?;
    let monitor = monitors
        .iter()
        .find(|m| {
            left >= m.x()
                && top >= m.y()
                && left < m.x() + m.width() as i32
                && top < m.y() + m.height() as i32
        })
        .ok_or_else(|| {
            HudScanError::Capture(format!("no monitor contains ({left}, {top})"))
        })?;
    let frame = monitor
        .capture_image()
        .map_err(|e| HudScanError::Capture(format!("capture frame: {e}")))?;
    let rx = (left - monitor.x()) as u32;
    let ry = (top - monitor.y()) as u32;
    if rx + width > frame.width() || ry + height > frame.height() {
        return Err(HudScanError::Capture(format!(
            "region {width}x{height} at ({left}, {top}) exceeds the monitor frame"
        )));
    }
    Ok(image::imageops::crop_imm(&frame, rx, ry, width, height).to_image())
}

fn monitors() -> HudScanResult<Vec<xcap::Monitor>> {
    xcap::Monitor::all().map_err(|e| HudScanError::Capture(format!("enumerate monitors: {e}")))
}

#[cfg(not(windows))]
fn primary_monitor() -> HudScanResult<xcap::Monitor> {
    monitors()?
        .into_iter()
        .find(|m| m.is_primary())
        .ok_or_else(|| HudScanError::Capture("no primary monitor".into()))
}

#[cfg(windows)]
fn metrics_to_resolution(width: i32, height: i32) -> HudScanResult<Resolution> {
    if width <= 0 || height <= 0 {
        return Err(HudScanError::Capture("display metrics query failed".into()));
    }
    Ok(Resolution::new(width as u32, height as u32))
}
