//! Process-wide GDI state (Windows only).

use std::sync::OnceLock;

use windows::Win32::Graphics::Gdi::{GetDC, HDC};

// The screen device context is acquired once for the process lifetime and
// never released, matching the environment the calibration data was
// captured in.
static SCREEN_DC: OnceLock<isize> = OnceLock::new();

pub(crate) fn screen_dc() -> HDC {
    let raw = *SCREEN_DC.get_or_init(|| unsafe { GetDC(None) }.0 as isize);
    HDC(raw as *mut core::ffi::c_void)
}
