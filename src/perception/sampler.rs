use crate::calibration::Color;
use crate::errors::{HudScanError, HudScanResult};

/// Single-pixel color read at screen coordinates.
///
/// A read is a blocking foreign call costing 1–10 ms and is not guaranteed
/// stable across repeated reads of the same point. Callers budget samples
/// accordingly and never cache results across frames.
pub trait PixelSampler {
    fn sample(&self, x: i32, y: i32) -> HudScanResult<Color>;
}

impl<S: PixelSampler + ?Sized> PixelSampler for Box<S> {
    fn sample(&self, x: i32, y: i32) -> HudScanResult<Color> {
        (**self).sample(x, y)
    }
}

/// GDI `GetPixel` sampler against the process-wide screen device context.
/// The cheapest live backend, Windows only.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct GdiSampler;

#[cfg(windows)]
impl GdiSampler {
    pub fn new() -> Self {
        GdiSampler
    }
}

#[cfg(windows)]
impl PixelSampler for GdiSampler {
    fn sample(&self, x: i32, y: i32) -> HudScanResult<Color> {
        use windows::Win32::Graphics::Gdi::GetPixel;

        let raw = unsafe { GetPixel(crate::perception::gdi::screen_dc(), x, y) };
        if raw.0 == u32::MAX {
            return Err(HudScanError::Capture(format!(
                "pixel read failed at ({x}, {y})"
            )));
        }
        Ok(Color(raw.0 & 0x00ff_ffff))
    }
}

/// Portable sampler that grabs a full monitor frame per read and extracts
/// one pixel from it. Considerably slower than the GDI path; packs channels
/// in the same layout so one calibration file serves both backends.
pub struct CaptureSampler {
    monitor: xcap::Monitor,
}

impl CaptureSampler {
    pub fn primary() -> HudScanResult<Self> {
        let monitor = xcap::Monitor::all()
            .map_err(|e| HudScanError::Capture(format!("enumerate monitors: {e}")))?
            .into_iter()
            .find(|m| m.is_primary())
            .ok_or_else(|| HudScanError::Capture("no primary monitor".into()))?;
        Ok(CaptureSampler { monitor })
    }
}

impl PixelSampler for CaptureSampler {
    fn sample(&self, x: i32, y: i32) -> HudScanResult<Color> {
        let frame = self
            .monitor
            .capture_image()
            .map_err(|e| HudScanError::Capture(format!("capture frame: {e}")))?;
        let fx = x - self.monitor.x();
        let fy = y - self.monitor.y();
        if fx < 0 || fy < 0 || fx as u32 >= frame.width() || fy as u32 >= frame.height() {
            return Err(HudScanError::Capture(format!(
                "point ({x}, {y}) outside the primary monitor"
            )));
        }
        let pixel = frame.get_pixel(fx as u32, fy as u32);
        Ok(Color::from_rgb(pixel[0], pixel[1], pixel[2]))
    }
}

/// Sampler backend for this platform: GDI single-pixel reads on Windows,
/// full-frame capture elsewhere.
pub fn live_sampler() -> HudScanResult<Box<dyn PixelSampler>> {
    #[cfg(windows)]
    return Ok(Box::new(GdiSampler::new()));
    #[cfg(not(windows))]
    return Ok(Box::new(CaptureSampler::primary()?));
}
