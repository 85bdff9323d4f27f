use crate::errors::HudScanResult;
use crate::executor::driver::{CursorProvider, InputDriver, MouseButton};

/// Step offsets from the movement origin for a smooth move of `(mx, my)`.
///
/// The dominant axis advances one pixel per step; the other axis follows
/// proportionally, with integer arithmetic so the floor is exact. The walk
/// deliberately stops one step short of the full displacement.
pub fn interpolate(mx: i32, my: i32) -> Vec<(i32, i32)> {
    let (adx, ady) = (mx.abs(), my.abs());
    let mut steps = Vec::new();
    if adx >= ady {
        for i in 1..adx {
            let follow = (ady as i64 * i as i64 / adx as i64) as i32;
            steps.push((apply_sign(i, mx), apply_sign(follow, my)));
        }
    } else {
        for i in 1..ady {
            let follow = (adx as i64 * i as i64 / ady as i64) as i32;
            steps.push((apply_sign(follow, mx), apply_sign(i, my)));
        }
    }
    steps
}

fn apply_sign(magnitude: i32, direction: i32) -> i32 {
    if direction < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Mouse actuation over the low-level driver.
///
/// Availability is decided once in `open`: when the driver cannot open,
/// every operation becomes a no-op and detection-only deployments keep
/// working.
pub struct Mouse<D> {
    driver: D,
    enabled: bool,
}

impl<D: InputDriver + CursorProvider> Mouse<D> {
    pub fn open(mut driver: D) -> Self {
        let enabled = driver.open();
        if !enabled {
            tracing::warn!("input driver unavailable, mouse actuation disabled");
        }
        Mouse { driver, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn position(&self) -> HudScanResult<(i32, i32)> {
        self.driver.position()
    }

    /// Single repositioning command. The relative delta is computed from
    /// the live cursor position at call time.
    pub fn move_to(&mut self, x: i32, y: i32, absolute: bool) -> HudScanResult<()> {
        if !self.enabled {
            return Ok(());
        }
        let (mut mx, mut my) = (x, y);
        if absolute {
            let (ox, oy) = self.driver.position()?;
            mx = x - ox;
            my = y - oy;
        }
        self.driver.move_relative(mx, my, true)
    }

    /// Smooth move: decomposes the displacement into per-pixel steps on the
    /// dominant axis and issues each one as an absolute command against the
    /// origin captured once up front, so rounding loss never compounds the
    /// way chained relative moves would.
    ///
    /// Each step still resolves its delta from the live cursor position, so
    /// external cursor movement mid-walk drifts the result; there are no
    /// yield points once the walk starts.
    pub fn move_smooth(&mut self, x: i32, y: i32, absolute: bool) -> HudScanResult<()> {
        if !self.enabled {
            return Ok(());
        }
        let (ox, oy) = self.driver.position()?;
        let (mut mx, mut my) = (x, y);
        if absolute {
            mx = x - ox;
            my = y - oy;
        }
        tracing::debug!(
            origin = ?(ox, oy),
            target = ?(ox + mx, oy + my),
            "smooth move"
        );
        for (ix, iy) in interpolate(mx, my) {
            self.move_to(ox + ix, oy + iy, true)?;
        }
        Ok(())
    }

    pub fn press(&mut self, button: MouseButton) -> HudScanResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.driver.button_down(button)
    }

    pub fn release(&mut self, button: MouseButton) -> HudScanResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.driver.button_up(button)
    }

    pub fn click(&mut self, button: MouseButton) -> HudScanResult<()> {
        self.press(button)?;
        self.release(button)
    }
}
