use crate::errors::HudScanResult;
use crate::executor::driver::InputDriver;

/// Keyboard actuation over the low-level driver; no-ops when the driver
/// failed to open, like the mouse facade.
pub struct Keyboard<D> {
    driver: D,
    enabled: bool,
}

impl<D: InputDriver> Keyboard<D> {
    pub fn open(mut driver: D) -> Self {
        let enabled = driver.open();
        if !enabled {
            tracing::warn!("input driver unavailable, keyboard actuation disabled");
        }
        Keyboard { driver, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn press(&mut self, key: char) -> HudScanResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.driver.key_down(key)
    }

    pub fn release(&mut self, key: char) -> HudScanResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.driver.key_up(key)
    }

    /// Press and release in one call.
    pub fn tap(&mut self, key: char) -> HudScanResult<()> {
        self.press(key)?;
        self.release(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::RecordingDriver;

    #[test]
    fn tap_presses_then_releases() {
        let mut keyboard = Keyboard::open(RecordingDriver::at((0, 0)));
        keyboard.tap('r').unwrap();
        assert_eq!(keyboard.driver.keys, vec![('r', true), ('r', false)]);
    }

    #[test]
    fn disabled_keyboard_is_a_no_op() {
        let mut keyboard = Keyboard::open(RecordingDriver::closed());
        assert!(!keyboard.is_enabled());
        keyboard.press('3').unwrap();
        keyboard.tap('q').unwrap();
        assert!(keyboard.driver.keys.is_empty());
    }
}
