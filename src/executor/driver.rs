use enigo::{Coordinate, Direction, Enigo, Key, Settings};
use enigo::{Keyboard as _, Mouse as _};

use crate::errors::{HudScanError, HudScanResult};

/// Mouse buttons by vendor driver code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left = 1,
    Middle = 2,
    Right = 3,
    SideDown = 4,
    SideUp = 5,
    Dpi = 6,
}

impl MouseButton {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Low-level input driver, mirroring the vendor driver entry points:
/// `open` reports availability once at startup, movement is relative, and
/// buttons and keys are separate press/release events.
///
/// Key codes are characters; `'a'..='z'` and `'0'..='9'` are supported by
/// every backend.
pub trait InputDriver {
    fn open(&mut self) -> bool;
    /// `flag` is forwarded as the vendor driver's trailing argument; the
    /// stock driver expects `true`.
    fn move_relative(&mut self, dx: i32, dy: i32, flag: bool) -> HudScanResult<()>;
    fn button_down(&mut self, button: MouseButton) -> HudScanResult<()>;
    fn button_up(&mut self, button: MouseButton) -> HudScanResult<()>;
    fn key_down(&mut self, key: char) -> HudScanResult<()>;
    fn key_up(&mut self, key: char) -> HudScanResult<()>;
}

/// OS cursor position query.
pub trait CursorProvider {
    fn position(&self) -> HudScanResult<(i32, i32)>;
}

/// Live driver over `enigo`. Construction is cheap; the connection to the
/// platform input stack is made in `open`.
#[derive(Default)]
pub struct EnigoDriver {
    enigo: Option<Enigo>,
}

impl EnigoDriver {
    pub fn new() -> Self {
        EnigoDriver { enigo: None }
    }

    fn handle(&mut self) -> HudScanResult<&mut Enigo> {
        self.enigo
            .as_mut()
            .ok_or_else(|| HudScanError::Input("input driver not open".into()))
    }
}

fn input_err(e: impl std::fmt::Display) -> HudScanError {
    HudScanError::Input(e.to_string())
}

fn map_button(button: MouseButton) -> Option<enigo::Button> {
    match button {
        MouseButton::Left => Some(enigo::Button::Left),
        MouseButton::Middle => Some(enigo::Button::Middle),
        MouseButton::Right => Some(enigo::Button::Right),
        MouseButton::SideDown => Some(enigo::Button::Back),
        MouseButton::SideUp => Some(enigo::Button::Forward),
        // No cross-platform equivalent for the DPI button.
        MouseButton::Dpi => None,
    }
}

impl InputDriver for EnigoDriver {
    fn open(&mut self) -> bool {
        if self.enigo.is_some() {
            return true;
        }
        match Enigo::new(&Settings::default()) {
            Ok(enigo) => {
                self.enigo = Some(enigo);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "input driver failed to open");
                false
            }
        }
    }

    fn move_relative(&mut self, dx: i32, dy: i32, _flag: bool) -> HudScanResult<()> {
        self.handle()?
            .move_mouse(dx, dy, Coordinate::Rel)
            .map_err(input_err)
    }

    fn button_down(&mut self, button: MouseButton) -> HudScanResult<()> {
        match map_button(button) {
            Some(mapped) => self
                .handle()?
                .button(mapped, Direction::Press)
                .map_err(input_err),
            None => {
                tracing::debug!(code = button.code(), "unmapped button ignored");
                Ok(())
            }
        }
    }

    fn button_up(&mut self, button: MouseButton) -> HudScanResult<()> {
        match map_button(button) {
            Some(mapped) => self
                .handle()?
                .button(mapped, Direction::Release)
                .map_err(input_err),
            None => {
                tracing::debug!(code = button.code(), "unmapped button ignored");
                Ok(())
            }
        }
    }

    fn key_down(&mut self, key: char) -> HudScanResult<()> {
        self.handle()?
            .key(Key::Unicode(key), Direction::Press)
            .map_err(input_err)
    }

    fn key_up(&mut self, key: char) -> HudScanResult<()> {
        self.handle()?
            .key(Key::Unicode(key), Direction::Release)
            .map_err(input_err)
    }
}

impl CursorProvider for EnigoDriver {
    fn position(&self) -> HudScanResult<(i32, i32)> {
        let enigo = self
            .enigo
            .as_ref()
            .ok_or_else(|| HudScanError::Input("input driver not open".into()))?;
        enigo.location().map_err(input_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_codes_match_vendor_numbering() {
        assert_eq!(MouseButton::Left.code(), 1);
        assert_eq!(MouseButton::Middle.code(), 2);
        assert_eq!(MouseButton::Right.code(), 3);
        assert_eq!(MouseButton::SideDown.code(), 4);
        assert_eq!(MouseButton::SideUp.code(), 5);
        assert_eq!(MouseButton::Dpi.code(), 6);
    }

    #[test]
    fn dpi_button_has_no_mapping() {
        assert!(map_button(MouseButton::Dpi).is_none());
        assert!(map_button(MouseButton::SideUp).is_some());
    }
}
