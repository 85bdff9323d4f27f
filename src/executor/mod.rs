//! Input-side collaborators: the low-level driver seam and the mouse and
//! keyboard facades built on top of it.

pub mod driver;
pub mod keyboard;
pub mod mouse;

#[cfg(test)]
pub(crate) mod testing {
    use crate::errors::HudScanResult;
    use crate::executor::driver::{CursorProvider, InputDriver, MouseButton};

    /// Driver double recording every call. The cursor stays wherever the
    /// test pins it, which models an external observer that never moves it.
    pub(crate) struct RecordingDriver {
        pub(crate) open_ok: bool,
        pub(crate) cursor: (i32, i32),
        pub(crate) moves: Vec<(i32, i32, bool)>,
        pub(crate) buttons: Vec<(MouseButton, bool)>,
        pub(crate) keys: Vec<(char, bool)>,
    }

    impl RecordingDriver {
        pub(crate) fn at(cursor: (i32, i32)) -> Self {
            RecordingDriver {
                open_ok: true,
                cursor,
                moves: Vec::new(),
                buttons: Vec::new(),
                keys: Vec::new(),
            }
        }

        pub(crate) fn closed() -> Self {
            RecordingDriver {
                open_ok: false,
                ..Self::at((0, 0))
            }
        }
    }

    impl InputDriver for RecordingDriver {
        fn open(&mut self) -> bool {
            self.open_ok
        }

        fn move_relative(&mut self, dx: i32, dy: i32, flag: bool) -> HudScanResult<()> {
            self.moves.push((dx, dy, flag));
            Ok(())
        }

        fn button_down(&mut self, button: MouseButton) -> HudScanResult<()> {
            self.buttons.push((button, true));
            Ok(())
        }

        fn button_up(&mut self, button: MouseButton) -> HudScanResult<()> {
            self.buttons.push((button, false));
            Ok(())
        }

        fn key_down(&mut self, key: char) -> HudScanResult<()> {
            self.keys.push((key, true));
            Ok(())
        }

        fn key_up(&mut self, key: char) -> HudScanResult<()> {
            self.keys.push((key, false));
            Ok(())
        }
    }

    impl CursorProvider for RecordingDriver {
        fn position(&self) -> HudScanResult<(i32, i32)> {
            Ok(self.cursor)
        }
    }
}
