//! Eight-button pad readable through `P1` (`$FF00`).
//!
//! The pad is wired as a 2x4 matrix. The CPU selects a row by clearing bit 4
//! (directions) or bit 5 (buttons) and reads back the low nibble, active-low.

use bitflags::bitflags;

/// Physical buttons on the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

bitflags! {
    /// Set bits are pressed buttons. The low nibble holds the direction row
    /// and the high nibble the action row, both in P1 bit order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct JoypadState: u8 {
        const RIGHT  = 0b0000_0001;
        const LEFT   = 0b0000_0010;
        const UP     = 0b0000_0100;
        const DOWN   = 0b0000_1000;
        const A      = 0b0001_0000;
        const B      = 0b0010_0000;
        const SELECT = 0b0100_0000;
        const START  = 0b1000_0000;
    }
}

/// P1 bit that selects the direction row when cleared.
pub const SELECT_DIRECTIONS: u8 = 0x10;
/// P1 bit that selects the action button row when cleared.
pub const SELECT_BUTTONS: u8 = 0x20;

impl From<Button> for JoypadState {
    fn from(button: Button) -> Self {
        match button {
            Button::Right => JoypadState::RIGHT,
            Button::Left => JoypadState::LEFT,
            Button::Up => JoypadState::UP,
            Button::Down => JoypadState::DOWN,
            Button::A => JoypadState::A,
            Button::B => JoypadState::B,
            Button::Select => JoypadState::SELECT,
            Button::Start => JoypadState::START,
        }
    }
}

impl JoypadState {
    /// Update a button's pressed state.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.set(button.into(), pressed);
    }

    /// Direction row as the active-low nibble P1 reports.
    #[inline]
    pub fn direction_nibble(&self) -> u8 {
        !self.bits() & 0x0F
    }

    /// Action row as the active-low nibble P1 reports.
    #[inline]
    pub fn button_nibble(&self) -> u8 {
        !(self.bits() >> 4) & 0x0F
    }

    /// Value P1 reads back after `select` was written to it.
    ///
    /// Bits 6-7 always read as set; bits 4-5 echo the selection.
    pub fn latch(&self, select: u8) -> u8 {
        let select = select & (SELECT_DIRECTIONS | SELECT_BUTTONS);
        let mut nibble = 0x0F;
        if select & SELECT_DIRECTIONS == 0 {
            nibble &= self.direction_nibble();
        }
        if select & SELECT_BUTTONS == 0 {
            nibble &= self.button_nibble();
        }
        0xC0 | select | nibble
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_selected_reads_all_released() {
        let pad = JoypadState::all();
        assert_eq!(pad.latch(0x30), 0xFF);
    }

    #[test]
    fn rows_are_active_low() {
        let mut pad = JoypadState::empty();
        pad.set_button(Button::Left, true);
        pad.set_button(Button::Start, true);
        assert_eq!(pad.latch(0x20), 0xE0 | 0x0D);
        assert_eq!(pad.latch(0x10), 0xD0 | 0x07);
        // Both rows selected: nibbles are ANDed.
        assert_eq!(pad.latch(0x00), 0xC0 | 0x05);
    }

    #[test]
    fn releasing_clears_the_bit() {
        let mut pad = JoypadState::empty();
        pad.set_button(Button::A, true);
        pad.set_button(Button::A, false);
        assert!(pad.is_empty());
    }
}
