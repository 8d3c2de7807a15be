use cartlink_core::ButtonInput;

const SELECT_DIRECTIONS: u8 = 0x10;
const SELECT_BUTTONS: u8 = 0x20;

/// Game Boy P1 (`0xFF00`) joypad state.
///
/// Bits are active-low: a held button reads as `0`. Bit 4 low selects the
/// d-pad, bit 5 low selects the action buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoypadState {
    held: u8,
}

impl JoypadState {
    fn mask(button: ButtonInput) -> u8 {
        match button {
            ButtonInput::Right => 0x01,
            ButtonInput::Left => 0x02,
            ButtonInput::Up => 0x04,
            ButtonInput::Down => 0x08,
            ButtonInput::A => 0x10,
            ButtonInput::B => 0x20,
            ButtonInput::Select => 0x40,
            ButtonInput::Start => 0x80,
        }
    }

    pub fn press(&mut self, button: ButtonInput) {
        self.held |= Self::mask(button);
    }

    pub fn release(&mut self, button: ButtonInput) {
        self.held &= !Self::mask(button);
    }

    pub fn is_held(&self, button: ButtonInput) -> bool {
        self.held & Self::mask(button) != 0
    }

    /// Value the CPU reads from P1 after writing `select`.
    pub fn read_p1(&self, select: u8) -> u8 {
        let mut low = 0x0F;
        if select & SELECT_DIRECTIONS == 0 {
            low &= !(self.held & 0x0F);
        }
        if select & SELECT_BUTTONS == 0 {
            low &= !(self.held >> 4);
        }
        0xC0 | (select & 0x30) | low
    }
}
