use crate::{
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, RamType, ShiftType, State},
    lcd::{Geometry, Timing},
};

/// Everything the driver knows about the display, since the LCD can't be read back
#[derive(Clone, Debug, Default)]
pub(crate) struct LcdState {
    data_width: DataWidth,
    line: LineMode,
    font: Font,
    display_on: State,
    cursor_on: State,
    cursor_blink: State,
    direction: MoveDirection,
    shift_type: ShiftType,
    ram_type: RamType,
    // last DDRAM address, kept while the address counter is in CGRAM
    ddram_addr: u8,
    cgram_addr: u8,
    geometry: Geometry,
    timing: Timing,
}

impl LcdState {
    pub(crate) fn get_data_width(&self) -> DataWidth {
        self.data_width
    }

    pub(crate) fn set_data_width(&mut self, data_width: DataWidth) {
        self.data_width = data_width;
    }

    pub(crate) fn get_line_mode(&self) -> LineMode {
        self.line
    }

    pub(crate) fn set_line_mode(&mut self, line: LineMode) {
        self.line = line;
    }

    /// DDRAM cells per line
    pub(crate) fn get_line_capacity(&self) -> u8 {
        match self.get_line_mode() {
            LineMode::OneLine => 80,
            LineMode::TwoLine => 40,
        }
    }

    pub(crate) fn get_font(&self) -> Font {
        self.font
    }

    pub(crate) fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub(crate) fn get_display_state(&self) -> State {
        self.display_on
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        self.display_on = display;
    }

    pub(crate) fn get_cursor_state(&self) -> State {
        self.cursor_on
    }

    pub(crate) fn set_cursor_state(&mut self, cursor: State) {
        self.cursor_on = cursor;
    }

    pub(crate) fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub(crate) fn set_cursor_blink(&mut self, blink: State) {
        self.cursor_blink = blink;
    }

    pub(crate) fn get_direction(&self) -> MoveDirection {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, dir: MoveDirection) {
        self.direction = dir;
    }

    pub(crate) fn get_shift_type(&self) -> ShiftType {
        self.shift_type
    }

    pub(crate) fn set_shift_type(&mut self, shift: ShiftType) {
        self.shift_type = shift;
    }

    pub(crate) fn get_ram_type(&self) -> RamType {
        self.ram_type
    }

    pub(crate) fn get_ddram_addr(&self) -> u8 {
        self.ddram_addr
    }

    pub(crate) fn set_ddram_addr(&mut self, addr: u8) {
        self.ram_type = RamType::DdRam;
        self.ddram_addr = addr & 0b0111_1111;
    }

    pub(crate) fn get_cgram_addr(&self) -> u8 {
        self.cgram_addr
    }

    pub(crate) fn set_cgram_addr(&mut self, addr: u8) {
        self.ram_type = RamType::CgRam;
        self.cgram_addr = addr & 0b0011_1111;
    }

    pub(crate) fn get_geometry(&self) -> Geometry {
        self.geometry
    }

    pub(crate) fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub(crate) fn get_timing(&self) -> Timing {
        self.timing
    }

    pub(crate) fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    /// Mirror what the LCD does when it executes `command`
    pub(crate) fn apply(&mut self, command: CommandSet) {
        match command {
            CommandSet::ClearDisplay => {
                // clear also forces I/D back to increment
                self.set_ddram_addr(0);
                self.direction = MoveDirection::LeftToRight;
            }
            CommandSet::ReturnHome => self.set_ddram_addr(0),
            CommandSet::EntryModeSet(dir, shift) => {
                self.direction = dir;
                self.shift_type = shift;
            }
            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                self.display_on = display;
                self.cursor_on = cursor;
                self.cursor_blink = cursor_blink;
            }
            CommandSet::CursorOrDisplayShift(ShiftType::CursorOnly, dir) => {
                let addr = self.step_ddram_addr(self.ddram_addr, dir);
                self.set_ddram_addr(addr);
            }
            // display shift leaves the address counter alone
            CommandSet::CursorOrDisplayShift(ShiftType::CursorAndDisplay, _) => {}
            CommandSet::HalfFunctionSet => {}
            CommandSet::FunctionSet(width, line, font) => {
                self.data_width = width;
                self.line = line;
                self.font = font;
            }
            CommandSet::SetCGRAM(addr) => self.set_cgram_addr(addr),
            CommandSet::SetDDRAM(addr) => self.set_ddram_addr(addr),
            CommandSet::WriteDataToRAM(_) => self.advance_address(),
        }
    }

    /// Mimic the address counter after a data write
    pub(crate) fn advance_address(&mut self) {
        match self.ram_type {
            RamType::CgRam => {
                let next = match self.direction {
                    MoveDirection::LeftToRight => self.cgram_addr.wrapping_add(1),
                    MoveDirection::RightToLeft => self.cgram_addr.wrapping_sub(1),
                };
                self.cgram_addr = next & 0b0011_1111;
            }
            RamType::DdRam => {
                self.ddram_addr = self.step_ddram_addr(self.ddram_addr, self.direction);
            }
        }
    }

    // since RAM of HD44780 is looped, we need to mimic it
    fn step_ddram_addr(&self, addr: u8, dir: MoveDirection) -> u8 {
        let last = self.get_line_capacity() - 1;

        match (self.get_line_mode(), dir) {
            (LineMode::OneLine, MoveDirection::LeftToRight) => {
                if addr >= last {
                    0
                } else {
                    addr + 1
                }
            }
            (LineMode::OneLine, MoveDirection::RightToLeft) => {
                if addr == 0 || addr > last {
                    last
                } else {
                    addr - 1
                }
            }
            // line 1 sits at 0x00..=0x27, line 2 at 0x40..=0x67
            (LineMode::TwoLine, MoveDirection::LeftToRight) => match addr {
                a if a == last => 0x40,
                a if a >= 0x40 + last => 0x00,
                a => a + 1,
            },
            (LineMode::TwoLine, MoveDirection::RightToLeft) => match addr {
                0x00 => 0x40 + last,
                0x40 => last,
                a => a - 1,
            },
        }
    }
}
