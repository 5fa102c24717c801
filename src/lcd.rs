//! The [`Lcd`] session handle
//!
//! A [`Lcd`] only exists after [`Lcd::new()`] has run the init sequence, so
//! no command can reach an uninitialized display. The handle mirrors the
//! display's address counter and addressing mode (DDRAM/CGRAM), which lets it
//! put the display back into DDRAM mode by itself after a glyph upload.

use embedded_hal::delay::DelayNs;

use crate::{
    command::{Command, CommandSet, LineMode, MoveDirection, RamType, ShiftType, State},
    sender::SendCommand,
    state::LcdState,
};

mod init;

pub use init::{Config, Geometry, Timing};

/// Number of CGRAM glyph slots
pub const GLYPH_SLOTS: u8 = 8;

/// Pixel rows of one 5x8 glyph, lower 5 bits of each row are used
pub type Glyph = [u8; 8];

/// Errors of LCD operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// The bus failed to drive a pin
    Bus(E),
    /// Position outside the display geometry
    OutOfRange {
        #[allow(missing_docs)]
        row: u8,
        #[allow(missing_docs)]
        column: u8,
    },
    /// CGRAM only has slots 0 to 7
    InvalidGlyphSlot(u8),
    /// A glyph row uses bits above bit 4
    InvalidGlyphRow(u8),
    /// The geometry does not fit the configured line mode
    InvalidGeometry(Geometry),
}

/// An initialized character LCD
pub struct Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Send a typed instruction (or data write) and track its effect
    pub fn execute(&mut self, command: CommandSet) -> Result<(), LcdError<Sender::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("lcd: {}", command);

        self.send_and_track(command.into(), Some(command))
    }

    /// Send one raw instruction byte
    ///
    /// Clear and home wait the long settling time, everything else the
    /// instruction time. Set-address, entry mode and the other instructions
    /// are mirrored in the session just like typed commands.
    pub fn write_command(&mut self, code: u8) -> Result<(), LcdError<Sender::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("lcd: raw instruction {=u8:#x}", code);

        self.send_and_track(Command::instruction(code), CommandSet::decode(code))
    }

    fn send_and_track(
        &mut self,
        command: Command,
        effect: Option<CommandSet>,
    ) -> Result<(), LcdError<Sender::Error>> {
        let timing = self.state.get_timing();
        let settle_us = match effect {
            Some(effect) if effect.is_slow() => timing.clear_us,
            _ => timing.instruction_us,
        };

        self.sender
            .send_and_wait(command, self.delayer, settle_us)
            .map_err(LcdError::Bus)?;

        if let Some(effect) = effect {
            self.state.apply(effect);
        }
        Ok(())
    }

    /// Write one byte to the display at the cursor
    ///
    /// If the last operation left the address counter in CGRAM, the cursor
    /// is first moved back to where it was in DDRAM.
    pub fn write_char(&mut self, byte: u8) -> Result<(), LcdError<Sender::Error>> {
        if self.state.get_ram_type() == RamType::CgRam {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "lcd: back to DDRAM at {=u8:#x}",
                self.state.get_ddram_addr()
            );

            self.execute(CommandSet::SetDDRAM(self.state.get_ddram_addr()))?;
        }

        self.execute(CommandSet::WriteDataToRAM(byte))
    }

    /// Write text at the cursor
    ///
    /// Stops at the end of `text` or at a NUL. ASCII maps to itself (so
    /// `'\u{1}'` shows glyph slot 1), anything else becomes a full block.
    /// Nothing wraps except what the display itself does.
    pub fn write_string(&mut self, text: &str) -> Result<(), LcdError<Sender::Error>> {
        text.chars()
            .take_while(|&char| char != '\0')
            .map(|char| match char.is_ascii() {
                true => char as u8,
                false => 0xFF,
            })
            .try_for_each(|byte| self.write_char(byte))
    }

    /// Write NUL-terminated bytes at the cursor, as produced by [`crate::text`]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), LcdError<Sender::Error>> {
        bytes
            .iter()
            .take_while(|&&byte| byte != 0)
            .try_for_each(|&byte| self.write_char(byte))
    }

    /// Move the cursor, then write text
    pub fn write_string_at(
        &mut self,
        row: u8,
        column: u8,
        text: &str,
    ) -> Result<(), LcdError<Sender::Error>> {
        self.set_cursor_pos(row, column)?;
        self.write_string(text)
    }

    /// Point the cursor at `row`, `column` of the visible area
    pub fn set_cursor_pos(&mut self, row: u8, column: u8) -> Result<(), LcdError<Sender::Error>> {
        let addr = self
            .state
            .get_geometry()
            .address(row, column)
            .ok_or(LcdError::OutOfRange { row, column })?;

        self.execute(CommandSet::SetDDRAM(addr))
    }

    /// Blank the display and home the cursor
    pub fn clear(&mut self) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::ClearDisplay)
    }

    /// Home the cursor and undo display shifts, keeping the content
    pub fn return_home(&mut self) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::ReturnHome)
    }

    /// Store a custom glyph in CGRAM `slot`
    ///
    /// Each row must fit in its lower 5 bits. The controller ignores bits 5
    /// to 7, here a row using them is [`LcdError::InvalidGlyphRow`] and
    /// nothing is sent.
    ///
    /// The display is left addressing CGRAM, the next [`Lcd::write_char`]
    /// (or any cursor move) goes back to DDRAM.
    pub fn upload_custom_glyph(
        &mut self,
        slot: u8,
        glyph: &Glyph,
    ) -> Result<(), LcdError<Sender::Error>> {
        if slot >= GLYPH_SLOTS {
            return Err(LcdError::InvalidGlyphSlot(slot));
        }

        if let Some(&row) = glyph.iter().find(|&&row| row >= 1 << 5) {
            return Err(LcdError::InvalidGlyphRow(row));
        }

        // if DDRAM is write from right to left, then when we change to CGRAM, graph will write from lower to upper
        // we will change it to left to right, to make writing correct
        let direction = self.get_direction();
        if direction == MoveDirection::RightToLeft {
            self.set_direction(MoveDirection::LeftToRight)?;
        }

        self.execute(CommandSet::SetCGRAM(slot << 3))?;
        glyph
            .iter()
            .try_for_each(|&row| self.execute(CommandSet::WriteDataToRAM(row)))?;

        if direction == MoveDirection::RightToLeft {
            self.set_direction(direction)?;
        }

        Ok(())
    }

    /// Show the glyph stored in `slot` at the cursor
    pub fn write_glyph(&mut self, slot: u8) -> Result<(), LcdError<Sender::Error>> {
        if slot >= GLYPH_SLOTS {
            return Err(LcdError::InvalidGlyphSlot(slot));
        }
        self.write_char(slot)
    }

    #[allow(missing_docs)]
    pub fn set_display_state(&mut self, display: State) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::DisplayOnOff {
            display,
            cursor: self.get_cursor_state(),
            cursor_blink: self.get_cursor_blink(),
        })
    }

    #[allow(missing_docs)]
    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    #[allow(missing_docs)]
    pub fn set_cursor_state(&mut self, cursor: State) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::DisplayOnOff {
            display: self.get_display_state(),
            cursor,
            cursor_blink: self.get_cursor_blink(),
        })
    }

    #[allow(missing_docs)]
    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    #[allow(missing_docs)]
    pub fn set_cursor_blink(&mut self, blink: State) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::DisplayOnOff {
            display: self.get_display_state(),
            cursor: self.get_cursor_state(),
            cursor_blink: blink,
        })
    }

    #[allow(missing_docs)]
    pub fn get_cursor_blink(&self) -> State {
        self.state.get_cursor_blink()
    }

    #[allow(missing_docs)]
    pub fn set_direction(&mut self, dir: MoveDirection) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::EntryModeSet(dir, self.get_shift_type()))
    }

    #[allow(missing_docs)]
    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    #[allow(missing_docs)]
    pub fn set_shift_type(&mut self, shift: ShiftType) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::EntryModeSet(self.get_direction(), shift))
    }

    #[allow(missing_docs)]
    pub fn get_shift_type(&self) -> ShiftType {
        self.state.get_shift_type()
    }

    /// Move the cursor, or scroll the whole display, by one cell
    pub fn shift_cursor_or_display(
        &mut self,
        shift_type: ShiftType,
        dir: MoveDirection,
    ) -> Result<(), LcdError<Sender::Error>> {
        self.execute(CommandSet::CursorOrDisplayShift(shift_type, dir))
    }

    #[allow(missing_docs)]
    pub fn get_line_mode(&self) -> LineMode {
        self.state.get_line_mode()
    }

    /// Memory the address counter currently points into
    pub fn get_ram_type(&self) -> RamType {
        self.state.get_ram_type()
    }

    /// Current address counter value, in DDRAM or CGRAM
    pub fn get_address(&self) -> u8 {
        match self.state.get_ram_type() {
            RamType::DdRam => self.state.get_ddram_addr(),
            RamType::CgRam => self.state.get_cgram_addr(),
        }
    }

    #[allow(missing_docs)]
    pub fn get_geometry(&self) -> Geometry {
        self.state.get_geometry()
    }

    /// Wait for specified milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    /// Wait for specified microseconds
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us)
    }
}
