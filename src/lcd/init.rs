use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State},
    lcd::{Lcd, LcdError},
    sender::SendCommand,
    state::LcdState,
};

/// Visible area of the display and where each row starts in DDRAM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    columns: u8,
    rows: u8,
    row_offsets: [u8; 4],
}

impl Geometry {
    /// 16 columns, 2 rows
    pub const LCD1602: Geometry = Geometry::new(16, 2);
    /// 20 columns, 4 rows
    pub const LCD2004: Geometry = Geometry::new(20, 4);

    /// `rows` is capped at 4, with the usual HD44780 row start addresses
    ///
    /// `columns` is capped at 80 (a one-line DDRAM) for a single row, and at
    /// 40 (one line of a two-line DDRAM) otherwise.
    pub const fn new(columns: u8, rows: u8) -> Self {
        let max_columns = if rows > 1 { 40 } else { 80 };

        Self {
            columns: if columns > max_columns {
                max_columns
            } else {
                columns
            },
            rows: if rows > 4 { 4 } else { rows },
            row_offsets: [0x00, 0x40, 0x14, 0x54],
        }
    }

    /// Some 4-row panels (16x4 for example) start row 2 and 3 elsewhere
    pub const fn with_row_offsets(mut self, row_offsets: [u8; 4]) -> Self {
        self.row_offsets = row_offsets;
        self
    }

    #[allow(missing_docs)]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    #[allow(missing_docs)]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// DDRAM address of a visible cell, `None` outside the display
    ///
    /// Custom row offsets pointing past DDRAM (`0x7F`) give `None` too.
    pub fn address(&self, row: u8, column: u8) -> Option<u8> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.row_offsets[row as usize]
            .checked_add(column)
            .filter(|&addr| addr <= 0x7F)
    }

    /// Whether every visible cell has its own DDRAM cell in `line` mode
    ///
    /// A one-line display has a single 80 cell line, a two-line display two
    /// lines of 40 that 4-row panels split in halves.
    pub fn fits(&self, line: LineMode) -> bool {
        match line {
            LineMode::OneLine => self.rows <= 1 && self.columns <= 80,
            LineMode::TwoLine => self.columns <= 40,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::LCD1602
    }
}

/// Settling times, in microseconds
///
/// Defaults are HD44780 datasheet values with some margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Wait after power up, before the first instruction
    pub power_on_us: u32,
    /// Wait after most instructions and data writes
    pub instruction_us: u32,
    /// Wait after clear display and return home
    pub clear_us: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_on_us: 40_000,
            instruction_us: 40,
            clear_us: 2_000,
        }
    }
}

/// [`Config`] is the init config of a [`Lcd`]
///
/// Defaults to a 16x2 display on a 4-bit bus, display on, cursor hidden.
pub struct Config {
    state: LcdState,
}

impl Default for Config {
    fn default() -> Self {
        let mut state = LcdState::default();
        state.set_cursor_state(State::Off);
        state.set_cursor_blink(State::Off);
        Self { state }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_data_width(&self) -> DataWidth {
        self.state.get_data_width()
    }

    /// Must match the sender, 4 for [`ParallelSender::new_4pin`](crate::sender::ParallelSender::new_4pin)
    pub fn set_data_width(mut self, data_width: DataWidth) -> Self {
        self.state.set_data_width(data_width);
        self
    }

    pub fn get_line_mode(&self) -> LineMode {
        self.state.get_line_mode()
    }

    pub fn set_line_mode(mut self, line: LineMode) -> Self {
        self.state.set_line_mode(line);
        self
    }

    pub fn get_font(&self) -> Font {
        self.state.get_font()
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.state.set_font(font);
        self
    }

    pub fn get_display_state(&self) -> State {
        self.state.get_display_state()
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.state.set_display_state(display);
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.state.set_cursor_state(cursor);
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.state.get_cursor_blink()
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.state.set_cursor_blink(blink);
        self
    }

    pub fn get_direction(&self) -> MoveDirection {
        self.state.get_direction()
    }

    pub fn set_direction(mut self, dir: MoveDirection) -> Self {
        self.state.set_direction(dir);
        self
    }

    pub fn get_shift_type(&self) -> ShiftType {
        self.state.get_shift_type()
    }

    pub fn set_shift_type(mut self, shift: ShiftType) -> Self {
        self.state.set_shift_type(shift);
        self
    }

    pub fn get_geometry(&self) -> Geometry {
        self.state.get_geometry()
    }

    pub fn set_geometry(mut self, geometry: Geometry) -> Self {
        self.state.set_geometry(geometry);
        self
    }

    pub fn get_timing(&self) -> Timing {
        self.state.get_timing()
    }

    pub fn set_timing(mut self, timing: Timing) -> Self {
        self.state.set_timing(timing);
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and init LCD hardware
    pub fn new(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        config: Config,
    ) -> Result<Self, LcdError<Sender::Error>> {
        let state = config.state;
        let geometry = state.get_geometry();
        if !geometry.fits(state.get_line_mode()) {
            return Err(LcdError::InvalidGeometry(geometry));
        }

        let width = state.get_data_width();
        let function_set =
            CommandSet::FunctionSet(width, state.get_line_mode(), state.get_font());
        let display_on_off = CommandSet::DisplayOnOff {
            display: state.get_display_state(),
            cursor: state.get_cursor_state(),
            cursor_blink: state.get_cursor_blink(),
        };
        let entry_mode = CommandSet::EntryModeSet(state.get_direction(), state.get_shift_type());

        #[cfg(feature = "defmt")]
        defmt::debug!("lcd: init {}", function_set);

        delayer.delay_us(state.get_timing().power_on_us);

        let mut lcd = Lcd {
            sender,
            delayer,
            state,
        };

        // only first 2 or 3 commands are different between 4 pin and 8 pin mode
        match width {
            DataWidth::Bit4 => {
                lcd.execute(CommandSet::HalfFunctionSet)?;
                lcd.execute(function_set)?;
                lcd.execute(function_set)?;
            }
            DataWidth::Bit8 => {
                lcd.execute(function_set)?;
                lcd.execute(function_set)?;
            }
        }

        lcd.execute(display_on_off)?;
        lcd.execute(CommandSet::ClearDisplay)?;
        lcd.execute(entry_mode)?;

        Ok(lcd)
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::lcd::tests::{FakeDelay, RecordingSender};

    #[test]
    fn four_bit_init_sequence() {
        let mut sender = RecordingSender::default();
        let mut delayer = FakeDelay::default();
        {
            let lcd = Lcd::new(&mut sender, &mut delayer, Config::default()).unwrap();
            assert_eq!(lcd.get_address(), 0);
        }

        assert_eq!(sender.instructions(), [0x02, 0x28, 0x28, 0x0C, 0x01, 0x06]);
        assert!(sender.data().is_empty());

        let timing = Timing::default();
        let settle: u64 = sender.sent.iter().map(|&(_, us)| u64::from(us)).sum();
        assert_eq!(
            delayer.total_ns,
            (u64::from(timing.power_on_us) + settle) * 1_000
        );
    }

    #[test]
    fn eight_bit_init_follows_config() {
        let mut sender = RecordingSender::default();
        let mut delayer = FakeDelay::default();
        let config = Config::default()
            .set_data_width(DataWidth::Bit8)
            .set_line_mode(LineMode::OneLine)
            .set_cursor_state(State::On)
            .set_cursor_blink(State::On)
            .set_direction(MoveDirection::RightToLeft);
        {
            let lcd = Lcd::new(&mut sender, &mut delayer, config).unwrap();
            assert_eq!(lcd.get_direction(), MoveDirection::RightToLeft);
        }

        assert_eq!(sender.instructions(), [0x30, 0x30, 0x0F, 0x01, 0x04]);
    }

    #[test]
    fn clear_waits_configured_time() {
        let mut sender = RecordingSender::default();
        let mut delayer = FakeDelay::default();
        let timing = Timing {
            clear_us: 5_000,
            ..Timing::default()
        };
        let config = Config::default().set_timing(timing);
        Lcd::new(&mut sender, &mut delayer, config).unwrap();

        let waits: Vec<u32> = sender.sent.iter().map(|&(_, us)| us).collect();
        assert_eq!(waits, [40, 40, 40, 40, 5_000, 40]);
    }

    #[test]
    fn geometry_addresses() {
        let lcd1602 = Geometry::default();
        assert_eq!(lcd1602.address(0, 0), Some(0x00));
        assert_eq!(lcd1602.address(1, 5), Some(0x45));
        assert_eq!(lcd1602.address(1, 16), None);
        assert_eq!(lcd1602.address(2, 0), None);

        assert_eq!(Geometry::LCD2004.address(2, 0), Some(0x14));
        assert_eq!(Geometry::LCD2004.address(3, 19), Some(0x54 + 19));

        let lcd1604 = Geometry::new(16, 4).with_row_offsets([0x00, 0x40, 0x10, 0x50]);
        assert_eq!(lcd1604.address(3, 1), Some(0x51));
        assert_eq!(Geometry::new(16, 9).rows(), 4);
    }

    #[test]
    fn wide_geometry_is_capped_to_ddram() {
        let wide = Geometry::new(200, 2);
        assert_eq!(wide.columns(), 40);
        assert_eq!(wide.address(1, 39), Some(0x67));
        assert_eq!(wide.address(1, 199), None);

        assert_eq!(Geometry::new(200, 1).columns(), 80);
        assert_eq!(Geometry::new(200, 1).address(0, 79), Some(0x4F));

        let past_ddram = Geometry::new(40, 2).with_row_offsets([0x00, 0x70, 0x14, 0x54]);
        assert_eq!(past_ddram.address(1, 15), Some(0x7F));
        assert_eq!(past_ddram.address(1, 16), None);

        let wrapping = Geometry::new(40, 2).with_row_offsets([0x00, 0xF0, 0x14, 0x54]);
        assert_eq!(wrapping.address(1, 30), None);
    }

    #[test]
    fn line_mode_must_match_geometry() {
        assert!(Geometry::LCD1602.fits(LineMode::TwoLine));
        assert!(!Geometry::LCD1602.fits(LineMode::OneLine));
        assert!(Geometry::new(80, 1).fits(LineMode::OneLine));
        assert!(!Geometry::new(80, 1).fits(LineMode::TwoLine));

        let mut sender = RecordingSender::default();
        let mut delayer = FakeDelay::default();
        let config = Config::default().set_line_mode(LineMode::OneLine);
        assert!(matches!(
            Lcd::new(&mut sender, &mut delayer, config),
            Err(LcdError::InvalidGeometry(g)) if g == Geometry::LCD1602
        ));

        let config = Config::default().set_geometry(Geometry::new(80, 1));
        assert!(matches!(
            Lcd::new(&mut sender, &mut delayer, config),
            Err(LcdError::InvalidGeometry(_))
        ));

        assert!(sender.sent.is_empty());
        assert_eq!(delayer.total_ns, 0);

        let config = Config::default()
            .set_line_mode(LineMode::OneLine)
            .set_geometry(Geometry::new(80, 1));
        assert!(Lcd::new(&mut sender, &mut delayer, config).is_ok());
    }
}
