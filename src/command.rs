//! Instruction set of HD44780-compatible character LCDs
//!
//! [`CommandSet`] names each instruction with typed arguments,
//! [`Command`] is what a [`sender`](crate::sender) puts on the bus.

use crate::utils::BitOps;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum CommandSet {
    ClearDisplay,
    ReturnHome,
    EntryModeSet(MoveDirection, ShiftType),
    DisplayOnOff {
        display: State,
        cursor: State,
        cursor_blink: State,
    },
    CursorOrDisplayShift(ShiftType, MoveDirection),
    // this is not a command from datasheet,
    // it's the first (half) command of 4 pin mode
    // we name it, to make things tidy
    HalfFunctionSet,
    FunctionSet(DataWidth, LineMode, Font),
    SetCGRAM(u8),
    SetDDRAM(u8),
    WriteDataToRAM(u8),
}

/// Direction the address counter moves after each data write
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum MoveDirection {
    RightToLeft,
    #[default]
    LeftToRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum ShiftType {
    #[default]
    CursorOnly,
    CursorAndDisplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum State {
    Off,
    #[default]
    On,
}

/// Width of the data bus between MCU and LCD
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum DataWidth {
    #[default]
    Bit4,
    Bit8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Font {
    #[default]
    Font5x8,
    Font5x11,
}

/// The type of memory the address counter points into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RamType {
    /// Display Data RAM
    #[default]
    DdRam,
    /// Character Generator RAM
    CgRam,
}

/// RS line level of a transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    /// RS low, instruction register
    Command,
    /// RS high, data register
    Data,
}

/// Payload of a transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bits {
    /// a lone nibble, only sent while switching into 4-bit mode
    Bit4(u8),
    /// a full byte, sent as two nibbles on a 4-bit bus
    Bit8(u8),
}

/// One write on the LCD bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    rs: RegisterSelection,
    data: Bits,
}

impl Command {
    #[allow(missing_docs)]
    pub fn new(rs: RegisterSelection, data: Bits) -> Self {
        Self { rs, data }
    }

    /// A raw instruction byte
    pub fn instruction(code: u8) -> Self {
        Self::new(RegisterSelection::Command, Bits::Bit8(code))
    }

    /// A raw data byte
    pub fn data(byte: u8) -> Self {
        Self::new(RegisterSelection::Data, Bits::Bit8(byte))
    }

    #[allow(missing_docs)]
    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    #[allow(missing_docs)]
    pub fn get_data(&self) -> Bits {
        self.data
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => Self::instruction(0b0000_0001),

            CommandSet::ReturnHome => Self::instruction(0b0000_0010),

            CommandSet::EntryModeSet(dir, st) => {
                let mut raw_bits: u8 = 0b0000_0100;

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(1),
                    MoveDirection::LeftToRight => raw_bits.set_bit(1),
                };

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(0),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(0),
                };

                Self::instruction(raw_bits)
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits: u8 = 0b0000_1000;

                match display {
                    State::Off => raw_bits.clear_bit(2),
                    State::On => raw_bits.set_bit(2),
                };
                match cursor {
                    State::Off => raw_bits.clear_bit(1),
                    State::On => raw_bits.set_bit(1),
                };
                match cursor_blink {
                    State::Off => raw_bits.clear_bit(0),
                    State::On => raw_bits.set_bit(0),
                };

                Self::instruction(raw_bits)
            }

            CommandSet::CursorOrDisplayShift(st, dir) => {
                let mut raw_bits: u8 = 0b0001_0000;

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(3),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(3),
                };

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(2),
                    MoveDirection::LeftToRight => raw_bits.set_bit(2),
                };

                Self::instruction(raw_bits)
            }

            CommandSet::HalfFunctionSet => {
                Self::new(RegisterSelection::Command, Bits::Bit4(0b0010))
            }

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits: u8 = 0b0010_0000;

                match width {
                    DataWidth::Bit4 => raw_bits.clear_bit(4),
                    DataWidth::Bit8 => raw_bits.set_bit(4),
                };

                match line {
                    LineMode::OneLine => raw_bits.clear_bit(3),
                    LineMode::TwoLine => raw_bits.set_bit(3),
                };

                match font {
                    Font::Font5x8 => raw_bits.clear_bit(2),
                    Font::Font5x11 => raw_bits.set_bit(2),
                };

                Self::instruction(raw_bits)
            }

            // addresses wider than the field are truncated, callers check ranges
            CommandSet::SetCGRAM(addr) => Self::instruction(0b0100_0000 | (addr & 0b0011_1111)),

            CommandSet::SetDDRAM(addr) => Self::instruction(0b1000_0000 | (addr & 0b0111_1111)),

            CommandSet::WriteDataToRAM(data) => Self::data(data),
        }
    }
}

impl CommandSet {
    /// Recognize a raw instruction byte
    ///
    /// `None` for `0x00`, which is not an instruction.
    pub fn decode(code: u8) -> Option<Self> {
        let flag = |bit: u8| match (code >> bit) & 1 {
            1 => State::On,
            _ => State::Off,
        };
        let direction = |bit: u8| match (code >> bit) & 1 {
            1 => MoveDirection::LeftToRight,
            _ => MoveDirection::RightToLeft,
        };
        let shift = |bit: u8| match (code >> bit) & 1 {
            1 => ShiftType::CursorAndDisplay,
            _ => ShiftType::CursorOnly,
        };

        let command = match code.leading_zeros() {
            0 => CommandSet::SetDDRAM(code & 0b0111_1111),
            1 => CommandSet::SetCGRAM(code & 0b0011_1111),
            2 => CommandSet::FunctionSet(
                match (code >> 4) & 1 {
                    1 => DataWidth::Bit8,
                    _ => DataWidth::Bit4,
                },
                match (code >> 3) & 1 {
                    1 => LineMode::TwoLine,
                    _ => LineMode::OneLine,
                },
                match (code >> 2) & 1 {
                    1 => Font::Font5x11,
                    _ => Font::Font5x8,
                },
            ),
            3 => CommandSet::CursorOrDisplayShift(shift(3), direction(2)),
            4 => CommandSet::DisplayOnOff {
                display: flag(2),
                cursor: flag(1),
                cursor_blink: flag(0),
            },
            5 => CommandSet::EntryModeSet(direction(1), shift(0)),
            6 => CommandSet::ReturnHome,
            7 => CommandSet::ClearDisplay,
            _ => return None,
        };

        Some(command)
    }

    /// Clear and home need far longer than other instructions
    pub fn is_slow(&self) -> bool {
        matches!(self, CommandSet::ClearDisplay | CommandSet::ReturnHome)
    }
}
