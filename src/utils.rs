//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

/// Highest valid bit offset of an 8-bit register
pub const MAX_BIT: u8 = 7;

/// Simple bit ops
///
/// Bit offsets must be in `0..=7`, range checks belong to the caller
/// (see [`crate::register`] for the checked versions).
pub trait BitOps {
    #[allow(missing_docs)]
    fn set_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn clear_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn toggle_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn check_bit(&self, pos: u8) -> BitState;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= MAX_BIT, "bit offset larger than 7");
        *self |= 1u8 << pos;
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= MAX_BIT, "bit offset larger than 7");
        *self &= !(1u8 << pos);
        *self
    }

    fn toggle_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= MAX_BIT, "bit offset larger than 7");
        *self ^= 1u8 << pos;
        *self
    }

    fn check_bit(&self, pos: u8) -> BitState {
        debug_assert!(pos <= MAX_BIT, "bit offset larger than 7");

        match (*self >> pos) & 1 == 1 {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}
