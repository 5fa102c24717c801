//! Register bit primitives
//!
//! An 8-bit register is anything implementing [`Register`]: a memory-mapped
//! cell ([`Mmio`]) on target, or a plain [`Cell<u8>`] when simulating on the
//! host. Nothing here owns a register, several components may point at the
//! same one.

use core::cell::Cell;

use crate::utils::{BitOps, BitState, MAX_BIT};

/// Errors of the digital I/O layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DioError {
    /// Bit (or pin) index outside `0..=7`
    BitOutOfRange(u8),
}

/// An 8-bit hardware register
///
/// Access goes through `&self`: registers are shared, volatile cells.
pub trait Register {
    /// Read the current register value
    fn read(&self) -> u8;

    /// Overwrite the register value
    fn write(&self, value: u8);

    /// Read-modify-write
    fn modify<F: FnOnce(u8) -> u8>(&self, f: F) {
        self.write(f(self.read()));
    }
}

impl<R: Register + ?Sized> Register for &R {
    fn read(&self) -> u8 {
        (**self).read()
    }

    fn write(&self, value: u8) {
        (**self).write(value)
    }
}

impl Register for Cell<u8> {
    fn read(&self) -> u8 {
        self.get()
    }

    fn write(&self, value: u8) {
        self.set(value)
    }
}

/// A memory-mapped 8-bit register at a fixed address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mmio {
    addr: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `addr` must be the data-space address of a readable and writable 8-bit
    /// I/O register of the running microcontroller.
    pub const unsafe fn new(addr: usize) -> Self {
        Self { addr }
    }

    #[allow(missing_docs)]
    pub const fn address(&self) -> usize {
        self.addr
    }
}

impl Register for Mmio {
    fn read(&self) -> u8 {
        // SAFETY: `Mmio::new` requires `addr` to be a valid register address
        unsafe { core::ptr::read_volatile(self.addr as *const u8) }
    }

    fn write(&self, value: u8) {
        // SAFETY: see `read`
        unsafe { core::ptr::write_volatile(self.addr as *mut u8, value) }
    }
}

fn check_bit_index(bit: u8) -> Result<u8, DioError> {
    match bit <= MAX_BIT {
        true => Ok(bit),
        false => Err(DioError::BitOutOfRange(bit)),
    }
}

/// Set one bit of `register`
pub fn set_bit(register: &impl Register, bit: u8) -> Result<(), DioError> {
    let bit = check_bit_index(bit)?;
    register.modify(|mut raw| raw.set_bit(bit));
    Ok(())
}

/// Clear one bit of `register`
pub fn reset_bit(register: &impl Register, bit: u8) -> Result<(), DioError> {
    let bit = check_bit_index(bit)?;
    register.modify(|mut raw| raw.clear_bit(bit));
    Ok(())
}

/// Invert one bit of `register`
pub fn toggle_bit(register: &impl Register, bit: u8) -> Result<(), DioError> {
    let bit = check_bit_index(bit)?;
    register.modify(|mut raw| raw.toggle_bit(bit));
    Ok(())
}

/// Read one bit of `register`
pub fn read_bit(register: &impl Register, bit: u8) -> Result<BitState, DioError> {
    let bit = check_bit_index(bit)?;
    Ok(register.read().check_bit(bit))
}

/// Handle to a single bit of a register
///
/// The bit index is checked once, on construction.
#[derive(Debug)]
pub struct RegisterBit<'a, R: Register> {
    register: &'a R,
    bit: u8,
}

impl<R: Register> Clone for RegisterBit<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Register> Copy for RegisterBit<'_, R> {}

impl<'a, R: Register> RegisterBit<'a, R> {
    /// Refer to `bit` of `register`
    pub fn new(register: &'a R, bit: u8) -> Result<Self, DioError> {
        Ok(Self {
            register,
            bit: check_bit_index(bit)?,
        })
    }

    #[allow(missing_docs)]
    pub fn bit(&self) -> u8 {
        self.bit
    }

    #[allow(missing_docs)]
    pub fn set(&self) {
        self.register.modify(|mut raw| raw.set_bit(self.bit));
    }

    #[allow(missing_docs)]
    pub fn reset(&self) {
        self.register.modify(|mut raw| raw.clear_bit(self.bit));
    }

    #[allow(missing_docs)]
    pub fn toggle(&self) {
        self.register.modify(|mut raw| raw.toggle_bit(self.bit));
    }

    #[allow(missing_docs)]
    pub fn read(&self) -> BitState {
        self.register.read().check_bit(self.bit)
    }
}
