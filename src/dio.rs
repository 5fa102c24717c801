//! Digital I/O over a port's register triple
//!
//! An AVR-style port is three registers: a direction register (`DDRx`), an
//! output register (`PORTx`) and an input register (`PINx`). Pin `n` of the
//! port is bit `n` of each of them.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

pub use embedded_hal::digital::PinState;

pub use crate::register::DioError;
use crate::{
    register::{read_bit, reset_bit, set_bit, Mmio, Register},
    utils::{BitOps, BitState, MAX_BIT},
};

/// Direction of a pin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// `DDRx` bit cleared
    #[default]
    Input,
    /// `DDRx` bit set
    Output,
}

/// Data-space addresses of one port's registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortAddresses {
    /// direction register
    pub ddr: usize,
    /// output register
    pub port: usize,
    /// input register
    pub pin: usize,
}

/// Register map of the ATmega328P
pub mod atmega328p {
    use super::PortAddresses;

    #[allow(missing_docs)]
    pub const PORT_B: PortAddresses = PortAddresses {
        ddr: 0x24,
        port: 0x25,
        pin: 0x23,
    };

    #[allow(missing_docs)]
    pub const PORT_C: PortAddresses = PortAddresses {
        ddr: 0x27,
        port: 0x28,
        pin: 0x26,
    };

    #[allow(missing_docs)]
    pub const PORT_D: PortAddresses = PortAddresses {
        ddr: 0x2A,
        port: 0x2B,
        pin: 0x29,
    };
}

/// Configure `pin` as input or output in a direction register
pub fn set_pin_direction(
    ddr: &impl Register,
    pin: u8,
    direction: Direction,
) -> Result<(), DioError> {
    match direction {
        Direction::Input => reset_bit(ddr, pin),
        Direction::Output => set_bit(ddr, pin),
    }
}

/// Drive `pin` of an output register
pub fn set_pin_state(port: &impl Register, pin: u8, state: PinState) -> Result<(), DioError> {
    match state {
        PinState::Low => reset_bit(port, pin),
        PinState::High => set_bit(port, pin),
    }
}

/// Sample `pin` of a register
pub fn get_pin_state(register: &impl Register, pin: u8) -> Result<PinState, DioError> {
    Ok(match read_bit(register, pin)? {
        BitState::Set => PinState::High,
        BitState::Clear => PinState::Low,
    })
}

/// The three registers of one I/O port
#[derive(Debug)]
pub struct Port<R: Register> {
    ddr: R,
    port: R,
    pin: R,
}

impl<R: Register> Port<R> {
    #[allow(missing_docs)]
    pub const fn new(ddr: R, port: R, pin: R) -> Self {
        Self { ddr, port, pin }
    }

    /// Direction register
    pub fn ddr(&self) -> &R {
        &self.ddr
    }

    /// Output register
    pub fn port(&self) -> &R {
        &self.port
    }

    /// Input register
    pub fn pin(&self) -> &R {
        &self.pin
    }

    #[allow(missing_docs)]
    pub fn set_direction(&self, pin: u8, direction: Direction) -> Result<(), DioError> {
        set_pin_direction(&self.ddr, pin, direction)
    }

    #[allow(missing_docs)]
    pub fn set_state(&self, pin: u8, state: PinState) -> Result<(), DioError> {
        set_pin_state(&self.port, pin, state)
    }

    /// Sample the input register
    pub fn get_state(&self, pin: u8) -> Result<PinState, DioError> {
        get_pin_state(&self.pin, pin)
    }
}

impl Port<Mmio> {
    /// # Safety
    ///
    /// `addresses` must describe a port of the running microcontroller.
    pub const unsafe fn mmio(addresses: PortAddresses) -> Self {
        Self::new(
            Mmio::new(addresses.ddr),
            Mmio::new(addresses.port),
            Mmio::new(addresses.pin),
        )
    }
}

/// One pin of a [`Port`], usable wherever an `embedded-hal` pin is expected
#[derive(Debug)]
pub struct DioPin<'a, R: Register> {
    port: &'a Port<R>,
    pin: u8,
}

impl<'a, R: Register> DioPin<'a, R> {
    /// Configure `pin` as an output, starting low
    pub fn output(port: &'a Port<R>, pin: u8) -> Result<Self, DioError> {
        port.set_state(pin, PinState::Low)?;
        port.set_direction(pin, Direction::Output)?;
        Ok(Self { port, pin })
    }

    /// Configure `pin` as an input (output register left untouched)
    pub fn input(port: &'a Port<R>, pin: u8) -> Result<Self, DioError> {
        port.set_direction(pin, Direction::Input)?;
        Ok(Self { port, pin })
    }

    #[allow(missing_docs)]
    pub fn pin_number(&self) -> u8 {
        self.pin
    }

    // pin is checked on construction, so from here on bit ops cannot fail
    fn write(&self, state: PinState) {
        debug_assert!(self.pin <= MAX_BIT);
        self.port.port().modify(|mut raw| match state {
            PinState::Low => raw.clear_bit(self.pin),
            PinState::High => raw.set_bit(self.pin),
        });
    }
}

impl<R: Register> ErrorType for DioPin<'_, R> {
    type Error = Infallible;
}

impl<R: Register> OutputPin for DioPin<'_, R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High);
        Ok(())
    }
}

impl<R: Register> StatefulOutputPin for DioPin<'_, R> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.port().read().check_bit(self.pin) == BitState::Set)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.port().read().check_bit(self.pin) == BitState::Clear)
    }
}

impl<R: Register> InputPin for DioPin<'_, R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.pin().read().check_bit(self.pin) == BitState::Set)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.pin().read().check_bit(self.pin) == BitState::Clear)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    fn sim_port() -> Port<Cell<u8>> {
        Port::new(Cell::new(0), Cell::new(0), Cell::new(0))
    }

    #[test]
    fn direction_and_state_hit_their_registers() {
        let port = sim_port();

        port.set_direction(3, Direction::Output).unwrap();
        port.set_state(3, PinState::High).unwrap();
        assert_eq!(port.ddr().get(), 0b0000_1000);
        assert_eq!(port.port().get(), 0b0000_1000);

        port.set_direction(3, Direction::Input).unwrap();
        port.set_state(3, PinState::Low).unwrap();
        assert_eq!(port.ddr().get(), 0);
        assert_eq!(port.port().get(), 0);
    }

    #[test]
    fn get_state_reads_input_register() {
        let port = sim_port();
        port.port().set(0xFF);
        assert_eq!(port.get_state(5).unwrap(), PinState::Low);

        port.pin().set(0b0010_0000);
        assert_eq!(port.get_state(5).unwrap(), PinState::High);
        assert_eq!(get_pin_state(port.port(), 0).unwrap(), PinState::High);
    }

    #[test]
    fn bad_pin_numbers_are_errors() {
        let port = sim_port();
        assert_eq!(
            port.set_direction(8, Direction::Output),
            Err(DioError::BitOutOfRange(8))
        );
        assert!(DioPin::output(&port, 12).is_err());
        assert!(DioPin::input(&port, 8).is_err());
    }

    #[test]
    fn dio_pin_drives_output_register() {
        let port = sim_port();
        port.port().set(0b0000_0100);

        let mut pin = DioPin::output(&port, 2).unwrap();
        assert_eq!(port.ddr().get(), 0b0000_0100);
        // starts low
        assert_eq!(port.port().get(), 0);

        pin.set_high().unwrap();
        assert!(pin.is_set_high().unwrap());
        pin.toggle().unwrap();
        assert!(pin.is_set_low().unwrap());
    }

    #[test]
    fn dio_pin_samples_input_register() {
        let port = sim_port();
        let mut pin = DioPin::input(&port, 6).unwrap();
        assert!(pin.is_low().unwrap());
        port.pin().set(0b0100_0000);
        assert!(pin.is_high().unwrap());
    }

    #[test]
    fn atmega_port_d_matches_datasheet() {
        assert_eq!(atmega328p::PORT_D.ddr, 0x2A);
        assert_eq!(atmega328p::PORT_D.port, 0x2B);
        assert_eq!(atmega328p::PORT_D.pin, 0x29);
    }
}
