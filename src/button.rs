//! Push buttons
//!
//! [`Button`] is the one capability callers need: sample the button now.
//! [`PortButton`] reads a pin straight from a port's registers,
//! [`PinButton`] wraps any `embedded-hal` input pin. A debounced or
//! simulated button only has to implement the trait.
//!
//! Every call is an instantaneous sample, nothing is cached or filtered.

use embedded_hal::digital::InputPin;

use crate::{
    dio::{Direction, DioError, PinState, Port},
    register::Register,
};

/// Logical state of a button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    #[allow(missing_docs)]
    Pressed,
    #[allow(missing_docs)]
    Released,
}

impl ButtonState {
    #[allow(missing_docs)]
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

/// Which pin level means "pressed"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Button pulls the pin to ground, pin idles high through a pull-up
    #[default]
    ActiveLow,
    /// Button pulls the pin to Vcc, pin idles low through a pull-down
    ActiveHigh,
}

impl Polarity {
    /// Map a sampled pin level to a button state
    pub fn state_of(self, level: PinState) -> ButtonState {
        match (self, level) {
            (Polarity::ActiveLow, PinState::Low) | (Polarity::ActiveHigh, PinState::High) => {
                ButtonState::Pressed
            }
            _ => ButtonState::Released,
        }
    }
}

/// Anything that can report whether it is pressed
pub trait Button {
    #[allow(missing_docs)]
    type Error;

    /// Sample the button
    fn get_state(&mut self) -> Result<ButtonState, Self::Error>;
}

/// A button wired to one pin of a [`Port`]
#[derive(Debug)]
pub struct PortButton<'a, R: Register> {
    port: &'a Port<R>,
    pin: u8,
    polarity: Polarity,
}

impl<'a, R: Register> PortButton<'a, R> {
    /// Bind the button and configure its pin as an input
    ///
    /// With [`Polarity::ActiveLow`] the internal pull-up is enabled (output
    /// bit set while the pin is an input), otherwise it is disabled.
    /// Calling this again with the same arguments leaves the registers as
    /// they were.
    pub fn new(port: &'a Port<R>, pin: u8, polarity: Polarity) -> Result<Self, DioError> {
        port.set_direction(pin, Direction::Input)?;

        let pull_up = match polarity {
            Polarity::ActiveLow => PinState::High,
            Polarity::ActiveHigh => PinState::Low,
        };
        port.set_state(pin, pull_up)?;

        Ok(Self {
            port,
            pin,
            polarity,
        })
    }

    #[allow(missing_docs)]
    pub fn pin_number(&self) -> u8 {
        self.pin
    }

    #[allow(missing_docs)]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

impl<R: Register> Button for PortButton<'_, R> {
    type Error = DioError;

    fn get_state(&mut self) -> Result<ButtonState, Self::Error> {
        let level = self.port.get_state(self.pin)?;
        Ok(self.polarity.state_of(level))
    }
}

/// A button on any `embedded-hal` input pin
///
/// The pin must already be configured (pull-up/pull-down) by its HAL.
#[derive(Debug)]
pub struct PinButton<P: InputPin> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> PinButton<P> {
    #[allow(missing_docs)]
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Button for PinButton<P> {
    type Error = P::Error;

    fn get_state(&mut self) -> Result<ButtonState, Self::Error> {
        let level = PinState::from(self.pin.is_high()?);
        Ok(self.polarity.state_of(level))
    }
}
