use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    command::{Bits, Command, RegisterSelection},
    sender::SendCommand,
    utils::{BitOps, BitState},
};

/// Minimal EN high time, HD44780 asks for 450 ns
const DEFAULT_PULSE_US: u32 = 1;

/// 4-pin/8-pin parallel bus: RS, EN and the data lines, R/W tied to ground
pub struct ParallelSender<ControlPin, DBPin, const PIN_CNT: usize>
where
    ControlPin: OutputPin,
    DBPin: OutputPin<Error = ControlPin::Error>,
{
    rs_pin: ControlPin,
    en_pin: ControlPin,
    db_pins: [DBPin; PIN_CNT],
    pulse_us: u32,
}

impl<ControlPin, DBPin> ParallelSender<ControlPin, DBPin, 4>
where
    ControlPin: OutputPin,
    DBPin: OutputPin<Error = ControlPin::Error>,
{
    /// Bus on DB4..DB7
    pub fn new_4pin(
        rs: ControlPin,
        en: ControlPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self {
            rs_pin: rs,
            en_pin: en,
            db_pins: [db4, db5, db6, db7],
            pulse_us: DEFAULT_PULSE_US,
        }
    }
}

impl<ControlPin, DBPin> ParallelSender<ControlPin, DBPin, 8>
where
    ControlPin: OutputPin,
    DBPin: OutputPin<Error = ControlPin::Error>,
{
    /// Bus on DB0..DB7
    #[allow(clippy::too_many_arguments)]
    pub fn new_8pin(
        rs: ControlPin,
        en: ControlPin,
        db0: DBPin,
        db1: DBPin,
        db2: DBPin,
        db3: DBPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self {
            rs_pin: rs,
            en_pin: en,
            db_pins: [db0, db1, db2, db3, db4, db5, db6, db7],
            pulse_us: DEFAULT_PULSE_US,
        }
    }
}

impl<ControlPin, DBPin, const PIN_CNT: usize> ParallelSender<ControlPin, DBPin, PIN_CNT>
where
    ControlPin: OutputPin,
    DBPin: OutputPin<Error = ControlPin::Error>,
{
    /// Override the EN strobe width
    pub fn with_pulse_us(mut self, pulse_us: u32) -> Self {
        self.pulse_us = pulse_us;
        self
    }

    /// Give the pins back
    pub fn release(self) -> (ControlPin, ControlPin, [DBPin; PIN_CNT]) {
        (self.rs_pin, self.en_pin, self.db_pins)
    }

    fn push_bits(&mut self, raw_bits: u8) -> Result<(), ControlPin::Error> {
        self.db_pins
            .iter_mut()
            .enumerate()
            .try_for_each(|(index, pin)| match raw_bits.check_bit(index as u8) {
                BitState::Set => pin.set_high(),
                BitState::Clear => pin.set_low(),
            })
    }

    // LCD latches the data lines on the falling edge of EN
    fn strobe(&mut self, delayer: &mut impl DelayNs) -> Result<(), ControlPin::Error> {
        self.en_pin.set_high()?;
        delayer.delay_us(self.pulse_us);
        self.en_pin.set_low()?;
        delayer.delay_us(self.pulse_us);
        Ok(())
    }

    fn push_and_strobe(
        &mut self,
        raw_bits: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), ControlPin::Error> {
        self.push_bits(raw_bits)?;
        self.strobe(delayer)
    }
}

impl<ControlPin, DBPin, Delayer, const PIN_CNT: usize> SendCommand<Delayer>
    for ParallelSender<ControlPin, DBPin, PIN_CNT>
where
    ControlPin: OutputPin,
    DBPin: OutputPin<Error = ControlPin::Error>,
    Delayer: DelayNs,
{
    type Error = ControlPin::Error;

    fn send(&mut self, command: Command, delayer: &mut Delayer) -> Result<(), Self::Error> {
        self.en_pin.set_low()?;

        match command.get_register_selection() {
            RegisterSelection::Command => self.rs_pin.set_low()?,
            RegisterSelection::Data => self.rs_pin.set_high()?,
        }

        // only new_4pin() and new_8pin() can build a sender
        match (PIN_CNT, command.get_data()) {
            (4, Bits::Bit4(raw_bits)) => self.push_and_strobe(raw_bits & 0b1111, delayer),
            (4, Bits::Bit8(raw_bits)) => {
                self.push_and_strobe(raw_bits >> 4, delayer)?;
                self.push_and_strobe(raw_bits & 0b1111, delayer)
            }
            // a lone nibble lives on DB4..DB7
            (_, Bits::Bit4(raw_bits)) => self.push_and_strobe((raw_bits & 0b1111) << 4, delayer),
            (_, Bits::Bit8(raw_bits)) => self.push_and_strobe(raw_bits, delayer),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::{cell::RefCell, convert::Infallible};
    use std::{rc::Rc, vec::Vec};

    use embedded_hal::digital::ErrorType;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Line {
        Rs,
        En,
        Db(usize),
    }

    type Trace = Rc<RefCell<Vec<(Line, bool)>>>;

    struct TracePin {
        line: Line,
        trace: Trace,
    }

    impl ErrorType for TracePin {
        type Error = Infallible;
    }

    impl OutputPin for TracePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.trace.borrow_mut().push((self.line, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.trace.borrow_mut().push((self.line, true));
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn pin(line: Line, trace: &Trace) -> TracePin {
        TracePin {
            line,
            trace: trace.clone(),
        }
    }

    /// Rebuild the values on the data lines at each falling edge of EN
    fn latched(trace: &Trace, width: usize) -> Vec<(bool, u8)> {
        let mut rs = false;
        let mut en = false;
        let mut db = [false; 8];
        let mut out = Vec::new();

        for &(line, level) in trace.borrow().iter() {
            match line {
                Line::Rs => rs = level,
                Line::Db(i) => db[i] = level,
                Line::En => {
                    if en && !level {
                        let value = (0..width).fold(0u8, |acc, i| acc | (u8::from(db[i]) << i));
                        out.push((rs, value));
                    }
                    en = level;
                }
            }
        }
        out
    }

    #[test]
    fn four_pin_sends_high_nibble_first() {
        let trace = Trace::default();
        let mut sender = ParallelSender::new_4pin(
            pin(Line::Rs, &trace),
            pin(Line::En, &trace),
            pin(Line::Db(0), &trace),
            pin(Line::Db(1), &trace),
            pin(Line::Db(2), &trace),
            pin(Line::Db(3), &trace),
        );

        sender.send(Command::instruction(0xC5), &mut NoDelay).unwrap();
        sender.send(Command::data(b'H'), &mut NoDelay).unwrap();
        sender
            .send(
                Command::new(RegisterSelection::Command, Bits::Bit4(0b0010)),
                &mut NoDelay,
            )
            .unwrap();

        assert_eq!(
            latched(&trace, 4),
            [
                (false, 0xC),
                (false, 0x5),
                (true, 0x4),
                (true, 0x8),
                (false, 0x2)
            ]
        );
    }

    #[test]
    fn eight_pin_sends_whole_byte() {
        let trace = Trace::default();
        let mut sender = ParallelSender::new_8pin(
            pin(Line::Rs, &trace),
            pin(Line::En, &trace),
            pin(Line::Db(0), &trace),
            pin(Line::Db(1), &trace),
            pin(Line::Db(2), &trace),
            pin(Line::Db(3), &trace),
            pin(Line::Db(4), &trace),
            pin(Line::Db(5), &trace),
            pin(Line::Db(6), &trace),
            pin(Line::Db(7), &trace),
        );

        sender.send(Command::instruction(0x38), &mut NoDelay).unwrap();
        sender.send(Command::data(0xA5), &mut NoDelay).unwrap();
        sender
            .send(
                Command::new(RegisterSelection::Command, Bits::Bit4(0b0011)),
                &mut NoDelay,
            )
            .unwrap();

        assert_eq!(
            latched(&trace, 8),
            [(false, 0x38), (true, 0xA5), (false, 0x30)]
        );
    }
}
