//! Built-in sender
//! If you want to drive the LCD over another bus, you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::command::Command;

mod parallel_sender;

pub use parallel_sender::ParallelSender;

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
///
/// The LCD is write-only here (R/W tied low), so there is no busy flag to
/// poll: every transfer is followed by a fixed settling time instead.
pub trait SendCommand<Delayer: DelayNs> {
    /// Error of the underlying bus
    type Error;

    /// Put one [`Command`] on the bus, framing it with the enable strobe
    fn send(&mut self, command: Command, delayer: &mut Delayer) -> Result<(), Self::Error>;

    /// Send command, then wait for the LCD to execute it
    fn send_and_wait(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
        settle_us: u32,
    ) -> Result<(), Self::Error> {
        self.send(command, delayer)?;
        delayer.delay_us(settle_us);
        Ok(())
    }
}
