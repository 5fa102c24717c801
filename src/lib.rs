/*!
# LCD & DIO HAL

A small hardware abstraction layer for 8-bit MCUs, built on `embedded-hal` 1.0.

Layers, from bottom to top:

* [`register`]: bit-level access to 8-bit memory-mapped registers
* [`dio`]: digital pins over a DDR/PORT/PIN register triple
* [`button`]: debounce-free push buttons with configurable polarity
* [`text`]: integer to decimal text and back, without allocation
* [`lcd`]: HD44780 character LCD over a [`sender::SendCommand`] bus

Basic LCD usage:

1. Initialize a "sender" <br/>
    This crate include a 4-pin/8-pin parallel driver [`sender::ParallelSender`],
    or you can use any driver implemented [`sender::SendCommand`].
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] to create a [`lcd::Lcd`], and initialize the LCD hardware
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the LCD
*/

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod button;
pub mod command;
pub mod dio;
pub mod lcd;
pub mod register;
pub mod sender;
mod state;
pub mod text;
pub mod utils;
