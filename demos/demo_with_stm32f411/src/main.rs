//! Drive a LCD1602 with a STM32F411RET6 in 4 Pin Mode, plus a push button
//!
//! Shows a press counter, and a heart glyph while the button is held.

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V (It is best to use an external source for the 5V pin, such as the 5V output from a DAPLink device or USB.)
//!      V0 <-> potentiometer <-> 5V & GND (to adjust the display contrast)
//!      RS <-> PA0
//!      RW <-> GND
//!      EN <-> PA2 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D4 <-> PA3
//!      D5 <-> PA4
//!      D6 <-> PA5
//!      D7 <-> PA6
//!       A <-> 5V
//!       K <-> GND
//!
//! Button <-> PA7 and GND (internal pull-up)

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use lcd_dio_hal::{
    button::{Button, PinButton, Polarity},
    lcd::{Config, Glyph, Lcd},
    sender::ParallelSender,
    text::format_int,
};

// a heart shape
const HEART: Glyph = [
    0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(12.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    let gpioa = dp.GPIOA.split();

    // Push-pull mode for a fast interaction, R/W is tied to ground
    let rs_pin = gpioa.pa0.into_push_pull_output().erase();
    let en_pin = gpioa.pa2.into_push_pull_output().erase();
    let db4_pin = gpioa.pa3.into_push_pull_output().erase();
    let db5_pin = gpioa.pa4.into_push_pull_output().erase();
    let db6_pin = gpioa.pa5.into_push_pull_output().erase();
    let db7_pin = gpioa.pa6.into_push_pull_output().erase();

    let mut button = PinButton::new(gpioa.pa7.into_pull_up_input(), Polarity::ActiveLow);

    // put pins together
    let mut sender = ParallelSender::new_4pin(rs_pin, en_pin, db4_pin, db5_pin, db6_pin, db7_pin);

    // init LCD1602
    let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default())
        .expect("Cannot init LCD1602");

    lcd.upload_custom_glyph(1, &HEART)
        .expect("Cannot upload glyph");

    lcd.write_string_at(0, 0, "presses:")
        .expect("Cannot write LCD1602");

    let mut presses: i32 = 0;
    let mut was_pressed = false;

    loop {
        let pressed = button
            .get_state()
            .map(|state| state.is_pressed())
            .unwrap_or(false);

        if pressed && !was_pressed {
            presses = presses.wrapping_add(1);
            rprintln!("button pressed, {} times", presses);

            let text = format_int(presses);
            lcd.write_string_at(0, 9, &text).expect("Cannot write LCD1602");
        }

        let marker = if pressed { "\u{1}" } else { " " };
        lcd.write_string_at(1, 15, marker).expect("Cannot write LCD1602");

        was_pressed = pressed;
        lcd.delay_ms(20);
    }
}
