//! NUCLEO-F446RE wiring: user LED LD2 on PA5 (active high), user button B1 on
//! PC13 (active low, pulled up on the board).

use arbitrary_int::u4;
use embedded_time::duration::Milliseconds;
use stm32f4xx_hal::gpio::{self, Edge, ExtiPin, Input, Output, PushPull, Speed};
use stm32f4xx_hal::pac::EXTI;
use stm32f4xx_hal::syscfg::SysCfg;

use crate::utilities::exti::ExtiLine;

pub type LedPin = gpio::PA5<Output<PushPull>>;
pub type ButtonPin = gpio::PC13<Input>;

pub const BLINK_PERIOD: Milliseconds = Milliseconds(100_u32);

pub const BUTTON_LINE: ExtiLine = ExtiLine::from_u4(u4::new(13));

/// Lines 10..=15 share the `EXTI15_10` vector.
pub const EXTI15_10_LINES: u32 = 0b1111_1100_0000_0000;

pub fn init_led(pin: gpio::PA5<Input>) -> LedPin {
    let mut led = pin.into_push_pull_output();
    led.set_speed(Speed::Low);
    led.set_low();
    led
}

/// Leaves the NVIC line masked, unmask it once a handler is registered.
pub fn init_button(pin: gpio::PC13<Input>, syscfg: &mut SysCfg, exti: &mut EXTI) -> ButtonPin {
    let mut button = pin.into_floating_input();
    button.make_interrupt_source(syscfg);
    button.trigger_on_edge(exti, Edge::Falling);
    button.enable_interrupt(exti);
    button.clear_interrupt_pending_bit();
    button
}

/// Snapshots the EXTI pending bits selected by `mask` and clears them.
pub fn take_pending(mask: u32) -> u32 {
    // SAFETY: PR is write-1-to-clear, only the bits we read back are touched
    let exti = unsafe { &*EXTI::ptr() };
    let pending = exti.pr.read().bits() & mask;
    exti.pr.write(|w| unsafe { w.bits(pending) });
    pending
}

