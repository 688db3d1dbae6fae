use embedded_hal::digital::v2::InputPin;

use crate::utilities::blink::BlinkFlag;
use crate::utilities::exti::{EdgeHandler, ExtiLine};

/// Active-low push button: pressed reads as low, the pull-up is on the board.
pub struct ButtonHandler<'a, P> {
    pin: P,
    flag: &'a BlinkFlag,
}

impl<'a, P: InputPin> ButtonHandler<'a, P> {
    pub fn new(pin: P, flag: &'a BlinkFlag) -> Self {
        Self { pin, flag }
    }

    pub fn is_pressed(&self) -> Result<bool, P::Error> {
        self.pin.is_low()
    }
}

impl<'a, P: InputPin> EdgeHandler for ButtonHandler<'a, P> {
    fn on_edge(&mut self, line: ExtiLine) {
        match self.is_pressed() {
            Ok(pressed) => {
                defmt::debug!("{} fired, button pressed: {}", line, pressed);
                self.flag.set(pressed);
            }
            // keep the last observed level
            Err(_) => defmt::warn!("{} fired but the button pin could not be read", line),
        }
    }
}
