use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};
use embedded_time::duration::Milliseconds;
use embedded_time::fixed_point::FixedPoint;

/// Blink-enabled flag shared between the button interrupt (single writer)
/// and the main loop (single reader).
pub struct BlinkFlag {
    enabled: AtomicBool,
}

impl BlinkFlag {
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
        }
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BlinkState {
    Off,
    Blinking,
}

#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LedAction {
    Toggled,
    Cleared,
}

pub struct BlinkLoop<'a, L, D> {
    led: L,
    delay: D,
    flag: &'a BlinkFlag,
    period: Milliseconds,
    state: BlinkState,
}

impl<'a, L, D, E> BlinkLoop<'a, L, D>
where
    L: OutputPin<Error = E> + ToggleableOutputPin<Error = E>,
    D: DelayMs<u32>,
{
    pub fn new(led: L, delay: D, flag: &'a BlinkFlag, period: Milliseconds) -> Self {
        Self {
            led,
            delay,
            flag,
            period,
            state: BlinkState::Off,
        }
    }

    /// One pass of the loop: toggle and wait a full period while the flag is
    /// set, otherwise drive the LED low straight away.
    pub fn step(&mut self) -> Result<LedAction, E> {
        let state = if self.flag.is_set() {
            BlinkState::Blinking
        } else {
            BlinkState::Off
        };

        if state != self.state {
            defmt::info!("LED {} -> {}", self.state, state);
            self.state = state;
        }

        match state {
            BlinkState::Blinking => {
                self.led.toggle()?;
                defmt::trace!("LED toggled");
                self.delay.delay_ms(self.period.integer());
                Ok(LedAction::Toggled)
            }
            BlinkState::Off => {
                self.led.set_low()?;
                Ok(LedAction::Cleared)
            }
        }
    }

    pub fn run(mut self) -> ! {
        loop {
            if self.step().is_err() {
                defmt::error!("Could not drive the LED pin.");
            }
        }
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}
