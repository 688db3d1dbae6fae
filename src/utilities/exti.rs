use arbitrary_int::u4;
use arrayvec::ArrayVec;
use bitvec::prelude::Lsb0;
use bitvec::view::BitView;

/// An EXTI line fed by a GPIO pin. Only lines 0..=15 are routed from GPIO;
/// the rest of the EXTI block (PVD, RTC, USB wakeup...) never reaches here.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ExtiLine(u4);

impl ExtiLine {
    pub fn new(number: u8) -> Result<Self, &'static str> {
        u4::try_new(number)
            .map(Self)
            .map_err(|_| "EXTI line is not backed by a GPIO pin. Use 0..=15.")
    }

    pub const fn from_u4(number: u4) -> Self {
        Self(number)
    }

    pub const fn number(&self) -> u8 {
        self.0.value()
    }

    /// Bit of this line in the EXTI pending/mask registers.
    pub const fn mask(&self) -> u32 {
        1 << self.0.value()
    }
}

impl defmt::Format for ExtiLine {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "EXTI{=u8}", self.number());
    }
}

/// Callback run in interrupt context when a registered line fires.
pub trait EdgeHandler {
    fn on_edge(&mut self, line: ExtiLine);
}

struct Registration<H> {
    line: ExtiLine,
    handler: H,
}

pub struct ExtiDispatcher<H, const CAPACITY: usize> {
    registrations: ArrayVec<Registration<H>, CAPACITY>,
}

impl<H: EdgeHandler, const CAPACITY: usize> ExtiDispatcher<H, CAPACITY> {
    pub const fn new() -> Self {
        Self {
            registrations: ArrayVec::new_const(),
        }
    }

    pub fn register(&mut self, line: ExtiLine, handler: H) -> Result<(), &'static str> {
        if self.position(line).is_some() {
            return Err("EXTI line already has a handler.");
        }

        self.registrations
            .try_push(Registration { line, handler })
            .map_err(|_| "No room left for another EXTI handler.")?;

        defmt::debug!("registered handler for {}", line);
        Ok(())
    }

    /// Runs the handler registered for `line`. Returns `false` when there is none.
    pub fn dispatch(&mut self, line: ExtiLine) -> bool {
        match self.position(line) {
            None => false,
            Some(index) => {
                self.registrations[index].handler.on_edge(line);
                true
            }
        }
    }

    /// Dispatches every line set in a snapshot of the EXTI pending register and
    /// returns the mask of lines that had a handler.
    pub fn dispatch_pending(&mut self, pending: u32) -> u32 {
        let mut handled = 0_u32;

        for bit_number in pending.view_bits::<Lsb0>().iter_ones() {
            let Ok(line) = ExtiLine::new(bit_number as u8) else {
                continue;
            };

            if self.dispatch(line) {
                handled |= line.mask();
            }
        }

        handled
    }

    pub fn lines(&self) -> u32 {
        self.registrations
            .iter()
            .fold(0, |mask, registration| mask | registration.line.mask())
    }

    pub fn handler(&self, line: ExtiLine) -> Option<&H> {
        self.position(line)
            .map(|index| &self.registrations[index].handler)
    }

    fn position(&self, line: ExtiLine) -> Option<usize> {
        self.registrations
            .iter()
            .position(|registration| registration.line == line)
    }
}
