#![no_main]
#![no_std]

use core::sync::atomic::{AtomicUsize, Ordering};

use defmt_rtt as _; // global logger
use panic_probe as _;
use stm32f4xx_hal as _; // memory layout + interrupt vectors

pub mod utilities;

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

static COUNT: AtomicUsize = AtomicUsize::new(0);
defmt::timestamp!("{=usize}", {
    // NOTE(no-CAS) `timestamps` runs with interrupts disabled
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});

#[cfg(test)]
mod test_handlers {
    use crate::utilities::exti::{EdgeHandler, ExtiLine};

    pub struct CountingHandler {
        pub hits: u32,
        pub last_line: Option<ExtiLine>,
    }

    impl CountingHandler {
        pub const fn new() -> Self {
            Self {
                hits: 0,
                last_line: None,
            }
        }
    }

    impl EdgeHandler for CountingHandler {
        fn on_edge(&mut self, line: ExtiLine) {
            self.hits += 1;
            self.last_line = Some(line);
        }
    }
}

#[cfg(test)]
#[defmt_test::tests]
mod unit_tests {
    use defmt::{assert, assert_eq};

    use crate::test_handlers::CountingHandler;
    use crate::utilities::exti::{ExtiDispatcher, ExtiLine};

    #[test]
    fn exti_line_accepts_gpio_lines_only() {
        assert!(ExtiLine::new(0).is_ok());
        assert!(ExtiLine::new(15).is_ok());
        assert!(ExtiLine::new(16).is_err());
        assert!(ExtiLine::new(22).is_err());
    }

    #[test]
    fn exti_line_mask_matches_pending_register_bit() {
        assert_eq!(ExtiLine::new(0).unwrap().mask(), 0b1);
        assert_eq!(ExtiLine::new(13).unwrap().mask(), 1 << 13);
        assert_eq!(ExtiLine::new(13).unwrap().number(), 13);
    }

    #[test]
    fn registered_handler_receives_its_line() {
        let line = ExtiLine::new(13).unwrap();
        let mut dispatcher: ExtiDispatcher<CountingHandler, 2> = ExtiDispatcher::new();
        dispatcher.register(line, CountingHandler::new()).unwrap();

        assert!(dispatcher.dispatch(line));
        let handler = dispatcher.handler(line).unwrap();
        assert_eq!(handler.hits, 1);
        assert!(handler.last_line == Some(line));
    }

    #[test]
    fn unregistered_line_is_ignored() {
        let mut dispatcher: ExtiDispatcher<CountingHandler, 2> = ExtiDispatcher::new();
        dispatcher
            .register(ExtiLine::new(13).unwrap(), CountingHandler::new())
            .unwrap();

        assert!(!dispatcher.dispatch(ExtiLine::new(12).unwrap()));
        assert_eq!(dispatcher.handler(ExtiLine::new(13).unwrap()).unwrap().hits, 0);
    }

    #[test]
    fn line_cannot_be_registered_twice() {
        let line = ExtiLine::new(4).unwrap();
        let mut dispatcher: ExtiDispatcher<CountingHandler, 2> = ExtiDispatcher::new();

        assert!(dispatcher.register(line, CountingHandler::new()).is_ok());
        assert!(dispatcher.register(line, CountingHandler::new()).is_err());
        assert_eq!(dispatcher.lines(), line.mask());
    }

    #[test]
    fn full_table_rejects_registration() {
        let mut dispatcher: ExtiDispatcher<CountingHandler, 1> = ExtiDispatcher::new();

        assert!(dispatcher
            .register(ExtiLine::new(1).unwrap(), CountingHandler::new())
            .is_ok());
        assert!(dispatcher
            .register(ExtiLine::new(2).unwrap(), CountingHandler::new())
            .is_err());
    }

    #[test]
    fn pending_snapshot_dispatches_each_registered_line() {
        let line_10 = ExtiLine::new(10).unwrap();
        let line_13 = ExtiLine::new(13).unwrap();
        let mut dispatcher: ExtiDispatcher<CountingHandler, 2> = ExtiDispatcher::new();
        dispatcher.register(line_10, CountingHandler::new()).unwrap();
        dispatcher.register(line_13, CountingHandler::new()).unwrap();

        // line 11 and the non-GPIO line 20 have no handler
        let pending = line_13.mask() | (1 << 11) | (1 << 20);
        let handled = dispatcher.dispatch_pending(pending);

        assert_eq!(handled, line_13.mask());
        assert_eq!(dispatcher.handler(line_13).unwrap().hits, 1);
        assert_eq!(dispatcher.handler(line_10).unwrap().hits, 0);
    }

    #[test]
    fn empty_snapshot_dispatches_nothing() {
        let mut dispatcher: ExtiDispatcher<CountingHandler, 1> = ExtiDispatcher::new();
        dispatcher
            .register(ExtiLine::new(13).unwrap(), CountingHandler::new())
            .unwrap();

        assert_eq!(dispatcher.dispatch_pending(0), 0);
        assert_eq!(dispatcher.handler(ExtiLine::new(13).unwrap()).unwrap().hits, 0);
    }
}
