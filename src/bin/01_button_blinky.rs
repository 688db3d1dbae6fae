#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::delay::Delay;
use cortex_m::interrupt::Mutex;
use cortex_m::peripheral::Peripherals as CorePeripherals;
use cortex_m_rt::entry;
use stm32f4xx_hal::pac::{interrupt, Peripherals};
use stm32f4xx_hal::prelude::*;

use exti_blinky as _;
use exti_blinky::utilities::blink::{BlinkFlag, BlinkLoop};
use exti_blinky::utilities::board::{self, ButtonPin};
use exti_blinky::utilities::button::ButtonHandler;
use exti_blinky::utilities::exti::ExtiDispatcher;

type ButtonDispatcher = ExtiDispatcher<ButtonHandler<'static, ButtonPin>, 1>;

static BLINK_FLAG: BlinkFlag = BlinkFlag::new();

static G_DISPATCHER: Mutex<RefCell<ButtonDispatcher>> =
    Mutex::new(RefCell::new(ExtiDispatcher::new()));

#[entry]
fn main() -> ! {
    let mut dp = Peripherals::take().unwrap();
    let cp = CorePeripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let mut syscfg = dp.SYSCFG.constrain();
    let clocks = rcc.cfgr.freeze();
    let ahb_frequency = clocks.hclk().raw();

    let gpioa = dp.GPIOA.split();
    let gpioc = dp.GPIOC.split();

    let led = board::init_led(gpioa.pa5);
    let button = board::init_button(gpioc.pc13, &mut syscfg, &mut dp.EXTI);
    let button_interrupt = button.interrupt();

    cortex_m::interrupt::free(|cs| {
        G_DISPATCHER
            .borrow(cs)
            .borrow_mut()
            .register(board::BUTTON_LINE, ButtonHandler::new(button, &BLINK_FLAG))
            .unwrap();
    });

    unsafe {
        cortex_m::peripheral::NVIC::unmask(button_interrupt);
    }

    defmt::info!("Hold B1 to blink LD2.");

    let delay = Delay::new(cp.SYST, ahb_frequency);
    BlinkLoop::new(led, delay, &BLINK_FLAG, board::BLINK_PERIOD).run()
}

#[allow(non_snake_case)]
#[interrupt]
fn EXTI15_10() {
    let pending = board::take_pending(board::EXTI15_10_LINES);

    cortex_m::interrupt::free(|cs| {
        let handled = G_DISPATCHER.borrow(cs).borrow_mut().dispatch_pending(pending);
        if handled != pending {
            defmt::warn!("EXTI lines {=u32:b} have no handler", pending & !handled);
        }
    });
}
