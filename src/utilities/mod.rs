pub mod blink;
pub mod board;
pub mod button;
pub mod exti;
