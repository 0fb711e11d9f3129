pub mod capture;
mod clock;
mod collector;
pub mod compatibility;
pub mod negotiation;
mod notifier;

pub use clock::CLOCK_TICK;
