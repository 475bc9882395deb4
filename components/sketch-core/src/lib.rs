#![cfg_attr(not(test), no_std)]

pub(crate) mod fmt;

pub mod ads1115;
pub mod button;
pub mod config;
pub mod console;
pub mod convert;
pub mod layout;
pub mod led;
pub mod motor;
pub mod pacing;
pub mod pwm;

/// A GPIO read or write failed. HAL pin errors carry no useful detail here.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioError;

#[cfg(test)]
pub mod tests {

    #[cfg(feature = "log")]
    #[cfg_attr(feature = "log", ctor::ctor)]
    fn init() {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_thread_names(true)
            .with_level(true)
            .pretty()
            .init();
    }
}
