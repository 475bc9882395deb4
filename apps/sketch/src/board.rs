//! Wiring of the sketches on a Raspberry Pi Pico 2.
//!
//! | signal              | pin  |
//! |---------------------|------|
//! | LED                 | GP17 |
//! | blink button        | GP27 |
//! | motor button        | GP22 |
//! | H-bridge IN1 / IN2  | GP17 / GP27 |
//! | H-bridge enable     | GP22 (PWM slice 3 A) |
//! | I2C0 SDA / SCL      | GP4 / GP5 |
//!
//! Buttons connect the pin to ground.

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_rp::{
    Peri, bind_interrupts,
    clocks::clk_sys_freq,
    i2c,
    peripherals::{I2C0, PIN_4, PIN_5, PIN_22, PWM_SLICE3, USB},
    pwm::{self, Pwm, PwmOutput},
    usb,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use sketch_core::{
    ads1115::{self, DataRate, Gain},
    config::MOTOR_PWM_FREQUENCY_HZ,
    pwm::pwm_timing,
};

use crate::SketchError;

bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => usb::InterruptHandler<USB>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

pub const I2C_FREQUENCY_HZ: u32 = 400_000;

pub const ADC_ADDRESS: u8 = ads1115::DEFAULT_ADDRESS;
/// ±1.024 V, enough for the divided torch voltage.
pub const ADC_GAIN: Gain = Gain::Four;
/// Two conversions per 100 ms frame leave plenty of slack at 128 SPS.
pub const ADC_DATA_RATE: DataRate = DataRate::Sps128;
pub const OLED_ADDRESS: u8 = 0x3C;

pub const VOLTMETER_CHANNEL: u8 = 1;
pub const THC_VOLTAGE_CHANNEL: u8 = 3;
pub const THC_THICKNESS_CHANNEL: u8 = 2;

pub type I2cBus = i2c::I2c<'static, I2C0, i2c::Async>;
/// One user of the I2C bus shared by the ADC and the display.
pub type SharedI2c<'a> = I2cDevice<'a, NoopRawMutex, I2cBus>;

pub fn i2c_bus(i2c: Peri<'static, I2C0>, scl: Peri<'static, PIN_5>, sda: Peri<'static, PIN_4>) -> I2cBus {
    let mut config = i2c::Config::default();
    config.frequency = I2C_FREQUENCY_HZ;
    i2c::I2c::new_async(i2c, scl, sda, Irqs, config)
}

/// The H-bridge enable pin as a 1 kHz PWM output, starting at 0 % duty.
pub fn motor_enable(slice: Peri<'static, PWM_SLICE3>, pin: Peri<'static, PIN_22>) -> Result<PwmOutput<'static>, SketchError> {
    let sys_clk_hz = clk_sys_freq();
    let timing = pwm_timing(sys_clk_hz, MOTOR_PWM_FREQUENCY_HZ)?;
    debug!("motor PWM at {} Hz", timing.frequency_hz(sys_clk_hz));
    let mut config = pwm::Config::default();
    config.top = timing.top;
    config.divider = timing.divider.into();
    config.compare_a = 0;
    let (enable, _) = Pwm::new_output_a(slice, pin, config).split();
    enable.ok_or(SketchError::PwmChannel)
}
