use core::fmt;

use sketch_core::{GpioError, ads1115::Ads1115Error, motor::MotorError, pwm::PwmError};

#[derive(Debug, Eq, PartialEq, defmt::Format)]
pub enum SketchError {
    Gpio,
    Motor(MotorError),
    Pwm(PwmError),
    PwmChannel,
    Adc,
    Display,
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::Gpio => f.write_str("GPIO access failed"),
            SketchError::Motor(MotorError::Gpio) => f.write_str("motor GPIO access failed"),
            SketchError::Motor(MotorError::Pwm) => f.write_str("motor PWM update failed"),
            SketchError::Pwm(PwmError::FrequencyOutOfRange { freq_hz }) => {
                write!(f, "PWM frequency {} Hz out of range", freq_hz)
            }
            SketchError::PwmChannel => f.write_str("PWM channel unavailable"),
            SketchError::Adc => f.write_str("ADC read failed"),
            SketchError::Display => f.write_str("display update failed"),
        }
    }
}

impl From<GpioError> for SketchError {
    fn from(_: GpioError) -> Self {
        SketchError::Gpio
    }
}

impl From<MotorError> for SketchError {
    fn from(e: MotorError) -> Self {
        SketchError::Motor(e)
    }
}

impl From<PwmError> for SketchError {
    fn from(e: PwmError) -> Self {
        SketchError::Pwm(e)
    }
}

impl<E> From<Ads1115Error<E>> for SketchError {
    fn from(_: Ads1115Error<E>) -> Self {
        SketchError::Adc
    }
}
