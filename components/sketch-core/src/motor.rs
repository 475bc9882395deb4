//! DC motor behind an L293D style H-bridge: two direction inputs and an
//! optional PWM driven enable.

use core::convert::Infallible;
use core::fmt;

use embassy_time::{Duration, Timer};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use crate::GpioError;
use crate::button::Button;
use crate::config::{MOTOR_RUN_TIME, MOTOR_STOP_TIME};

#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    Gpio,
    Pwm,
}

impl From<GpioError> for MotorError {
    fn from(_: GpioError) -> Self {
        MotorError::Gpio
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Levels of (IN1, IN2).
    pub fn levels(&self) -> (bool, bool) {
        match self {
            Direction::Forward => (true, false),
            Direction::Reverse => (false, true),
        }
    }
}

/// Common surface of the direction-only and the speed controlled motor.
pub trait Drive {
    /// Turn in `direction`, at `speed` percent where the hardware supports it.
    fn drive(&mut self, direction: Direction, speed: Option<u8>) -> Result<(), MotorError>;
    /// Stop step of a cycle.
    fn halt(&mut self) -> Result<(), MotorError>;
    /// Safe state: no power and both inputs low.
    fn off(&mut self) -> Result<(), MotorError>;
}

pub struct HBridge<A: OutputPin, B: OutputPin> {
    in1: A,
    in2: B,
    direction: Option<Direction>,
}

impl<A: OutputPin, B: OutputPin> HBridge<A, B> {
    pub fn new(in1: A, in2: B) -> Result<Self, MotorError> {
        let mut bridge = HBridge { in1, in2, direction: None };
        bridge.release()?;
        Ok(bridge)
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        let (in1, in2) = direction.levels();
        self.set_inputs(in1, in2)?;
        self.direction = Some(direction);
        Ok(())
    }

    /// Both inputs low, the motor coasts.
    pub fn release(&mut self) -> Result<(), MotorError> {
        self.set_inputs(false, false)?;
        self.direction = None;
        Ok(())
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn free(self) -> (A, B) {
        (self.in1, self.in2)
    }

    fn set_inputs(&mut self, in1: bool, in2: bool) -> Result<(), MotorError> {
        // drop the active side first so both inputs are never high together
        if in1 {
            self.in2.set_state(in2.into()).map_err(|_| MotorError::Gpio)?;
            self.in1.set_state(in1.into()).map_err(|_| MotorError::Gpio)?;
        } else {
            self.in1.set_state(in1.into()).map_err(|_| MotorError::Gpio)?;
            self.in2.set_state(in2.into()).map_err(|_| MotorError::Gpio)?;
        }
        Ok(())
    }
}

impl<A: OutputPin, B: OutputPin> Drive for HBridge<A, B> {
    fn drive(&mut self, direction: Direction, _speed: Option<u8>) -> Result<(), MotorError> {
        self.set_direction(direction)
    }

    fn halt(&mut self) -> Result<(), MotorError> {
        self.release()
    }

    fn off(&mut self) -> Result<(), MotorError> {
        self.release()
    }
}

/// H-bridge with its enable input on a PWM channel.
pub struct SpeedMotor<A: OutputPin, B: OutputPin, E: SetDutyCycle> {
    bridge: HBridge<A, B>,
    enable: E,
    speed: u8,
}

impl<A: OutputPin, B: OutputPin, E: SetDutyCycle> SpeedMotor<A, B, E> {
    /// Starts released at 0 % duty cycle.
    pub fn new(in1: A, in2: B, mut enable: E) -> Result<Self, MotorError> {
        enable.set_duty_cycle_fully_off().map_err(|_| MotorError::Pwm)?;
        Ok(SpeedMotor {
            bridge: HBridge::new(in1, in2)?,
            enable,
            speed: 0,
        })
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<(), MotorError> {
        self.bridge.set_direction(direction)
    }

    /// Duty cycle of the enable input in percent, clamped to 100.
    pub fn set_speed(&mut self, percent: u8) -> Result<(), MotorError> {
        let percent = percent.min(100);
        self.enable.set_duty_cycle_percent(percent).map_err(|_| MotorError::Pwm)?;
        self.speed = percent;
        Ok(())
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn direction(&self) -> Option<Direction> {
        self.bridge.direction()
    }

    pub fn free(self) -> (A, B, E) {
        let (in1, in2) = self.bridge.free();
        (in1, in2, self.enable)
    }
}

impl<A: OutputPin, B: OutputPin, E: SetDutyCycle> Drive for SpeedMotor<A, B, E> {
    fn drive(&mut self, direction: Direction, speed: Option<u8>) -> Result<(), MotorError> {
        self.set_direction(direction)?;
        self.set_speed(speed.unwrap_or(100))
    }

    /// Only the enable goes to 0 %, direction inputs stay as they are.
    fn halt(&mut self) -> Result<(), MotorError> {
        self.set_speed(0)
    }

    fn off(&mut self) -> Result<(), MotorError> {
        self.set_speed(0)?;
        self.bridge.release()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorStep {
    Run { direction: Direction, speed: Option<u8>, hold: Duration },
    Stop { hold: Duration },
}

impl MotorStep {
    pub fn hold(&self) -> Duration {
        match self {
            MotorStep::Run { hold, .. } | MotorStep::Stop { hold } => *hold,
        }
    }

    pub fn apply(&self, motor: &mut impl Drive) -> Result<(), MotorError> {
        match self {
            MotorStep::Run { direction, speed, .. } => motor.drive(*direction, *speed),
            MotorStep::Stop { .. } => motor.halt(),
        }
    }
}

/// Console announcement of the step.
impl fmt::Display for MotorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotorStep::Run {
                direction: Direction::Forward,
                ..
            } => "Motor forward",
            MotorStep::Run {
                direction: Direction::Reverse,
                ..
            } => "Motor reverse",
            MotorStep::Stop { .. } => return f.write_str("Motor stop"),
        };
        match self {
            MotorStep::Run { speed: Some(speed), .. } => write!(f, "{} at {}% speed", name, speed),
            _ => f.write_str(name),
        }
    }
}

/// Forward, reverse, stop, repeated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCycle {
    pub speed: Option<u8>,
    pub run_time: Duration,
    pub stop_time: Duration,
}

impl MotorCycle {
    pub fn new(speed: Option<u8>) -> Self {
        MotorCycle {
            speed,
            run_time: MOTOR_RUN_TIME,
            stop_time: MOTOR_STOP_TIME,
        }
    }

    pub fn steps(&self) -> [MotorStep; 3] {
        [
            MotorStep::Run {
                direction: Direction::Forward,
                speed: self.speed,
                hold: self.run_time,
            },
            MotorStep::Run {
                direction: Direction::Reverse,
                speed: self.speed,
                hold: self.run_time,
            },
            MotorStep::Stop { hold: self.stop_time },
        ]
    }

    /// Run the cycle forever, `announce` is called before each step is applied.
    pub async fn run<D: Drive>(&self, motor: &mut D, mut announce: impl FnMut(&MotorStep)) -> Result<Infallible, MotorError> {
        loop {
            for step in self.steps() {
                announce(&step);
                step.apply(motor)?;
                Timer::after(step.hold()).await;
            }
        }
    }
}

/// Drive forward while the button is held, release the bridge otherwise.
pub async fn run_while_pressed<D: Drive, P: InputPin>(motor: &mut D, button: &mut Button<P>, poll: Duration) -> Result<Infallible, MotorError> {
    let mut running = false;
    loop {
        let pressed = button.is_pressed()?;
        if pressed {
            motor.drive(Direction::Forward, None)?;
        } else {
            motor.off()?;
        }
        if pressed != running {
            debug!("Motor> {}", if pressed { "on" } else { "off" });
            running = pressed;
        }
        Timer::after(poll).await;
    }
}
