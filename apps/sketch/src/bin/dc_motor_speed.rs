#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::{
    gpio::{Level, Output},
    pwm::PwmOutput,
};
use embedded_hal::pwm::SetDutyCycle;
use sketch::{
    SketchError,
    board::motor_enable,
    console::{Console, until_interrupted},
    println,
};
use sketch_core::{
    config::MOTOR_SPEED_PERCENT,
    console::STOPPED_MESSAGE,
    motor::{MotorCycle, SpeedMotor},
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"DC Motor Speed"),
    embassy_rp::binary_info::rp_program_description!(c"Cycles the DC motor at reduced speed with PWM on the enable pin"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn cycle_motor(in1: &mut Output<'_>, in2: &mut Output<'_>, enable: &mut PwmOutput<'_>) -> Result<Infallible, SketchError> {
    let mut motor = SpeedMotor::new(in1, in2, enable)?;
    let cycle = MotorCycle::new(Some(MOTOR_SPEED_PERCENT));
    Ok(cycle
        .run(&mut motor, |step| {
            info!("{}", step);
            println!("{}", step);
        })
        .await?)
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let console = Console::new(p.USB);
    let mut in1 = Output::new(p.PIN_17, Level::Low);
    let mut in2 = Output::new(p.PIN_27, Level::Low);
    let enable = motor_enable(p.PWM_SLICE3, p.PIN_22);

    let sketch = async {
        match enable {
            Ok(mut enable) => {
                let _ = until_interrupted(cycle_motor(&mut in1, &mut in2, &mut enable)).await;
                if enable.set_duty_cycle_fully_off().is_err() {
                    warn!("motor enable stuck");
                }
            }
            Err(e) => {
                error!("PWM setup failed: {}", e);
                println!("Error: {}", e);
            }
        }
        in1.set_low();
        in2.set_low();
        println!("{}", STOPPED_MESSAGE);
    };

    join(console.run(), sketch).await;
}
