#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::gpio::{Level, Output};
use sketch::{
    SketchError,
    console::{Console, until_interrupted},
    println,
};
use sketch_core::{
    console::STOPPED_MESSAGE,
    motor::{HBridge, MotorCycle},
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"DC Motor"),
    embassy_rp::binary_info::rp_program_description!(c"Cycles the DC motor forward, reverse and stop"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn cycle_motor(in1: &mut Output<'_>, in2: &mut Output<'_>) -> Result<Infallible, SketchError> {
    let mut bridge = HBridge::new(in1, in2)?;
    let cycle = MotorCycle::new(None);
    Ok(cycle
        .run(&mut bridge, |step| {
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

    let sketch = async {
        let _ = until_interrupted(cycle_motor(&mut in1, &mut in2)).await;
        in1.set_low();
        in2.set_low();
        println!("{}", STOPPED_MESSAGE);
    };

    join(console.run(), sketch).await;
}
