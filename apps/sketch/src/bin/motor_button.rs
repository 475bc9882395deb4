#![no_std]
#![no_main]

use core::convert::Infallible;

use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use sketch::{
    SketchError,
    console::{Console, until_interrupted},
    println,
};
use sketch_core::{
    button::Button,
    config::BUTTON_POLL_MOTOR,
    console::STOPPED_MESSAGE,
    motor::{HBridge, run_while_pressed},
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"Motor Button"),
    embassy_rp::binary_info::rp_program_description!(c"Runs the DC motor while the button on GP22 is held"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn follow_button(in1: &mut Output<'_>, in2: &mut Output<'_>, button: &mut Input<'_>) -> Result<Infallible, SketchError> {
    let mut bridge = HBridge::new(in1, in2)?;
    let mut button = Button::new(button);
    Ok(run_while_pressed(&mut bridge, &mut button, BUTTON_POLL_MOTOR).await?)
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let console = Console::new(p.USB);
    let mut in1 = Output::new(p.PIN_17, Level::Low);
    let mut in2 = Output::new(p.PIN_27, Level::Low);
    let mut button = Input::new(p.PIN_22, Pull::Up);

    let sketch = async {
        let _ = until_interrupted(follow_button(&mut in1, &mut in2, &mut button)).await;
        in1.set_low();
        in2.set_low();
        println!("{}", STOPPED_MESSAGE);
    };

    join(console.run(), sketch).await;
}
