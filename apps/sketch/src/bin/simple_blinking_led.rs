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
    config::BLINK_HALF_PERIOD,
    console::STOPPED_MESSAGE,
    led::{Led, blink},
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"Simple Blinking LED"),
    embassy_rp::binary_info::rp_program_description!(c"Blinks the LED on GP17 at 1 Hz"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn blink_led(pin: &mut Output<'_>) -> Result<Infallible, SketchError> {
    let mut led = Led::new(pin)?;
    Ok(blink(&mut led, BLINK_HALF_PERIOD).await?)
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let console = Console::new(p.USB);
    let mut led = Output::new(p.PIN_17, Level::Low);

    let sketch = async {
        info!("blink start");
        let _ = until_interrupted(blink_led(&mut led)).await;
        led.set_low();
        println!("{}", STOPPED_MESSAGE);
    };

    join(console.run(), sketch).await;
}
