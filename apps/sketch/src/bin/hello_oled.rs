#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use sketch::{
    SketchError, board,
    console::{Console, until_interrupted},
    display::{self, Oled},
    println,
};
use sketch_core::{
    console::{DISPLAY_CLEARED_MESSAGE, StopReason},
    layout::render_greeting,
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"Hello OLED"),
    embassy_rp::binary_info::rp_program_description!(c"Two centered lines on the SSD1306"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn greet(oled: &mut Oled<board::I2cBus>) -> Result<Infallible, SketchError> {
    render_greeting(oled, "Hello", "World").map_err(|_| SketchError::Display)?;
    display::show(oled).await?;
    info!("greeting shown");
    core::future::pending().await
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let console = Console::new(p.USB);
    let i2c = board::i2c_bus(p.I2C0, p.PIN_5, p.PIN_4);

    let sketch = async {
        let mut oled = match display::init(i2c).await {
            Ok(oled) => oled,
            Err(e) => {
                error!("display setup failed: {}", e);
                println!("Error: {}", e);
                return;
            }
        };

        let stop = StopReason::from(until_interrupted(greet(&mut oled)).await);
        if let Some(notice) = stop.exit_notice() {
            println!("{}", notice);
        }
        if let Err(e) = display::blank(&mut oled).await {
            warn!("display not cleared: {}", e);
        }
        println!("{}", DISPLAY_CLEARED_MESSAGE);
    };

    join(console.run(), sketch).await;
}
