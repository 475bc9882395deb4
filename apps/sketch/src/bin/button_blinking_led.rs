#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::{
    join::join,
    select::{Either, select},
};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Timer;
use sketch::{
    SketchError,
    console::{Console, until_interrupted},
    println,
};
use sketch_core::{
    button::Button,
    config::{BLINK_HALF_PERIOD, BUTTON_POLL_BLINK},
    console::STOPPED_MESSAGE,
    led::{BlinkControl, Blinker, Led},
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"Button Blinking LED"),
    embassy_rp::binary_info::rp_program_description!(c"Button on GP27 starts and stops the LED on GP17 blinking"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn poll_button(button: &mut Input<'_>, control: &BlinkControl<NoopRawMutex>) -> Result<Infallible, SketchError> {
    let mut button = Button::new(button);
    loop {
        if button.poll_press()? {
            let active = control.toggle().await;
            info!("blinking {}", if active { "on" } else { "off" });
        }
        Timer::after(BUTTON_POLL_BLINK).await;
    }
}

async fn toggle_blinking(led: &mut Output<'_>, button: &mut Input<'_>) -> Result<Infallible, SketchError> {
    let control = BlinkControl::<NoopRawMutex>::new();
    let mut blinker = Blinker::new(Led::new(led)?, &control, BLINK_HALF_PERIOD);
    match select(blinker.run(), poll_button(button, &control)).await {
        Either::First(result) => result.map_err(SketchError::from),
        Either::Second(result) => result,
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let console = Console::new(p.USB);
    let mut led = Output::new(p.PIN_17, Level::Low);
    let mut button = Input::new(p.PIN_27, Pull::Up);

    let sketch = async {
        let _ = until_interrupted(toggle_blinking(&mut led, &mut button)).await;
        // the blinker may have been dropped mid cycle
        led.set_low();
        println!("{}", STOPPED_MESSAGE);
    };

    join(console.run(), sketch).await;
}
