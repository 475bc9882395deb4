#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};
use sketch::{
    SketchError,
    board::{self, ADC_ADDRESS, ADC_DATA_RATE, ADC_GAIN, SharedI2c, THC_THICKNESS_CHANNEL, THC_VOLTAGE_CHANNEL},
    console::{Console, until_interrupted},
    display::{self, Oled},
    println,
};
use sketch_core::{
    ads1115::Ads1115,
    config::REFRESH_PERIOD,
    console::{DISPLAY_CLEARED_MESSAGE, StopReason},
    convert::ThicknessReading,
    layout::render_thickness,
    pacing::FrameClock,
};
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"OpenTHC Alpha"),
    embassy_rp::binary_info::rp_program_description!(c"Compares torch voltage with the selected material thickness"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

async fn control_height(adc: &mut Ads1115<SharedI2c<'_>>, oled: &mut Oled<SharedI2c<'_>>) -> Result<Infallible, SketchError> {
    let clock = FrameClock::new(REFRESH_PERIOD);
    let full_scale = adc.gain().full_scale();
    loop {
        let voltage_raw = adc.read(THC_VOLTAGE_CHANNEL).await?;
        let thickness_raw = adc.read(THC_THICKNESS_CHANNEL).await?;
        let reading = ThicknessReading::from_raw(voltage_raw, thickness_raw, full_scale);
        debug!("{} mm, {} V => {}", reading.thickness_mm, reading.voltage, reading.level());
        render_thickness(oled, &reading).map_err(|_| SketchError::Display)?;
        display::show(oled).await?;
        clock.tick().await;
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let console = Console::new(p.USB);
    let bus = Mutex::<NoopRawMutex, _>::new(board::i2c_bus(p.I2C0, p.PIN_5, p.PIN_4));

    let sketch = async {
        let mut adc = Ads1115::with_address(I2cDevice::new(&bus), ADC_ADDRESS);
        adc.set_gain(ADC_GAIN);
        adc.set_data_rate(ADC_DATA_RATE);
        let mut oled = match display::init(I2cDevice::new(&bus)).await {
            Ok(oled) => oled,
            Err(e) => {
                error!("display setup failed: {}", e);
                println!("Error: {}", e);
                return;
            }
        };

        let stop = StopReason::from(until_interrupted(control_height(&mut adc, &mut oled)).await);
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
