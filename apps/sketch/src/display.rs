use embedded_hal_async::i2c::I2c;
use ssd1306::{I2CDisplayInterface, Ssd1306Async, mode::BufferedGraphicsModeAsync, prelude::*};

use crate::{SketchError, board::OLED_ADDRESS};

pub type Oled<I> = Ssd1306Async<I2CInterface<I>, DisplaySize128x64, BufferedGraphicsModeAsync<DisplaySize128x64>>;

/// Initialise the 128x64 SSD1306 and start with a blank screen.
pub async fn init<I: I2c>(i2c: I) -> Result<Oled<I>, SketchError> {
    let interface = I2CDisplayInterface::new_custom_address(i2c, OLED_ADDRESS);
    let mut oled = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0).into_buffered_graphics_mode();
    oled.init().await.map_err(|_| SketchError::Display)?;
    blank(&mut oled).await?;
    Ok(oled)
}

pub async fn show<I: I2c>(oled: &mut Oled<I>) -> Result<(), SketchError> {
    oled.flush().await.map_err(|_| SketchError::Display)
}

pub async fn blank<I: I2c>(oled: &mut Oled<I>) -> Result<(), SketchError> {
    oled.clear_buffer();
    show(oled).await
}
