//! USB CDC-ACM console: text output for the sketches and Ctrl+C input.
//!
//! Output goes through a [`Pipe`] so printing never blocks a sketch; without
//! a connected terminal the pipe fills up and further text is dropped.

use core::convert::Infallible;

use defmt::*;
use embassy_futures::{
    join::join3,
    select::{Either, select},
};
use embassy_rp::{Peri, peripherals::USB, usb::Driver};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, pipe::Pipe, signal::Signal};
use embassy_usb::{
    Builder, Config, UsbDevice,
    class::cdc_acm::{CdcAcmClass, Receiver, Sender, State},
};
use sketch_core::console::contains_interrupt;
use static_cell::StaticCell;

use crate::{SketchError, board::Irqs};

const MAX_PACKET_SIZE: u16 = 64;
const OUTPUT_SIZE: usize = 1024;

pub static OUTPUT: Pipe<CriticalSectionRawMutex, OUTPUT_SIZE> = Pipe::new();
static INTERRUPT: Signal<CriticalSectionRawMutex, ()> = Signal::new();

type UsbDriver = Driver<'static, USB>;

/// Write a line to the console, `\r\n` terminated.
#[macro_export]
macro_rules! println {
    ($($arg:tt)*) => {{
        let mut writer = $crate::console::Writer(&$crate::console::OUTPUT);
        let _ = ::core::fmt::Write::write_fmt(&mut writer, format_args!($($arg)*));
        let _ = ::core::fmt::Write::write_str(&mut writer, "\r\n");
    }};
}

/// Resolves once Ctrl+C was received on the console.
pub async fn interrupted() {
    INTERRUPT.wait().await;
}

/// Run `sketch` until it fails or Ctrl+C arrives. `Ok` means interrupted.
pub async fn until_interrupted<F>(sketch: F) -> Result<(), SketchError>
where
    F: Future<Output = Result<Infallible, SketchError>>,
{
    match select(sketch, interrupted()).await {
        Either::First(Ok(never)) => match never {},
        Either::First(Err(e)) => {
            error!("Sketch> failed: {}", e);
            crate::println!("Error: {}", e);
            Err(e)
        }
        Either::Second(()) => {
            info!("Sketch> interrupted");
            Ok(())
        }
    }
}

pub struct Console {
    device: UsbDevice<'static, UsbDriver>,
    class: CdcAcmClass<'static, UsbDriver>,
}

impl Console {
    /// Only one console per program, a second call panics.
    pub fn new(usb: Peri<'static, USB>) -> Self {
        static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
        static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
        static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
        static STATE: StaticCell<State> = StaticCell::new();

        let driver = Driver::new(usb, Irqs);

        let mut config = Config::new(0xc0de, 0xcafe);
        config.manufacturer = Some("Sketch");
        config.product = Some("Pico Sketch Console");
        config.serial_number = Some("_SKETCH_");
        config.max_power = 100;
        config.max_packet_size_0 = 64;

        let mut builder = Builder::new(
            driver,
            config,
            CONFIG_DESCRIPTOR.init([0; 256]),
            BOS_DESCRIPTOR.init([0; 256]),
            &mut [], // no msos descriptors
            CONTROL_BUF.init([0; 64]),
        );
        let class = CdcAcmClass::new(&mut builder, STATE.init(State::new()), MAX_PACKET_SIZE);
        let device = builder.build();

        Console { device, class }
    }

    /// Drive the USB device; never returns.
    pub async fn run(self) {
        let Console { mut device, class } = self;
        let (mut tx, mut rx) = class.split();
        join3(device.run(), forward_output(&mut tx), watch_input(&mut rx)).await;
    }
}

async fn forward_output(tx: &mut Sender<'static, UsbDriver>) {
    let mut buffer = [0u8; MAX_PACKET_SIZE as usize];
    loop {
        tx.wait_connection().await;
        info!("Console> connected");
        loop {
            let len = OUTPUT.read(&mut buffer).await;
            if let Err(e) = tx.write_packet(&buffer[..len]).await {
                warn!("Console> write failed: {:?}", e);
                break;
            }
            // a full packet needs a zero length one to end the transfer
            if len == buffer.len() && tx.write_packet(&[]).await.is_err() {
                break;
            }
        }
        info!("Console> disconnected");
    }
}

async fn watch_input(rx: &mut Receiver<'static, UsbDriver>) {
    let mut buffer = [0u8; MAX_PACKET_SIZE as usize];
    loop {
        rx.wait_connection().await;
        while let Ok(len) = rx.read_packet(&mut buffer).await {
            if contains_interrupt(&buffer[..len]) {
                info!("Console> Ctrl+C");
                INTERRUPT.signal(());
            }
        }
    }
}

/// A writer that writes to the console output pipe.
pub struct Writer<'d, const N: usize>(pub &'d Pipe<CriticalSectionRawMutex, N>);

impl<'d, const N: usize> core::fmt::Write for Writer<'d, N> {
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        let bytes = s.as_bytes();
        // a single try_write stops at the ring buffer wraparound
        if let Ok(n) = self.0.try_write(bytes)
            && n < bytes.len()
        {
            let _ = self.0.try_write(&bytes[n..]);
        }
        Ok(())
    }
}
