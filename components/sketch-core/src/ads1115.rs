//! Minimal async driver for the TI ADS1115 16 bit ADC, single-shot and
//! single-ended only.

use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;

use crate::convert::corrected_voltage;

/// Address with ADDR tied to GND.
pub const DEFAULT_ADDRESS: u8 = 0x48;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const CONFIG_OS: u16 = 1 << 15;
const CONFIG_MODE_SINGLE: u16 = 1 << 8;
const CONFIG_COMP_QUEUE_DISABLE: u16 = 0b11;

const POLL_INTERVAL: Duration = Duration::from_millis(1);
const MAX_POLLS: u32 = 20;

#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ads1115Error<E> {
    I2c(E),
    InvalidChannel(u8),
    Timeout,
}

/// Programmable gain, named after the multiplier of the reference range.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    TwoThirds,
    One,
    Two,
    Four,
    Eight,
    Sixteen,
}

impl Gain {
    /// Positive full scale voltage of the range.
    pub fn full_scale(&self) -> f32 {
        match self {
            Gain::TwoThirds => 6.144,
            Gain::One => 4.096,
            Gain::Two => 2.048,
            Gain::Four => 1.024,
            Gain::Eight => 0.512,
            Gain::Sixteen => 0.256,
        }
    }

    fn bits(&self) -> u16 {
        let pga: u16 = match self {
            Gain::TwoThirds => 0b000,
            Gain::One => 0b001,
            Gain::Two => 0b010,
            Gain::Four => 0b011,
            Gain::Eight => 0b100,
            Gain::Sixteen => 0b101,
        };
        pga << 9
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    Sps8,
    Sps16,
    Sps32,
    Sps64,
    Sps128,
    Sps250,
    Sps475,
    Sps860,
}

impl DataRate {
    fn bits(&self) -> u16 {
        let dr: u16 = match self {
            DataRate::Sps8 => 0b000,
            DataRate::Sps16 => 0b001,
            DataRate::Sps32 => 0b010,
            DataRate::Sps64 => 0b011,
            DataRate::Sps128 => 0b100,
            DataRate::Sps250 => 0b101,
            DataRate::Sps475 => 0b110,
            DataRate::Sps860 => 0b111,
        };
        dr << 5
    }
}

/// Config register value starting a single-shot conversion of `channel` against GND.
pub fn single_shot_config(channel: u8, gain: Gain, rate: DataRate) -> u16 {
    let mux = (0b100 | (channel as u16 & 0b11)) << 12;
    CONFIG_OS | mux | gain.bits() | CONFIG_MODE_SINGLE | rate.bits() | CONFIG_COMP_QUEUE_DISABLE
}

pub struct Ads1115<I2C: I2c> {
    i2c: I2C,
    address: u8,
    gain: Gain,
    rate: DataRate,
}

impl<I2C: I2c> Ads1115<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Ads1115 {
            i2c,
            address,
            gain: Gain::Two,
            rate: DataRate::Sps128,
        }
    }

    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn set_data_rate(&mut self, rate: DataRate) {
        self.rate = rate;
    }

    /// Raw signed conversion result of a single-ended read on `channel` (0..=3).
    pub async fn read(&mut self, channel: u8) -> Result<i16, Ads1115Error<I2C::Error>> {
        if channel > 3 {
            return Err(Ads1115Error::InvalidChannel(channel));
        }
        let config = single_shot_config(channel, self.gain, self.rate);
        trace!("ADS1115> start A{} config {:X}", channel, config);
        self.write_register(REG_CONFIG, config).await.map_err(Ads1115Error::I2c)?;
        self.wait_for_conversion().await?;
        let raw = self.read_register(REG_CONVERSION).await.map_err(Ads1115Error::I2c)? as i16;
        trace!("ADS1115> A{} raw {}", channel, raw);
        Ok(raw)
    }

    /// Corrected voltage on `channel` for the current gain.
    pub async fn read_voltage(&mut self, channel: u8) -> Result<f32, Ads1115Error<I2C::Error>> {
        let raw = self.read(channel).await?;
        Ok(corrected_voltage(raw, self.gain.full_scale()))
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn wait_for_conversion(&mut self) -> Result<(), Ads1115Error<I2C::Error>> {
        for _ in 0..MAX_POLLS {
            let config = self.read_register(REG_CONFIG).await.map_err(Ads1115Error::I2c)?;
            if config & CONFIG_OS != 0 {
                return Ok(());
            }
            Timer::after(POLL_INTERVAL).await;
        }
        warn!("ADS1115> conversion did not complete");
        Err(Ads1115Error::Timeout)
    }

    async fn write_register(&mut self, register: u8, value: u16) -> Result<(), I2C::Error> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[register, hi, lo]).await
    }

    async fn read_register(&mut self, register: u8) -> Result<u16, I2C::Error> {
        let mut buffer = [0u8; 2];
        self.i2c.write_read(self.address, &[register], &mut buffer).await?;
        Ok(u16::from_be_bytes(buffer))
    }
}

#[cfg(test)]
pub mod tests {
    use approx::assert_relative_eq;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, Operation};

    use super::*;

    #[derive(Default)]
    struct FakeBus {
        written: Vec<(u8, Vec<u8>)>,
        register: u8,
        busy_polls: usize,
        conversion: u16,
        fail: bool,
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for operation in operations.iter_mut() {
                match operation {
                    Operation::Write(bytes) => {
                        self.register = bytes[0];
                        self.written.push((address, bytes.to_vec()));
                    }
                    Operation::Read(buffer) => {
                        let value = match self.register {
                            REG_CONFIG if self.busy_polls > 0 => {
                                self.busy_polls -= 1;
                                0x0000
                            }
                            REG_CONFIG => CONFIG_OS,
                            _ => self.conversion,
                        };
                        buffer.copy_from_slice(&value.to_be_bytes());
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn config_word() {
        assert_eq!(single_shot_config(3, Gain::Four, DataRate::Sps128), 0xF783);
        assert_eq!(single_shot_config(2, Gain::Four, DataRate::Sps128), 0xE783);
        assert_eq!(single_shot_config(0, Gain::TwoThirds, DataRate::Sps8), 0xC103);
        assert_eq!(single_shot_config(1, Gain::Sixteen, DataRate::Sps860), 0xDBE3);
    }

    #[test]
    fn full_scale() {
        assert_relative_eq!(Gain::Four.full_scale(), 1.024);
        assert_relative_eq!(Gain::TwoThirds.full_scale(), 6.144);
    }

    #[tokio::test]
    async fn read_waits_for_conversion() {
        let bus = FakeBus {
            busy_polls: 2,
            conversion: 0x1234,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus);
        adc.set_gain(Gain::Four);
        assert_eq!(adc.read(1).await, Ok(0x1234));

        let bus = adc.release();
        assert_eq!(bus.written[0], (0x48, vec![REG_CONFIG, 0xD7, 0x83]));
        assert_eq!(bus.busy_polls, 0);
        // config write, three config polls, conversion read
        assert_eq!(bus.written.len(), 5);
        assert_eq!(bus.written[4], (0x48, vec![REG_CONVERSION]));
    }

    #[tokio::test]
    async fn data_rate_reaches_config_word() {
        let mut adc = Ads1115::new(FakeBus::default());
        adc.set_gain(Gain::Four);
        adc.set_data_rate(DataRate::Sps860);
        assert_eq!(adc.read(0).await, Ok(0));
        assert_eq!(adc.release().written[0], (0x48, vec![REG_CONFIG, 0xC7, 0xE3]));
    }

    #[tokio::test]
    async fn read_negative_sample() {
        let bus = FakeBus {
            conversion: 0xFFF6,
            ..Default::default()
        };
        let mut adc = Ads1115::with_address(bus, 0x49);
        assert_eq!(adc.read(0).await, Ok(-10));
        assert_eq!(adc.release().written[0].0, 0x49);
    }

    #[tokio::test]
    async fn read_voltage_applies_correction() {
        let bus = FakeBus {
            conversion: 32767,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus);
        adc.set_gain(Gain::Four);
        let voltage = adc.read_voltage(3).await.unwrap();
        assert_relative_eq!(voltage, 1.024 * 1.188679245283019, epsilon = 1e-6);
    }

    #[tokio::test]
    async fn read_rejects_invalid_channel() {
        let mut adc = Ads1115::new(FakeBus::default());
        assert_eq!(adc.read(4).await, Err(Ads1115Error::InvalidChannel(4)));
        assert!(adc.release().written.is_empty());
    }

    #[tokio::test]
    async fn read_times_out() {
        let bus = FakeBus {
            busy_polls: usize::MAX,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus);
        assert_eq!(adc.read(0).await, Err(Ads1115Error::Timeout));
    }

    #[tokio::test]
    async fn read_reports_bus_error() {
        let bus = FakeBus {
            fail: true,
            ..Default::default()
        };
        let mut adc = Ads1115::new(bus);
        assert_eq!(adc.read(0).await, Err(Ads1115Error::I2c(ErrorKind::Other)));
    }
}
