//! Conversions from raw ADC samples to the values shown on the display.

use crate::config::{ADC_MAX_RAW, CORRECTION_FACTOR, LEVEL_TOLERANCE, SCALE_MAX, SCALE_MIN, THICKNESS_MAX_MM, THICKNESS_MIN_MM};

/// Linear conversion of a raw sample to volts for the given full scale range.
pub fn raw_to_voltage(raw: i16, full_scale: f32) -> f32 {
    (raw as f32 / ADC_MAX_RAW as f32) * full_scale
}

/// Apply the divider correction to a measured voltage.
pub fn correct_voltage(voltage: f32) -> f32 {
    voltage * CORRECTION_FACTOR
}

pub fn corrected_voltage(raw: i16, full_scale: f32) -> f32 {
    correct_voltage(raw_to_voltage(raw, full_scale))
}

/// Map a potentiometer sample onto the thickness range, truncating towards the
/// lower millimetre. Negative samples (noise around ground) count as zero.
pub fn thickness_from_raw(raw: i16) -> u8 {
    let raw = raw.max(0);
    let span = (THICKNESS_MAX_MM - THICKNESS_MIN_MM) as f32;
    let mm = (raw as f32 / ADC_MAX_RAW as f32) * span + THICKNESS_MIN_MM as f32;
    mm as u8
}

/// Expected torch voltage for a thickness.
pub fn thickness_to_scale(thickness_mm: u8) -> f32 {
    let span = (THICKNESS_MAX_MM - THICKNESS_MIN_MM) as f32;
    ((thickness_mm as f32 - THICKNESS_MIN_MM as f32) / span) * (SCALE_MAX - SCALE_MIN) + SCALE_MIN
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Up,
    Down,
    LevelOk,
}

impl Level {
    pub fn compare(scale: f32, voltage: f32) -> Self {
        Self::compare_with_tolerance(scale, voltage, LEVEL_TOLERANCE)
    }

    pub fn compare_with_tolerance(scale: f32, voltage: f32, tolerance: f32) -> Self {
        if scale > voltage + tolerance {
            Level::Up
        } else if scale < voltage - tolerance {
            Level::Down
        } else {
            Level::LevelOk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Up => "Up",
            Level::Down => "Down",
            Level::LevelOk => "Level ok",
        }
    }
}

/// One refresh of the thickness control screen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThicknessReading {
    pub voltage: f32,
    pub thickness_mm: u8,
}

impl ThicknessReading {
    pub fn from_raw(voltage_raw: i16, thickness_raw: i16, full_scale: f32) -> Self {
        ThicknessReading {
            voltage: corrected_voltage(voltage_raw, full_scale),
            thickness_mm: thickness_from_raw(thickness_raw),
        }
    }

    pub fn scale(&self) -> f32 {
        thickness_to_scale(self.thickness_mm)
    }

    pub fn level(&self) -> Level {
        Level::compare(self.scale(), self.voltage)
    }
}
