//! Timing of a free running PWM slice: counter runs `0..=top` once per period
//! at `sys_clk / divider`.

#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    FrequencyOutOfRange { freq_hz: u32 },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    pub divider: u8,
    pub top: u16,
}

impl PwmTiming {
    pub fn frequency_hz(&self, sys_clk_hz: u32) -> u32 {
        sys_clk_hz / (self.divider as u32 * (self.top as u32 + 1))
    }
}

/// Smallest integer divider that fits one period of `freq_hz` into the 16 bit counter.
pub fn pwm_timing(sys_clk_hz: u32, freq_hz: u32) -> Result<PwmTiming, PwmError> {
    if freq_hz == 0 {
        return Err(PwmError::FrequencyOutOfRange { freq_hz });
    }
    let counts = sys_clk_hz / freq_hz;
    if counts < 2 {
        return Err(PwmError::FrequencyOutOfRange { freq_hz });
    }
    let divider = counts.div_ceil(u16::MAX as u32 + 1).max(1);
    if divider > u8::MAX as u32 {
        return Err(PwmError::FrequencyOutOfRange { freq_hz });
    }
    let timing = PwmTiming {
        divider: divider as u8,
        top: (counts / divider - 1) as u16,
    };
    debug!("PWM> {} Hz => divider {} top {}", freq_hz, timing.divider, timing.top);
    Ok(timing)
}
