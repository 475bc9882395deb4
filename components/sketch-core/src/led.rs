use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;

use crate::GpioError;

/// Active-high LED that remembers its last driven state.
pub struct Led<P: OutputPin> {
    pin: P,
    is_on: bool,
}

impl<P: OutputPin> Led<P> {
    /// Wrap the pin and drive it OFF.
    pub fn new(pin: P) -> Result<Self, GpioError> {
        let mut led = Led { pin, is_on: true };
        led.off()?;
        Ok(led)
    }

    pub fn set(&mut self, on: bool) -> Result<(), GpioError> {
        if on {
            self.pin.set_high().map_err(|_| GpioError)?;
        } else {
            self.pin.set_low().map_err(|_| GpioError)?;
        }
        self.is_on = on;
        Ok(())
    }

    #[inline]
    pub fn on(&mut self) -> Result<(), GpioError> {
        self.set(true)
    }

    #[inline]
    pub fn off(&mut self) -> Result<(), GpioError> {
        self.set(false)
    }

    pub fn toggle(&mut self) -> Result<(), GpioError> {
        self.set(!self.is_on)
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> P {
        self.pin
    }
}

/// One on/off cycle, `half_period` each.
pub async fn blink_once<P: OutputPin>(led: &mut Led<P>, half_period: Duration) -> Result<(), GpioError> {
    led.on()?;
    Timer::after(half_period).await;
    led.off()?;
    Timer::after(half_period).await;
    Ok(())
}

/// Blink until the future is dropped or the pin fails.
pub async fn blink<P: OutputPin>(led: &mut Led<P>, half_period: Duration) -> Result<Infallible, GpioError> {
    loop {
        blink_once(led, half_period).await?;
    }
}

/// Blinking on/off switch shared between a button poller and a [`Blinker`].
pub struct BlinkControl<M: RawMutex> {
    active: AtomicBool,
    wake: Signal<M, ()>,
    stopped: Signal<M, ()>,
}

impl<M: RawMutex> BlinkControl<M> {
    pub const fn new() -> Self {
        BlinkControl {
            active: AtomicBool::new(false),
            wake: Signal::new(),
            stopped: Signal::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn start(&self) {
        if !self.active.swap(true, Ordering::AcqRel) {
            debug!("Blink> start");
            self.wake.signal(());
        }
    }

    /// Clear the flag and wait until the blinker finished its cycle and
    /// turned the LED off.
    pub async fn stop(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            debug!("Blink> stop requested");
            self.stopped.wait().await;
            debug!("Blink> stopped");
        }
    }

    /// Flip blinking, returns whether it is now active.
    pub async fn toggle(&self) -> bool {
        if self.is_active() {
            self.stop().await;
            false
        } else {
            self.start();
            true
        }
    }
}

impl<M: RawMutex> Default for BlinkControl<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker side of a [`BlinkControl`]; owns the LED.
pub struct Blinker<'a, M: RawMutex, P: OutputPin> {
    led: Led<P>,
    control: &'a BlinkControl<M>,
    half_period: Duration,
}

impl<'a, M: RawMutex, P: OutputPin> Blinker<'a, M, P> {
    pub fn new(led: Led<P>, control: &'a BlinkControl<M>, half_period: Duration) -> Self {
        Blinker { led, control, half_period }
    }

    pub async fn run(&mut self) -> Result<Infallible, GpioError> {
        loop {
            // every activation signals exactly once
            self.control.wake.wait().await;
            while self.control.is_active() {
                blink_once(&mut self.led, self.half_period).await?;
            }
            self.led.off()?;
            self.control.stopped.signal(());
        }
    }

    pub fn free(self) -> Led<P> {
        self.led
    }
}

#[cfg(test)]
pub mod tests {
    use std::{cell::RefCell, rc::Rc};

    use embassy_futures::select::{Either, select};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use serial_test::serial;

    use super::*;

    #[derive(Clone, Default)]
    pub struct RecordingPin {
        pub levels: Rc<RefCell<Vec<bool>>>,
    }

    impl RecordingPin {
        pub fn last(&self) -> Option<bool> {
            self.levels.borrow().last().copied()
        }

        pub fn count_high(&self) -> usize {
            self.levels.borrow().iter().filter(|level| **level).count()
        }
    }

    impl embedded_hal::digital::ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.borrow_mut().push(true);
            Ok(())
        }
    }

    #[test]
    fn led_starts_off_and_toggles() {
        let pin = RecordingPin::default();
        let mut led = Led::new(pin.clone()).unwrap();
        assert!(!led.is_on());
        assert_eq!(pin.last(), Some(false));

        led.toggle().unwrap();
        assert!(led.is_on());
        assert_eq!(pin.last(), Some(true));

        led.toggle().unwrap();
        led.on().unwrap();
        assert_eq!(*pin.levels.borrow(), vec![false, true, false, true]);
    }

    #[serial(timing)]
    #[tokio::test]
    async fn blink_alternates() {
        let pin = RecordingPin::default();
        let mut led = Led::new(pin.clone()).unwrap();
        let result = select(blink(&mut led, Duration::from_millis(10)), Timer::after_millis(75)).await;
        assert!(matches!(result, Either::Second(())));

        let levels = pin.levels.borrow();
        assert!(levels.len() >= 5, "only {} pin writes", levels.len());
        for pair in levels.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[serial(timing)]
    #[tokio::test]
    async fn control_start_and_stop() {
        let control = BlinkControl::<CriticalSectionRawMutex>::new();
        let pin = RecordingPin::default();
        let mut blinker = Blinker::new(Led::new(pin.clone()).unwrap(), &control, Duration::from_millis(5));

        let sequence = async {
            assert!(control.toggle().await);
            Timer::after_millis(40).await;
            assert!(!control.toggle().await);
            pin.count_high()
        };
        let high_count = match select(blinker.run(), sequence).await {
            Either::First(_) => panic!("blinker ended"),
            Either::Second(count) => count,
        };

        assert!(high_count >= 2, "blinked {} times", high_count);
        assert!(!control.is_active());
        assert_eq!(pin.last(), Some(false));
        assert!(!blinker.free().is_on());
    }

    #[serial(timing)]
    #[tokio::test]
    async fn control_restarts_after_stop() {
        let control = BlinkControl::<CriticalSectionRawMutex>::new();
        let pin = RecordingPin::default();
        let mut blinker = Blinker::new(Led::new(pin.clone()).unwrap(), &control, Duration::from_millis(5));

        let sequence = async {
            for _ in 0..3 {
                control.start();
                Timer::after_millis(15).await;
                control.stop().await;
                assert_eq!(pin.last(), Some(false));
                let writes = pin.levels.borrow().len();
                Timer::after_millis(15).await;
                // nothing blinks while stopped
                assert_eq!(pin.levels.borrow().len(), writes);
            }
        };
        if let Either::First(_) = select(blinker.run(), sequence).await {
            panic!("blinker ended");
        }
    }

    #[tokio::test]
    async fn stop_when_idle_returns() {
        let control = BlinkControl::<CriticalSectionRawMutex>::default();
        control.stop().await;
        assert!(!control.is_active());
    }
}
