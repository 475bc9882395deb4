use embedded_hal::digital::InputPin;

use crate::GpioError;

/// Push button wired to ground with the internal pull-up enabled, so a press
/// reads low.
pub struct Button<P: InputPin> {
    pin: P,
    detector: PressDetector,
}

impl<P: InputPin> Button<P> {
    pub fn new(pin: P) -> Self {
        Button {
            pin,
            detector: PressDetector::default(),
        }
    }

    pub fn is_pressed(&mut self) -> Result<bool, GpioError> {
        self.pin.is_low().map_err(|_| GpioError)
    }

    /// Sample the button, true only on the poll where it went down.
    pub fn poll_press(&mut self) -> Result<bool, GpioError> {
        let pressed = self.is_pressed()?;
        Ok(self.detector.update(pressed))
    }

    pub fn free(self) -> P {
        self.pin
    }
}

/// Released -> pressed edge detector. Holding the button reports one press.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressDetector {
    was_pressed: bool,
}

impl PressDetector {
    pub fn update(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }
}

#[cfg(test)]
pub mod tests {
    use core::convert::Infallible;
    use std::collections::VecDeque;

    use super::*;

    pub struct ScriptedPin {
        pub levels: VecDeque<bool>,
    }

    impl ScriptedPin {
        pub fn new(levels: &[bool]) -> Self {
            ScriptedPin {
                levels: levels.iter().copied().collect(),
            }
        }
    }

    impl embedded_hal::digital::ErrorType for ScriptedPin {
        type Error = Infallible;
    }

    impl InputPin for ScriptedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.levels.pop_front().unwrap_or(true))
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.is_high()?)
        }
    }

    #[test]
    fn detector_reports_edges_only() {
        let mut detector = PressDetector::default();
        let presses: Vec<bool> = [false, true, true, false, true, false, false]
            .into_iter()
            .map(|pressed| detector.update(pressed))
            .collect();
        assert_eq!(presses, vec![false, true, false, false, true, false, false]);
    }

    #[test]
    fn button_is_active_low() {
        // high = released, low = pressed
        let mut button = Button::new(ScriptedPin::new(&[true, false, false, true, false]));
        let presses: Vec<bool> = (0..5).map(|_| button.poll_press().unwrap()).collect();
        assert_eq!(presses, vec![false, true, false, false, true]);
    }

    #[test]
    fn button_held_at_start_counts_once() {
        let mut button = Button::new(ScriptedPin::new(&[false, false, false]));
        assert!(button.poll_press().unwrap());
        assert!(!button.poll_press().unwrap());
        assert!(button.is_pressed().unwrap());
        assert!(button.free().levels.is_empty());
    }
}
