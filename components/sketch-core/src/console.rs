//! Host console conventions shared by the sketches.

/// ETX, what a terminal sends for Ctrl+C.
pub const INTERRUPT_BYTE: u8 = 0x03;

/// Printed by the GPIO sketches once their outputs are safe.
pub const STOPPED_MESSAGE: &str = "Program stopped";

/// Printed by the display sketches before and after blanking the screen.
pub const INTERRUPTED_MESSAGE: &str = "Program interrupted by user. Exiting...";
pub const DISPLAY_CLEARED_MESSAGE: &str = "Display cleared. Program terminated.";

pub fn contains_interrupt(received: &[u8]) -> bool {
    received.contains(&INTERRUPT_BYTE)
}

/// Why a sketch loop ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    Interrupted,
    Failed,
}

impl StopReason {
    /// Line printed before a display sketch blanks its screen. A failure
    /// already printed its error, so it gets none.
    pub fn exit_notice(&self) -> Option<&'static str> {
        match self {
            StopReason::Interrupted => Some(INTERRUPTED_MESSAGE),
            StopReason::Failed => None,
        }
    }
}

impl<E> From<Result<(), E>> for StopReason {
    fn from(outcome: Result<(), E>) -> Self {
        match outcome {
            Ok(()) => StopReason::Interrupted,
            Err(_) => StopReason::Failed,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn finds_ctrl_c_anywhere() {
        assert!(contains_interrupt(&[0x03]));
        assert!(contains_interrupt(b"abc\x03def"));
        assert!(!contains_interrupt(b"plain text\r\n"));
        assert!(!contains_interrupt(&[]));
    }

    #[test]
    fn only_interruption_claims_the_user_stopped() {
        let interrupted = StopReason::from(Ok::<(), ()>(()));
        assert_eq!(interrupted, StopReason::Interrupted);
        assert_eq!(interrupted.exit_notice(), Some(INTERRUPTED_MESSAGE));

        let failed = StopReason::from(Err::<(), _>("ADC read failed"));
        assert_eq!(failed, StopReason::Failed);
        assert_eq!(failed.exit_notice(), None);
    }
}
