//! Keyboard commands for adjusting the running visualizer.

use winit::keyboard::KeyCode;

/// Runtime command bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// R: start/stop capturing samples (restart clears the window)
    ToggleRecording,
    /// L: show/hide the envelope trace
    ToggleEnvelopeLine,
    /// T
    RaiseThreshold,
    /// G
    LowerThreshold,
    /// Y: spawn more often
    ShortenInterval,
    /// H: spawn less often
    LengthenInterval,
    /// Esc
    Quit,
}

impl Command {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyR => Some(Self::ToggleRecording),
            KeyCode::KeyL => Some(Self::ToggleEnvelopeLine),
            KeyCode::KeyT => Some(Self::RaiseThreshold),
            KeyCode::KeyG => Some(Self::LowerThreshold),
            KeyCode::KeyY => Some(Self::ShortenInterval),
            KeyCode::KeyH => Some(Self::LengthenInterval),
            KeyCode::Escape => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Key help printed at startup
pub const KEY_HELP: &str = "\
  R     toggle recording (restart clears the window)
  L     toggle envelope line
  T/G   raise/lower threshold
  Y/H   shorten/lengthen spawn interval
  Esc   quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::KeyR), Some(Command::ToggleRecording));
        assert_eq!(Command::from_key(KeyCode::KeyL), Some(Command::ToggleEnvelopeLine));
        assert_eq!(Command::from_key(KeyCode::KeyT), Some(Command::RaiseThreshold));
        assert_eq!(Command::from_key(KeyCode::KeyG), Some(Command::LowerThreshold));
        assert_eq!(Command::from_key(KeyCode::KeyY), Some(Command::ShortenInterval));
        assert_eq!(Command::from_key(KeyCode::KeyH), Some(Command::LengthenInterval));
        assert_eq!(Command::from_key(KeyCode::Escape), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::KeyQ), None);
    }
}
