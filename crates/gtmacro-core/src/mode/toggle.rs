use std::fmt;

/// Two-state feature mode: a user hotkey flips it, server text can force it off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Toggle {
    #[default]
    Off,
    On,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }

    /// Flip the mode and return the new value
    pub fn flip(&mut self) -> Toggle {
        *self = match self {
            Toggle::Off => Toggle::On,
            Toggle::On => Toggle::Off,
        };
        *self
    }

    /// Supervisory override: force `Off`
    ///
    /// Returns true when the mode was `On`, i.e. when the caller still owes
    /// the corrective action for the switch-off.
    pub fn force_off(&mut self) -> bool {
        let was_on = self.is_on();
        *self = Toggle::Off;
        was_on
    }
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Self {
        if on {
            Toggle::On
        } else {
            Toggle::Off
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toggle::Off => write!(f, "OFF"),
            Toggle::On => write!(f, "ON"),
        }
    }
}
