/// Rising-edge detector over a sampled level signal
///
/// The host only reports whether a button or modifier is down right now.
/// Comparing each sample with the previous one turns that into a single
/// event per press, however long the input is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample; true only on a false -> true transition
    pub fn update(&mut self, level: bool) -> bool {
        let rising = level && !self.previous;
        self.previous = level;
        rising
    }

    /// Level seen at the last sample
    pub fn is_high(&self) -> bool {
        self.previous
    }
}
