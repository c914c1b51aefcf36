/// A numeric setting stepped through a fixed table (booster range/power)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCycle {
    steps: Vec<u32>,
    value: u32,
}

impl StepCycle {
    pub fn new(steps: Vec<u32>, value: u32) -> Self {
        Self { steps, value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Set an arbitrary value (it need not be one of the steps)
    pub fn set(&mut self, value: u32) {
        self.value = value;
    }

    /// Advance to the next step, wrapping from the last to the first
    ///
    /// A value that is not in the table stays where it is.
    pub fn advance(&mut self) -> u32 {
        if let Some(pos) = self.steps.iter().position(|&step| step == self.value) {
            self.value = self.steps[(pos + 1) % self.steps.len()];
        }
        self.value
    }
}
