use super::Window;
use glitch_rate_common::Real;
use std::collections::VecDeque;

/// Simple moving average over a fixed number of values.
#[derive(Default, Clone)]
pub(crate) struct MovingAverage {
    window: VecDeque<Real>,
    size: usize,
}

impl MovingAverage {
    pub(crate) fn new(size: usize) -> Self {
        MovingAverage {
            window: VecDeque::with_capacity(size),
            size,
        }
    }

    fn is_full(&self) -> bool {
        self.window.len() == self.size
    }
}

impl Window for MovingAverage {
    type InputType = Real;
    type OutputType = Real;

    fn push(&mut self, value: Real) -> bool {
        if self.is_full() {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.is_full()
    }

    /// The sum is taken afresh over the window each time, so equal inputs
    /// always produce identical outputs.
    fn output(&self) -> Option<Real> {
        self.is_full()
            .then(|| self.window.iter().sum::<Real>() / self.size as Real)
    }
}
