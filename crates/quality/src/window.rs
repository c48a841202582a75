/// Fixed-capacity FIFO of frame-rate samples.
#[derive(Debug, Clone)]
pub struct FpsWindow {
    history: Vec<f32>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FpsWindow {
    /// `capacity` must be non-zero; a zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![0.0; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    /// Record a sample, evicting the oldest when full.
    pub fn push(&mut self, fps: f32) {
        self.history[self.index] = fps;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn samples(&self) -> &[f32] {
        &self.history[..self.len()]
    }

    /// Arithmetic mean of the retained samples, or `None` when empty.
    pub fn mean(&self) -> Option<f32> {
        let samples = self.samples();
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f32>() / samples.len() as f32)
    }

    pub fn min(&self) -> Option<f32> {
        self.samples().iter().copied().reduce(f32::min)
    }

    pub fn max(&self) -> Option<f32> {
        self.samples().iter().copied().reduce(f32::max)
    }

    pub fn len(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
