use std::time::Duration;

/// Delay between two simulation steps: `1000 / (base_fps * multiplier)` milliseconds.
pub fn tick_delay(base_fps: u32, multiplier: u32) -> Duration {
    let steps_per_sec = u64::from(base_fps.max(1)) * u64::from(multiplier.max(1));
    Duration::from_nanos(1_000_000_000 / steps_per_sec)
}

/// Player-chosen speed, clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedMultiplier {
    value: u32,
    min: u32,
    max: u32,
}

impl SpeedMultiplier {
    pub fn new(initial: u32, min: u32, max: u32) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        Self {
            value: initial.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn at_min(&self) -> bool {
        self.value <= self.min
    }

    pub fn at_max(&self) -> bool {
        self.value >= self.max
    }

    /// Returns whether the value changed.
    pub fn adjust(&mut self, delta: i32) -> bool {
        let next = (i64::from(self.value) + i64::from(delta))
            .clamp(i64::from(self.min), i64::from(self.max)) as u32;
        let changed = next != self.value;
        self.value = next;
        changed
    }

    pub fn tick_delay(&self, base_fps: u32) -> Duration {
        tick_delay(base_fps, self.value)
    }
}
