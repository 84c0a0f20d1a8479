/// Number of bins, one per representable label.
pub const BINS: usize = 256;

/// Label counts over the bounded domain `0..=255`.
#[derive(Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; BINS],
}

impl Histogram {
    pub fn new() -> Self {
        Self { bins: [0; BINS] }
    }

    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
        let mut hist = Self::new();
        for value in values {
            hist.add(value);
        }
        hist
    }

    pub fn clear(&mut self) {
        self.bins.fill(0);
    }

    #[inline]
    pub fn add(&mut self, value: u8) {
        self.bins[value as usize] += 1;
    }

    pub fn count(&self, value: u8) -> u32 {
        self.bins[value as usize]
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    pub fn bins(&self) -> &[u32; BINS] {
        &self.bins
    }

    /// Returns the most frequent label.
    ///
    /// Ties go to the smallest label. An empty histogram yields 0.
    pub fn mode(&self) -> u8 {
        let mut best = 0usize;
        let mut best_count = self.bins[0];
        for (value, &count) in self.bins.iter().enumerate().skip(1) {
            if count > best_count {
                best = value;
                best_count = count;
            }
        }
        best as u8
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.bins.iter().enumerate().filter(|(_, c)| **c > 0))
            .finish()
    }
}
