use serde::Serialize;

/// Mean and population standard deviation of one pixel population.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PopulationStats {
    pub mean: f64,
    pub std: f64,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub top: PopulationStats,
    pub bottom: PopulationStats,
}

/// Per-frame top/bottom statistics of one acquisition, aligned to `time_s`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopulationSeries {
    pub time_s: Vec<f64>,
    pub top_mean: Vec<f64>,
    pub top_std: Vec<f64>,
    pub bottom_mean: Vec<f64>,
    pub bottom_std: Vec<f64>,
}

impl PopulationSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time_s: Vec::with_capacity(n),
            top_mean: Vec::with_capacity(n),
            top_std: Vec::with_capacity(n),
            bottom_mean: Vec::with_capacity(n),
            bottom_std: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn push(&mut self, time_s: f64, stats: FrameStats) {
        self.time_s.push(time_s);
        self.top_mean.push(stats.top.mean);
        self.top_std.push(stats.top.std);
        self.bottom_mean.push(stats.bottom.mean);
        self.bottom_std.push(stats.bottom.std);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSample {
    pub value: f64,
    pub error: f64,
}

/// Contrast and its uncertainty per frame of one acquisition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatioSeries {
    pub time_s: Vec<f64>,
    pub ratio: Vec<f64>,
    pub error: Vec<f64>,
}

impl RatioSeries {
    pub fn len(&self) -> usize {
        self.ratio.len()
    }
}

/// Replicate-averaged contrast of one group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedSeries {
    pub time_s: Vec<f64>,
    pub mean_ratio: Vec<f64>,
    pub combined_error: Vec<f64>,
    pub n_replicates: usize,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.mean_ratio.len()
    }
}
