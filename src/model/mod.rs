//! Shared vocabulary between the session shell, the FASTQ reader, and the
//! chart surface.

/// The three quality-control charts the inspector can draw.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlotKind {
    PerBaseQuality,
    PerBaseContent,
    LengthDistribution,
}

impl PlotKind {
    pub const ALL: [PlotKind; 3] = [
        PlotKind::PerBaseQuality,
        PlotKind::PerBaseContent,
        PlotKind::LengthDistribution,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlotKind::PerBaseQuality => "Per Base Sequence Quality",
            PlotKind::PerBaseContent => "Per Base Sequence Content",
            PlotKind::LengthDistribution => "Sequence Length Distribution",
        }
    }
}

/// Upper bound on the number of records a plot aggregates over.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleSize {
    Limit(usize),
    All,
}

impl SampleSize {
    /// The fixed choices offered in the sample-size selector.
    pub const CHOICES: [SampleSize; 4] = [
        SampleSize::Limit(1000),
        SampleSize::Limit(5000),
        SampleSize::Limit(10000),
        SampleSize::All,
    ];

    pub fn label(self) -> String {
        match self {
            SampleSize::Limit(n) => n.to_string(),
            SampleSize::All => "All".to_string(),
        }
    }

    /// Number of records to aggregate out of `total` available.
    pub fn bound(self, total: usize) -> usize {
        match self {
            SampleSize::Limit(n) => n.min(total),
            SampleSize::All => total,
        }
    }
}

/// Highest Phred quality score tracked per position.
pub const MAX_Q: usize = 93;

/// Histogram of quality scores 0..=MAX_Q at one read position.
pub type QualHist = [u64; MAX_Q + 1];

/// Score at the `q`-quantile of a count histogram (nearest-rank).
pub fn quantile_from_hist(hist: &[u64], q: f64) -> u8 {
    let mut total: u64 = 0;
    for &v in hist {
        total += v;
    }
    if total == 0 {
        return 0;
    }
    let mut rank = (q * total as f64).ceil() as u64;
    if rank < 1 {
        rank = 1;
    }
    let mut cum: u64 = 0;
    for (i, &v) in hist.iter().enumerate() {
        cum += v;
        if cum >= rank {
            return i as u8;
        }
    }
    (hist.len() - 1) as u8
}

/// Five-number quality summary plus mean at one read position.
#[derive(Clone, Debug, PartialEq)]
pub struct QualityRow {
    /// 1-based read position.
    pub base: usize,
    pub mean: f64,
    pub median: u8,
    pub lower_quartile: u8,
    pub upper_quartile: u8,
    pub p10: u8,
    pub p90: u8,
}

/// Base percentages of the called bases at one read position.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRow {
    /// 1-based read position.
    pub base: usize,
    pub g: f64,
    pub a: f64,
    pub t: f64,
    pub c: f64,
}

/// One bucket of the sequence-length histogram.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LengthRow {
    pub length: usize,
    pub count: u64,
}

/// Aggregated data for one chart, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum PlotSeries {
    Quality(Vec<QualityRow>),
    Content(Vec<ContentRow>),
    Lengths(Vec<LengthRow>),
}

impl PlotSeries {
    pub fn kind(&self) -> PlotKind {
        match self {
            PlotSeries::Quality(_) => PlotKind::PerBaseQuality,
            PlotSeries::Content(_) => PlotKind::PerBaseContent,
            PlotSeries::Lengths(_) => PlotKind::LengthDistribution,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PlotSeries::Quality(rows) => rows.is_empty(),
            PlotSeries::Content(rows) => rows.is_empty(),
            PlotSeries::Lengths(rows) => rows.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_from_hist_median() {
        let mut hist = [0u64; MAX_Q + 1];
        hist[10] = 2;
        hist[20] = 1;
        hist[30] = 2;
        assert_eq!(quantile_from_hist(&hist, 0.5), 20);
        assert_eq!(quantile_from_hist(&hist, 0.10), 10);
        assert_eq!(quantile_from_hist(&hist, 0.90), 30);
    }

    #[test]
    fn test_quantile_from_hist_empty() {
        let hist = [0u64; MAX_Q + 1];
        assert_eq!(quantile_from_hist(&hist, 0.5), 0);
    }

    #[test]
    fn test_quantile_from_hist_single_bin() {
        let mut hist = [0u64; MAX_Q + 1];
        hist[37] = 100;
        for q in [0.10, 0.25, 0.5, 0.75, 0.90] {
            assert_eq!(quantile_from_hist(&hist, q), 37);
        }
    }

    #[test]
    fn test_sample_size_bound() {
        assert_eq!(SampleSize::Limit(5000).bound(200), 200);
        assert_eq!(SampleSize::Limit(1000).bound(25_000), 1000);
        assert_eq!(SampleSize::All.bound(25_000), 25_000);
        assert_eq!(SampleSize::All.bound(0), 0);
    }

    #[test]
    fn test_sample_size_labels() {
        let labels: Vec<String> = SampleSize::CHOICES.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["1000", "5000", "10000", "All"]);
    }
}
