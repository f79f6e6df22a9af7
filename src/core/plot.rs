use super::fastq::Record;
use crate::model::{
    ContentRow, LengthRow, MAX_Q, PlotKind, PlotSeries, QualHist, QualityRow, SampleSize,
    quantile_from_hist,
};

#[derive(Clone, Copy, Debug, Default)]
struct BaseCounts {
    a: u64,
    c: u64,
    g: u64,
    t: u64,
    n: u64,
}

/// Per-position accumulator over a sampled set of records. Position
/// vectors grow on demand to the longest read seen.
struct Agg {
    per_pos_qual: Vec<QualHist>,
    per_pos_base: Vec<BaseCounts>,
    length_hist: Vec<u64>,
}

impl Agg {
    fn new() -> Self {
        Self {
            per_pos_qual: Vec::new(),
            per_pos_base: Vec::new(),
            length_hist: Vec::new(),
        }
    }

    fn update(&mut self, record: &Record, phred_offset: u8) {
        let len = record.seq.len();
        if self.length_hist.len() <= len {
            self.length_hist.resize(len + 1, 0);
        }
        self.length_hist[len] += 1;
        if len == 0 {
            return;
        }
        if self.per_pos_qual.len() < len {
            self.per_pos_qual.resize(len, [0u64; MAX_Q + 1]);
        }
        if self.per_pos_base.len() < len {
            self.per_pos_base.resize(len, BaseCounts::default());
        }
        for i in 0..len {
            let upper = record.seq[i] & 0xDF;
            let base = &mut self.per_pos_base[i];
            match upper {
                b'A' => base.a += 1,
                b'C' => base.c += 1,
                b'G' => base.g += 1,
                b'T' => base.t += 1,
                b'N' => base.n += 1,
                _ => {}
            }
            let q_raw = record.qual[i].saturating_sub(phred_offset);
            let q_bin = (q_raw as usize).min(MAX_Q);
            self.per_pos_qual[i][q_bin] += 1;
        }
    }

    fn quality_rows(&self) -> Vec<QualityRow> {
        let mut rows = Vec::with_capacity(self.per_pos_qual.len());
        for (i, hist) in self.per_pos_qual.iter().enumerate() {
            let mut total: u64 = 0;
            let mut sum: u64 = 0;
            for (q, &count) in hist.iter().enumerate() {
                total += count;
                sum += count * q as u64;
            }
            let mean = if total == 0 {
                0.0
            } else {
                sum as f64 / total as f64
            };
            rows.push(QualityRow {
                base: i + 1,
                mean,
                median: quantile_from_hist(hist, 0.5),
                lower_quartile: quantile_from_hist(hist, 0.25),
                upper_quartile: quantile_from_hist(hist, 0.75),
                p10: quantile_from_hist(hist, 0.10),
                p90: quantile_from_hist(hist, 0.90),
            });
        }
        rows
    }

    fn content_rows(&self) -> Vec<ContentRow> {
        let mut rows = Vec::with_capacity(self.per_pos_base.len());
        for (i, bc) in self.per_pos_base.iter().enumerate() {
            // Called bases only; N stays out of the denominator.
            let denom = bc.a + bc.c + bc.g + bc.t;
            let (g, a, t, c) = if denom == 0 {
                (0.0, 0.0, 0.0, 0.0)
            } else {
                let d = denom as f64;
                (
                    bc.g as f64 * 100.0 / d,
                    bc.a as f64 * 100.0 / d,
                    bc.t as f64 * 100.0 / d,
                    bc.c as f64 * 100.0 / d,
                )
            };
            rows.push(ContentRow {
                base: i + 1,
                g,
                a,
                t,
                c,
            });
        }
        rows
    }

    fn length_rows(&self) -> Vec<LengthRow> {
        self.length_hist
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(length, &count)| LengthRow { length, count })
            .collect()
    }
}

/// Builds the series for `kind` over the first `sample.bound(..)` records
/// in file order.
pub fn build_series(
    records: &[Record],
    phred_offset: u8,
    kind: PlotKind,
    sample: SampleSize,
) -> PlotSeries {
    let take = sample.bound(records.len());
    let mut agg = Agg::new();
    for record in &records[..take] {
        agg.update(record, phred_offset);
    }
    match kind {
        PlotKind::PerBaseQuality => PlotSeries::Quality(agg.quality_rows()),
        PlotKind::PerBaseContent => PlotSeries::Content(agg.content_rows()),
        PlotKind::LengthDistribution => PlotSeries::Lengths(agg.length_rows()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fastq::parse_all;

    fn records(bytes: &[u8]) -> Vec<Record> {
        parse_all(bytes).unwrap()
    }

    #[test]
    fn test_quality_series_means_per_position() {
        // Phred+33 scores: r1 = [0, 10], r2 = [20, 30].
        let recs = records(b"@r1\nAC\n+\n!+\n@r2\nAC\n+\n5?\n");
        let series = build_series(&recs, 33, PlotKind::PerBaseQuality, SampleSize::All);
        let PlotSeries::Quality(rows) = series else {
            panic!("expected quality series");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].base, 1);
        assert!((rows[0].mean - 10.0).abs() < 1e-9);
        assert!((rows[1].mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_quality_series_collapses_for_uniform_scores() {
        let recs = records(b"@r1\nACGT\n+\n))))\n"); // ')' = Q8
        let series = build_series(&recs, 33, PlotKind::PerBaseQuality, SampleSize::All);
        let PlotSeries::Quality(rows) = series else {
            panic!("expected quality series");
        };
        for row in rows {
            assert_eq!(row.median, 8);
            assert_eq!(row.lower_quartile, 8);
            assert_eq!(row.upper_quartile, 8);
            assert_eq!(row.p10, 8);
            assert_eq!(row.p90, 8);
            assert!((row.mean - 8.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quality_respects_phred64_offset() {
        let recs = records(b"@r1\nAC\n+\nh`\n"); // 'h' = 104, '`' = 96
        let series = build_series(&recs, 64, PlotKind::PerBaseQuality, SampleSize::All);
        let PlotSeries::Quality(rows) = series else {
            panic!("expected quality series");
        };
        assert!((rows[0].mean - 40.0).abs() < 1e-9);
        assert!((rows[1].mean - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_series_percentages() {
        let recs = records(b"@r1\nAC\n+\nII\n@r2\nAC\n+\nII\n@r3\nCC\n+\nII\n");
        let series = build_series(&recs, 33, PlotKind::PerBaseContent, SampleSize::All);
        let PlotSeries::Content(rows) = series else {
            panic!("expected content series");
        };
        assert_eq!(rows.len(), 2);
        assert!((rows[0].a - 200.0 / 3.0).abs() < 1e-9);
        assert!((rows[0].c - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(rows[0].g, 0.0);
        assert!((rows[1].c - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_series_lowercase_and_n() {
        // Lowercase counts like uppercase; N-only positions report zeros.
        let recs = records(b"@r1\naN\n+\nII\n");
        let series = build_series(&recs, 33, PlotKind::PerBaseContent, SampleSize::All);
        let PlotSeries::Content(rows) = series else {
            panic!("expected content series");
        };
        assert!((rows[0].a - 100.0).abs() < 1e-9);
        assert_eq!(rows[1].a, 0.0);
        assert_eq!(rows[1].g, 0.0);
        assert_eq!(rows[1].t, 0.0);
        assert_eq!(rows[1].c, 0.0);
    }

    #[test]
    fn test_length_series_buckets_ascending() {
        let recs = records(b"@r1\nACGT\n+\nIIII\n@r2\nAC\n+\nII\n@r3\nACGT\n+\nIIII\n");
        let series = build_series(&recs, 33, PlotKind::LengthDistribution, SampleSize::All);
        let PlotSeries::Lengths(rows) = series else {
            panic!("expected length series");
        };
        assert_eq!(
            rows,
            vec![
                LengthRow {
                    length: 2,
                    count: 1
                },
                LengthRow {
                    length: 4,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_sample_bound_limits_aggregation() {
        let recs = records(
            b"@r1\nAC\n+\nII\n@r2\nAC\n+\nII\n@r3\nAC\n+\nII\n@r4\nAC\n+\nII\n@r5\nAC\n+\nII\n",
        );
        let series = build_series(&recs, 33, PlotKind::LengthDistribution, SampleSize::Limit(3));
        let PlotSeries::Lengths(rows) = series else {
            panic!("expected length series");
        };
        assert_eq!(rows, vec![LengthRow { length: 2, count: 3 }]);
    }

    #[test]
    fn test_unbounded_aggregates_everything() {
        let recs = records(
            b"@r1\nAC\n+\nII\n@r2\nAC\n+\nII\n@r3\nAC\n+\nII\n@r4\nAC\n+\nII\n@r5\nAC\n+\nII\n",
        );
        let series = build_series(&recs, 33, PlotKind::LengthDistribution, SampleSize::All);
        let PlotSeries::Lengths(rows) = series else {
            panic!("expected length series");
        };
        assert_eq!(rows[0].count, 5);
    }

    #[test]
    fn test_ragged_lengths_cover_long_tail_positions() {
        let recs = records(b"@r1\nACGTACGT\n+\nIIIIIIII\n@r2\nAC\n+\nII\n");
        let series = build_series(&recs, 33, PlotKind::PerBaseQuality, SampleSize::All);
        let PlotSeries::Quality(rows) = series else {
            panic!("expected quality series");
        };
        // Positions past the short read still get rows from the long one.
        assert_eq!(rows.len(), 8);
        assert!((rows[7].mean - 40.0).abs() < 1e-9); // 'I' = Q40
    }
}
