use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/**
 * Fast and simple histogram for non-negative data. Bin counts are atomic so
 * that the histogram can be populated from a parallel iterator.
 */
#[derive(Default, Debug)]
pub struct Histogram {
    bin_counts: Vec<AtomicU32>,
    data_to_index_scale: f32,
    bin_width: f32,
}

impl Histogram {
    pub fn new(num_bins: usize, max_val: f32) -> Self {
        assert!(num_bins > 0, "`num_bins` must be positive!");
        assert!(max_val > 0.0, "`max_val` must be positive!");
        let data_to_index_scale = (num_bins as f32) / max_val;
        Histogram {
            bin_counts: (0..num_bins).map(|_| AtomicU32::new(0)).collect(),
            data_to_index_scale,
            bin_width: 1.0 / data_to_index_scale,
        }
    }

    /// Builds a histogram spanning [0, max_val] and inserts every sample, in parallel.
    pub fn from_samples(num_bins: usize, max_val: f32, samples: &[f32]) -> Self {
        let histogram = Histogram::new(num_bins, max_val);
        samples.par_iter().for_each(|&data| histogram.insert(data));
        histogram
    }

    /// Negative data lands in the first bin, data beyond `max_val` in the last.
    pub fn insert(&self, data: f32) {
        let index = if data <= 0.0 {
            0
        } else {
            ((data * self.data_to_index_scale) as usize).min(self.num_bins() - 1)
        };
        self.bin_counts[index].fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_count(&self) -> u32 {
        self.bin_counts
            .iter()
            .map(|bin| bin.load(Ordering::Relaxed))
            .sum()
    }

    /// Inclusive lower edge of a bin.
    pub fn lower_edge(&self, bin_index: usize) -> f32 {
        self.bin_width * (bin_index as f32)
    }

    /// Exclusive upper edge of a bin.
    pub fn upper_edge(&self, bin_index: usize) -> f32 {
        self.bin_width * ((bin_index + 1) as f32)
    }

    pub fn bin_count(&self, index: usize) -> u32 {
        self.bin_counts[index].load(Ordering::Relaxed)
    }

    pub fn num_bins(&self) -> usize {
        self.bin_counts.len()
    }

    #[cfg(test)]
    pub fn bin_counts_vec(&self) -> Vec<u32> {
        (0..self.num_bins()).map(|i| self.bin_count(i)).collect()
    }

    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let total = self.total_count();
        let percent_scale = if total == 0 {
            0.0
        } else {
            100.0 / (total as f32)
        };
        writeln!(writer, "Histogram:")?;
        writeln!(writer, "  total count: {}", total)?;
        for i in 0..self.num_bins() {
            let count = self.bin_count(i);
            writeln!(
                writer,
                "  bins[{}]:  [{:.2}, {:.2}) --> {}  ({:.2}%)",
                i,
                self.lower_edge(i),
                self.upper_edge(i),
                count,
                (count as f32) * percent_scale
            )?;
        }
        writeln!(writer)
    }
}

/**
 * Piecewise-linear cumulative distribution function built from a histogram.
 * Used for histogram equalization of the color map: data at the lower edge of
 * the histogram maps to 0.0 and data at the upper edge maps to 1.0.
 */
#[derive(Debug, Default, Clone)]
pub struct CumulativeDistributionFunction {
    // Fraction of the population below each bin edge; length is `n_bins + 1`.
    edge_fractions: Vec<f32>,
    data_to_index_scale: f32,
    pub min_data: f32,
    pub max_data: f32,
}

impl CumulativeDistributionFunction {
    pub fn new(histogram: &Histogram) -> CumulativeDistributionFunction {
        let n_bins = histogram.num_bins();
        let mut edge_fractions = Vec::with_capacity(n_bins + 1);
        let total = histogram.total_count();

        if total > 0 {
            let count_to_fraction = 1.0 / (total as f32);
            let mut accumulated_count = 0;
            edge_fractions.push(0.0);
            for i in 0..n_bins {
                accumulated_count += histogram.bin_count(i);
                edge_fractions.push((accumulated_count as f32) * count_to_fraction);
            }
        }

        CumulativeDistributionFunction {
            edge_fractions,
            data_to_index_scale: histogram.data_to_index_scale,
            min_data: histogram.lower_edge(0),
            max_data: histogram.upper_edge(n_bins - 1),
        }
    }

    /**
     * @param data: data point, same units as would be used in the histogram
     * @return: fractional position within the population of the histogram on [0,1]
     *
     * Note:  if the histogram is empty, then all in-domain queries return 0.5;
     */
    pub fn percentile(&self, data: f32) -> f32 {
        if data <= self.min_data {
            return 0.0;
        }
        if data >= self.max_data {
            return 1.0;
        }
        if self.edge_fractions.is_empty() {
            return 0.5;
        }
        let scaled = data * self.data_to_index_scale;
        let bin_index = (scaled as usize).min(self.edge_fractions.len() - 2);
        let low = self.edge_fractions[bin_index];
        let upp = self.edge_fractions[bin_index + 1];
        low + (upp - low) * (scaled - bin_index as f32)
    }

    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let n_bins = self.edge_fractions.len().saturating_sub(1);
        writeln!(writer, "CDF:")?;
        writeln!(
            writer,
            "  n_bins: {}, min_data: {}, max_data: {}",
            n_bins, self.min_data, self.max_data
        )?;
        for (i, fraction) in self.edge_fractions.iter().enumerate() {
            let data = (i as f32) / self.data_to_index_scale;
            writeln!(writer, "  {:.2}  -->  {:.4}", data, fraction)?;
        }
        writeln!(writer)
    }
}
