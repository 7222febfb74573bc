use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::tally::IndividualTally;

/// One-pass running mean / sample-variance accumulator (Welford's recurrence).
#[derive(Debug, Default)]
pub struct Variance {
    mean       : f64,
    sum_squares: f64,
    n          : usize,
}

impl Variance {
    pub fn update(&mut self, value: f64) {
        self.n += 1;
        let delta = value - self.mean;
        self.mean += delta / self.n as f64;
        self.sum_squares += delta * (value - self.mean);
    }

    /// Running mean. NaN when no value was recorded.
    pub fn mean(&self) -> f64 {
        match self.n {
            0 => f64::NAN,
            _ => self.mean
        }
    }

    /// Unbiased sample standard deviation. `None` below two recorded values,
    /// where the estimator is undefined.
    pub fn sample_std_dev(&self) -> Option<f64> {
        (self.n >= 2).then(|| (self.sum_squares / (self.n - 1) as f64).sqrt())
    }
}

/// End-of-run console summary: file-wide site counts, plus the distribution of
/// heterozygous-site counts across individuals.
#[derive(Debug)]
pub struct HetSummary {
    pub total_sites  : u64,
    pub variant_sites: u64,
    pub mean_hets    : f64,
    pub median_hets  : f64,
    pub std_dev_hets : Option<f64>,
}

impl HetSummary {
    #[must_use]
    pub fn new(total_sites: u64, variant_sites: u64, individuals: &[IndividualTally]) -> Self {
        let mut variance = Variance::default();
        for tally in individuals {
            variance.update(tally.heterozygous as f64);
        }
        Self{
            total_sites,
            variant_sites,
            mean_hets   : variance.mean(),
            median_hets : Self::median(individuals),
            std_dev_hets: variance.sample_std_dev(),
        }
    }

    /// Median of the individuals' heterozygous-site counts: middle value for
    /// an odd number of individuals, average of the two middle values for an
    /// even one. NaN when there is no individual.
    fn median(individuals: &[IndividualTally]) -> f64 {
        let sorted: Vec<u64> = individuals.iter().map(|tally| tally.heterozygous).sorted_unstable().collect();
        let n = sorted.len();
        match n {
            0 => f64::NAN,
            _ if n % 2 == 1 => sorted[n / 2] as f64,
            _ => (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0,
        }
    }

    /// Percentage of variant sites across all read sites. NaN for an empty input.
    pub fn percent_variant(&self) -> f64 {
        self.variant_sites as f64 / self.total_sites as f64 * 100.0
    }
}

impl Display for HetSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Read a total of {} sites in the VCF.", self.total_sites)?;
        writeln!(f, "    A total of {} ({:.3}%) were variant sites.", self.variant_sites, self.percent_variant())?;
        writeln!(f)?;
        writeln!(f, "Average heterozygous sites per individual:")?;
        writeln!(f, "    Mean:   {:.3}", self.mean_hets)?;
        writeln!(f, "    Median: {:.3}", self.median_hets)?;
        match self.std_dev_hets {
            Some(std_dev) => write!(f, "    StDev:  {std_dev:.3}"),
            None          => write!(f, "    StDev:  undefined (fewer than two individuals)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_individuals(het_counts: &[u64]) -> Vec<IndividualTally> {
        het_counts.iter()
            .map(|&heterozygous| IndividualTally{sites: 100, variant_sites: 50, heterozygous})
            .collect()
    }

    #[test]
    fn variance_matches_two_pass_estimate() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut variance = Variance::default();
        for value in values {
            variance.update(value);
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let sum_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        let expected_sd = (sum_squares / (values.len() - 1) as f64).sqrt();

        assert!((variance.mean() - mean).abs() < 1e-12);
        let std_dev = variance.sample_std_dev().expect("Defined for eight values");
        assert!((std_dev - expected_sd).abs() < 1e-12);
    }

    #[test]
    fn std_dev_undefined_below_two_values() {
        let mut variance = Variance::default();
        assert!(variance.sample_std_dev().is_none());

        variance.update(42.0);
        assert!(variance.sample_std_dev().is_none());

        variance.update(43.0);
        assert!(variance.sample_std_dev().is_some());
    }

    #[test]
    fn median_odd_and_even() {
        let odd = HetSummary::new(10, 5, &mock_individuals(&[9, 1, 5]));
        assert_eq!(odd.median_hets, 5.0);

        let even = HetSummary::new(10, 5, &mock_individuals(&[9, 1, 5, 2]));
        assert_eq!(even.median_hets, 3.5);
    }

    #[test]
    fn summary_display_single_individual() {
        let summary = HetSummary::new(4, 2, &mock_individuals(&[3]));
        let displayed = summary.to_string();
        assert!(displayed.contains("Read a total of 4 sites in the VCF."));
        assert!(displayed.contains("A total of 2 (50.000%) were variant sites."));
        assert!(displayed.contains("Mean:   3.000"));
        assert!(displayed.contains("StDev:  undefined"));
    }

    #[test]
    fn summary_display_std_dev() {
        let summary = HetSummary::new(4, 2, &mock_individuals(&[1, 3]));
        // mean 2, sample sd = sqrt(((1-2)^2 + (3-2)^2) / 1) = sqrt(2)
        assert!(summary.to_string().contains("StDev:  1.414"));
    }
}
