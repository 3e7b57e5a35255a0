//! In-band peak picking on a magnitude spectrum

use crate::spectrum::Spectrum;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Hz
    pub frequency: f32,
    pub magnitude: f32,
}

/// Inclusive frequency band, in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f32,
    pub high: f32,
}

impl Band {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, frequency: f32) -> bool {
        frequency >= self.low && frequency <= self.high
    }
}

/// Indices of strict local maxima. The first and last bins never qualify.
pub fn local_maxima(magnitudes: &[f32]) -> Vec<usize> {
    magnitudes
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

/// Local maxima inside `band`, in bin order
pub fn in_band_peaks(spectrum: &Spectrum, band: Band) -> Vec<Peak> {
    local_maxima(spectrum.magnitudes())
        .into_iter()
        .map(|i| Peak {
            frequency: spectrum.frequencies()[i],
            magnitude: spectrum.magnitudes()[i],
        })
        .filter(|p| band.contains(p.frequency))
        .collect()
}

/// The `k` strongest in-band peaks, strongest first. Equal magnitudes keep bin order.
/// Empty when nothing in the band is a local maximum.
pub fn top_peaks(spectrum: &Spectrum, band: Band, k: usize) -> Vec<Peak> {
    let mut peaks = in_band_peaks(spectrum, band);
    // sort_by is stable, so ties stay in bin order
    peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    peaks.truncate(k);
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::frequency_axis;

    /// 1 Hz bins from 0 to 31 Hz with a spike at each of `spikes`
    fn spiky(spikes: &[(usize, f32)]) -> Spectrum {
        let mut mags = vec![0.1f32; 32];
        for &(bin, m) in spikes {
            mags[bin] = m;
        }
        Spectrum::new(frequency_axis(32, 64.0, 64), mags)
    }

    #[test]
    fn test_boundaries_never_peaks() {
        assert_eq!(local_maxima(&[5.0, 1.0, 2.0, 1.0, 5.0]), vec![2]);
        assert!(local_maxima(&[3.0, 2.0, 1.0]).is_empty());
        assert!(local_maxima(&[1.0, 2.0]).is_empty());
        assert!(local_maxima(&[]).is_empty());
    }

    #[test]
    fn test_plateaus_are_not_strict_maxima() {
        assert!(local_maxima(&[0.0, 2.0, 2.0, 0.0]).is_empty());
    }

    #[test]
    fn test_band_filter_keeps_only_in_band() {
        let spectrum = spiky(&[(5, 3.0), (10, 2.0), (25, 4.0)]);
        let peaks = top_peaks(&spectrum, Band::new(6.0, 20.0), 3);
        assert_eq!(
            peaks,
            vec![Peak {
                frequency: 10.0,
                magnitude: 2.0
            }]
        );
    }

    #[test]
    fn test_band_edges_inclusive() {
        let spectrum = spiky(&[(6, 1.0), (20, 2.0)]);
        let peaks = top_peaks(&spectrum, Band::new(6.0, 20.0), 3);
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].frequency, 20.0);
        assert_eq!(peaks[1].frequency, 6.0);
    }

    #[test]
    fn test_top_three_descending() {
        let spectrum = spiky(&[(7, 1.0), (9, 5.0), (12, 3.0), (15, 4.0), (18, 2.0)]);
        let peaks = top_peaks(&spectrum, Band::new(6.0, 20.0), 3);
        assert_eq!(peaks.len(), 3);
        let mags: Vec<f32> = peaks.iter().map(|p| p.magnitude).collect();
        assert_eq!(mags, vec![5.0, 4.0, 3.0]);
        let freqs: Vec<f32> = peaks.iter().map(|p| p.frequency).collect();
        assert_eq!(freqs, vec![9.0, 15.0, 12.0]);
    }

    #[test]
    fn test_ties_keep_bin_order() {
        let spectrum = spiky(&[(8, 2.0), (11, 2.0), (14, 2.0)]);
        let peaks = top_peaks(&spectrum, Band::new(6.0, 20.0), 2);
        let freqs: Vec<f32> = peaks.iter().map(|p| p.frequency).collect();
        assert_eq!(freqs, vec![8.0, 11.0]);
    }

    #[test]
    fn test_no_peaks_in_band() {
        let spectrum = spiky(&[(3, 1.0), (28, 1.0)]);
        assert!(top_peaks(&spectrum, Band::new(6.0, 20.0), 3).is_empty());
    }
}
