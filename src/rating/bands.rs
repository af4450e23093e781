use crate::domain::Band;

/// Lower bounds of B500, B600, B700 and B800+
pub const STANDARD_BOUNDARIES: [f64; 4] = [2500.0, 2600.0, 2700.0, 2800.0];

/// Maps ratings to bands; boundaries only change through `with_boundaries`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandClassifier {
    boundaries: [f64; 4],
}

impl Default for BandClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl BandClassifier {
    pub fn standard() -> Self {
        Self {
            boundaries: STANDARD_BOUNDARIES,
        }
    }

    /// Boundaries must be strictly increasing
    pub fn with_boundaries(boundaries: [f64; 4]) -> Option<Self> {
        if boundaries.windows(2).all(|w| w[0] < w[1]) {
            Some(Self { boundaries })
        } else {
            None
        }
    }

    pub fn boundaries(&self) -> [f64; 4] {
        self.boundaries
    }

    /// `None` when the rating is below `min_rating`. Ratings admitted under a
    /// minimum below the first boundary land in the lowest band.
    pub fn classify(&self, rating: f64, min_rating: f64) -> Option<Band> {
        if rating.is_nan() || rating < min_rating {
            return None;
        }
        Some(self.band_for(rating))
    }

    fn band_for(&self, rating: f64) -> Band {
        let [_, b600, b700, b800] = self.boundaries;
        if rating >= b800 {
            Band::B800Plus
        } else if rating >= b700 {
            Band::B700
        } else if rating >= b600 {
            Band::B600
        } else {
            Band::B500
        }
    }
}

/// Classify with the standard boundaries
pub fn classify(rating: f64, min_rating: f64) -> Option<Band> {
    BandClassifier::standard().classify(rating, min_rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries_are_inclusive_lower() {
        assert_eq!(classify(2499.0, 2500.0), None);
        assert_eq!(classify(2500.0, 2500.0), Some(Band::B500));
        assert_eq!(classify(2599.9, 2500.0), Some(Band::B500));
        assert_eq!(classify(2600.0, 2500.0), Some(Band::B600));
        assert_eq!(classify(2700.0, 2500.0), Some(Band::B700));
        assert_eq!(classify(2799.0, 2500.0), Some(Band::B700));
        assert_eq!(classify(2800.0, 2500.0), Some(Band::B800Plus));
        assert_eq!(classify(3300.0, 2500.0), Some(Band::B800Plus));
    }

    #[test]
    fn test_low_minimum_extends_lowest_band() {
        assert_eq!(classify(2350.0, 2300.0), Some(Band::B500));
        assert_eq!(classify(2250.0, 2300.0), None);
    }

    #[test]
    fn test_higher_minimum_excludes_lower_bands() {
        assert_eq!(classify(2650.0, 2700.0), None);
        assert_eq!(classify(2700.0, 2700.0), Some(Band::B700));
    }

    #[test]
    fn test_explicit_boundaries() {
        let classifier = BandClassifier::with_boundaries([2400.0, 2550.0, 2650.0, 2750.0]).unwrap();
        assert_eq!(classifier.classify(2560.0, 2400.0), Some(Band::B600));
        assert_eq!(classifier.classify(2760.0, 2400.0), Some(Band::B800Plus));

        assert!(BandClassifier::with_boundaries([2500.0, 2500.0, 2700.0, 2800.0]).is_none());
    }

    #[test]
    fn test_nan_is_not_admissible() {
        assert_eq!(classify(f64::NAN, 2500.0), None);
    }

    fn interval_of(band: Band, min: f64) -> (f64, f64) {
        let [_, b600, b700, b800] = STANDARD_BOUNDARIES;
        match band {
            Band::B500 => (min, b600),
            Band::B600 => (b600, b700),
            Band::B700 => (b700, b800),
            Band::B800Plus => (b800, f64::INFINITY),
        }
    }

    proptest! {
        #[test]
        fn prop_none_iff_below_minimum(rating in 1000.0f64..3500.0, min in 1000.0f64..3000.0) {
            prop_assert_eq!(classify(rating, min).is_none(), rating < min);
        }

        #[test]
        fn prop_bands_partition_admissible_ratings(rating in 2000.0f64..3600.0, min in 2000.0f64..=2500.0) {
            prop_assume!(rating >= min);
            let containing: Vec<Band> = Band::ALL
                .iter()
                .copied()
                .filter(|&band| {
                    let (low, high) = interval_of(band, min);
                    low <= rating && rating < high
                })
                .collect();

            prop_assert_eq!(containing.len(), 1);
            prop_assert_eq!(classify(rating, min), Some(containing[0]));
        }
    }
}
