//! `[f32]` extensions.

use alloc::vec::Vec;

/// `[f32]` extensions.
pub trait F32ArrayExt {
    /// Returns the index and value of the smallest element, or `None` if the
    /// array is empty. If the minimum occurs more than once, the lowest index is returned.
    fn first_minimum(&self) -> Option<(usize, f32)>;
    /// Returns the index of the first element that is smaller than its predecessor, if any.
    fn first_decrease(&self) -> Option<usize>;
    /// Returns the index of the first NaN or infinite element, if any.
    fn first_non_finite(&self) -> Option<usize>;
    /// Returns `[initial, initial + a[0], initial + a[0] + a[1], ...]`, i.e an array
    /// one element longer than the input.
    fn running_sum(&self, initial: f32) -> Vec<f32>;
}

impl F32ArrayExt for [f32] {
    fn first_minimum(&self) -> Option<(usize, f32)> {
        let mut result: Option<(usize, f32)> = None;
        for (index, value) in self.iter().enumerate() {
            match result {
                // Strict comparison keeps the earliest of equal values
                Some((_, min)) if *value >= min => {}
                _ => result = Some((index, *value)),
            }
        }
        result
    }

    fn first_decrease(&self) -> Option<usize> {
        self.windows(2)
            .position(|pair| pair[1] < pair[0])
            .map(|index| index + 1)
    }

    fn first_non_finite(&self) -> Option<usize> {
        self.iter().position(|value| !value.is_finite())
    }

    fn running_sum(&self, initial: f32) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.len() + 1);
        let mut sum = initial;
        result.push(sum);
        for value in self.iter() {
            sum += value;
            result.push(sum);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::F32ArrayExt;

    #[test]
    fn test_empty_array() {
        let values: [f32; 0] = [];
        assert!(values.first_minimum().is_none());
        assert!(values.first_decrease().is_none());
        assert_eq!(values.running_sum(3.0), vec![3.0]);
    }

    #[test]
    fn test_first_minimum_tie_break() {
        let values = [4.0, 1.0, 2.0, 1.0];
        assert_eq!(values.first_minimum(), Some((1, 1.0)));
    }

    #[test]
    fn test_first_decrease() {
        assert_eq!([0.0, 1.0, 1.0, 2.0].first_decrease(), None);
        assert_eq!([0.0, 1.0, 0.5, 2.0].first_decrease(), Some(2));
    }

    #[test]
    fn test_first_non_finite() {
        assert_eq!([0.0, 1.0].first_non_finite(), None);
        assert_eq!([0.0, f32::NAN, f32::INFINITY].first_non_finite(), Some(1));
    }

    #[test]
    fn test_running_sum() {
        let intervals = [2.0, -2.0, 2.0];
        assert_eq!(intervals.running_sum(60.0), vec![60.0, 62.0, 60.0, 62.0]);
    }
}
