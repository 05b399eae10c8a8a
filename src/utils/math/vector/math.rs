use std::ops::AddAssign;

use num::Num;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy
{
    /// Dot product against a dense weight slice.
    /// Only stored elements are visited.
    #[inline]
    pub fn dot_dense<R>(&self, dense: &[R]) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        debug_assert_eq!(self.len(), dense.len());
        let mut result = R::zero();
        for (idx, val) in self.raw_iter() {
            result += (*val).into() * dense[idx];
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_dense_visits_stored_entries() {
        let a = ZeroSpVec::from_entries(3, vec![(1, 2.0_f64), (2, 1.0)]);
        let dot: f64 = a.dot_dense(&[10.0, 0.5, 2.0]);
        assert_eq!(dot, 3.0);
        let empty: ZeroSpVec<f64> = ZeroSpVec::zeros(3);
        assert_eq!(empty.dot_dense::<f64>(&[1.0, 2.0, 3.0]), 0.0);
    }
}
