pub mod math;
pub mod serde;

use std::fmt::{self, Debug};
use std::ops::Index;

use num::Num;

/// ZeroSpVec is a sparse vector that stores only its non-zero elements.
///
/// It holds `inds` (the logical position of each stored element) and `vals`
/// (the stored values), plus the logical length `len`.
/// Positions not stored read as zero.
///
/// `inds` is always strictly ascending.
#[derive(Clone, PartialEq)]
pub struct ZeroSpVec<N>
where N: Num
{
    inds: Vec<usize>,
    vals: Vec<N>,
    len: usize,
    zero: N,
}

impl<N> ZeroSpVec<N>
where N: Num
{
    /// Appends a stored element without touching `len`.
    /// The caller keeps `inds` ascending and `index < len`.
    #[inline]
    fn raw_push(&mut self, index: usize, value: N) {
        debug_assert!(self.inds.last().map_or(true, |&last| last < index));
        self.inds.push(index);
        self.vals.push(value);
    }

    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len: 0,
            zero: N::zero(),
        }
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        ZeroSpVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
            len: 0,
            zero: N::zero(),
        }
    }

    /// All-zero vector of logical length `len`.
    #[inline]
    pub fn zeros(len: usize) -> Self {
        let mut vec = Self::new();
        vec.len = len;
        vec
    }

    /// Builds a vector of length `len` from `(index, value)` pairs in any order.
    /// Zero values are not stored.
    ///
    /// # Arguments
    /// * `len` - logical length
    /// * `entries` - distinct indices, each `< len`
    pub fn from_entries(len: usize, mut entries: Vec<(usize, N)>) -> Self {
        entries.sort_by_key(|(idx, _)| *idx);
        let mut vec = Self::with_capacity(entries.len());
        vec.len = len;
        for (idx, val) in entries {
            debug_assert!(idx < len, "index {idx} out of bounds for length {len}");
            if val != N::zero() {
                vec.raw_push(idx, val);
            }
        }
        vec
    }

    #[inline]
    pub fn from_vec(vec: Vec<N>) -> Self {
        let mut zero_sp_vec = ZeroSpVec::with_capacity(vec.len());
        for entry in vec {
            zero_sp_vec.push(entry);
        }
        zero_sp_vec
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn push(&mut self, elem: N) {
        if elem != N::zero() {
            let idx = self.len;
            self.raw_push(idx, elem);
        }
        self.len += 1;
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&index) {
            Ok(pos) => Some(&self.vals[pos]),
            Err(_) => Some(&self.zero),
        }
    }

    /// dense iterator over every logical position
    #[inline]
    pub fn iter(&self) -> ZeroSpVecIter<'_, N> {
        ZeroSpVecIter {
            vec: self,
            pos: 0,
        }
    }

    /// iterator over stored `(index, value)` pairs, ascending by index
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, &N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter())
    }

    pub fn to_dense(&self) -> Vec<N>
    where N: Copy
    {
        let mut dense = vec![N::zero(); self.len];
        for (idx, val) in self.raw_iter() {
            dense[idx] = *val;
        }
        dense
    }
}

impl<N> Default for ZeroSpVec<N>
where N: Num
{
    #[inline]
    fn default() -> Self {
        ZeroSpVec::new()
    }
}

impl<N> Index<usize> for ZeroSpVec<N>
where N: Num
{
    type Output = N;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(val) => val,
            None => panic!("index {index} out of bounds for length {}", self.len),
        }
    }
}

impl<N: Num + Debug> Debug for ZeroSpVec<N> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("ZeroSpVec")
                .field("len", &self.len)
                .field("entries", &self.raw_iter().collect::<Vec<_>>())
                .finish()
        } else {
            f.debug_list().entries(self.iter()).finish()
        }
    }
}

pub struct ZeroSpVecIter<'a, N>
where N: Num
{
    vec: &'a ZeroSpVec<N>,
    pos: usize,
}

impl<'a, N> Iterator for ZeroSpVecIter<'a, N>
where N: Num
{
    type Item = &'a N;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.vec.get(self.pos).map(|val| {
            self.pos += 1;
            val
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.vec.len.saturating_sub(self.pos);
        (rest, Some(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_entries_sorts_and_drops_zeros() {
        let vec = ZeroSpVec::from_entries(5, vec![(3, 2.0), (0, 1.0), (1, 0.0)]);
        assert_eq!(vec.len(), 5);
        assert_eq!(vec.nnz(), 2);
        assert_eq!(vec.raw_iter().map(|(i, v)| (i, *v)).collect::<Vec<_>>(), vec![(0, 1.0), (3, 2.0)]);
        assert_eq!(vec.to_dense(), vec![1.0, 0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn zeros_keeps_length() {
        let vec: ZeroSpVec<f64> = ZeroSpVec::zeros(4);
        assert_eq!(vec.len(), 4);
        assert_eq!(vec.nnz(), 0);
        assert_eq!(vec.iter().count(), 4);
        assert_eq!(vec.get(4), None);
    }

    #[test]
    fn push_and_index() {
        let vec = ZeroSpVec::from_vec(vec![0.0, 1.5, 0.0, 2.5]);
        assert_eq!(vec.nnz(), 2);
        assert_eq!(vec[1], 1.5);
        assert_eq!(vec[2], 0.0);
        assert_eq!(format!("{:?}", vec), "[0.0, 1.5, 0.0, 2.5]");
    }
}
