//! Two-dimensional arrays indexed by `(col, row)`.
//!
//! [`PlainArray2`] stores its elements row-major, [`BlockedArray2`] stores square blocks of
//! elements contiguously so that all elements of a block sit next to each other in memory. Both
//! implement [`Array2`]; traversal orders that match the storage are provided as inherent methods.

use alloc::{vec, vec::Vec};
use itertools::iproduct;

pub trait Array2<T> {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn get(&self, col: usize, row: usize) -> Option<&T>;
    fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T>;

    /// Visits every element once, in the order that is cheapest for the storage.
    fn map_default(&self, f: impl FnMut(usize, usize, &T));

    /// # Panics
    ///
    /// Panics if `(col, row)` is out of bounds.
    #[track_caller]
    fn at(&self, col: usize, row: usize) -> &T {
        let (width, height) = (self.width(), self.height());
        match self.get(col, row) {
            Some(element) => element,
            None => out_of_bounds(col, row, width, height),
        }
    }

    /// # Panics
    ///
    /// Panics if `(col, row)` is out of bounds.
    #[track_caller]
    fn at_mut(&mut self, col: usize, row: usize) -> &mut T {
        let (width, height) = (self.width(), self.height());
        match self.get_mut(col, row) {
            Some(element) => element,
            None => out_of_bounds(col, row, width, height),
        }
    }
}

#[cold]
#[track_caller]
fn out_of_bounds(col: usize, row: usize, width: usize, height: usize) -> ! {
    panic!("index ({col}, {row}) out of bounds for a {width}x{height} array")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainArray2<T> {
    width: usize,
    height: usize,
    elements: Vec<T>,
}

impl<T: Clone + Default> PlainArray2<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            elements: vec![T::default(); width * height],
        }
    }
}

impl<T> PlainArray2<T> {
    /// Wraps row-major `elements`. Returns `None` if the length doesn't match the dimensions.
    pub fn from_vec(width: usize, height: usize, elements: Vec<T>) -> Option<Self> {
        (width.checked_mul(height)? == elements.len()).then_some(Self {
            width,
            height,
            elements,
        })
    }

    /// Builds an array by calling `f(col, row)` for every element, row-major.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let elements = iproduct!(0..height, 0..width)
            .map(|(row, col)| f(col, row))
            .collect();

        Self {
            width,
            height,
            elements,
        }
    }

    /// The elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    pub fn map_row_major(&self, mut f: impl FnMut(usize, usize, &T)) {
        for ((row, col), element) in iproduct!(0..self.height, 0..self.width).zip(&self.elements) {
            f(col, row, element);
        }
    }

    pub fn map_col_major(&self, mut f: impl FnMut(usize, usize, &T)) {
        for (col, row) in iproduct!(0..self.width, 0..self.height) {
            f(col, row, &self.elements[row * self.width + col]);
        }
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }
}

impl<T> Array2<T> for PlainArray2<T> {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, col: usize, row: usize) -> Option<&T> {
        self.index(col, row).map(|i| &self.elements[i])
    }

    #[inline]
    fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        self.index(col, row).map(|i| &mut self.elements[i])
    }

    fn map_default(&self, f: impl FnMut(usize, usize, &T)) {
        self.map_row_major(f)
    }
}

/// An array stored as `blocksize × blocksize` blocks, block rows top to bottom, blocks left to
/// right, elements row-major within a block.
///
/// Edge blocks are always allocated in full. Their cells outside the array hold `T::default()`
/// and are skipped by every traversal except [`BlockedArray2::blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedArray2<T> {
    width: usize,
    height: usize,
    blocksize: usize,
    blocks_wide: usize,
    elements: Vec<T>,
}

impl<T: Clone + Default> BlockedArray2<T> {
    /// # Panics
    ///
    /// Panics if `blocksize` is zero.
    pub fn new(width: usize, height: usize, blocksize: usize) -> Self {
        assert!(blocksize > 0, "blocksize must be positive");

        let blocks_wide = width.div_ceil(blocksize);
        let blocks_high = height.div_ceil(blocksize);

        Self {
            width,
            height,
            blocksize,
            blocks_wide,
            elements: vec![T::default(); blocks_wide * blocks_high * blocksize * blocksize],
        }
    }

    /// Copies the top-left `width × height` region of `array` into blocked storage.
    ///
    /// # Panics
    ///
    /// Panics if `blocksize` is zero or the region is larger than `array`.
    pub fn from_region(
        array: &impl Array2<T>,
        width: usize,
        height: usize,
        blocksize: usize,
    ) -> Self {
        assert!(
            width <= array.width() && height <= array.height(),
            "region is larger than the source array"
        );

        let mut blocked = Self::new(width, height, blocksize);
        for (row, col) in iproduct!(0..height, 0..width) {
            *blocked.at_mut(col, row) = array.at(col, row).clone();
        }

        blocked
    }
}

impl<T> BlockedArray2<T> {
    #[inline]
    pub fn blocksize(&self) -> usize {
        self.blocksize
    }

    /// Number of elements in one block.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.blocksize * self.blocksize
    }

    /// The raw storage, block after block.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Iterates over whole blocks in storage order, each as a row-major slice of
    /// [`Self::block_len`] elements.
    pub fn blocks(&self) -> core::slice::ChunksExact<'_, T> {
        self.elements.chunks_exact(self.block_len())
    }

    /// Visits every element, finishing each block before moving on to the next one.
    pub fn map_block_major(&self, mut f: impl FnMut(usize, usize, &T)) {
        let bs = self.blocksize;

        for (block_index, block) in self.blocks().enumerate() {
            let block_col = block_index % self.blocks_wide * bs;
            let block_row = block_index / self.blocks_wide * bs;

            for ((row, col), element) in iproduct!(0..bs, 0..bs).zip(block) {
                let (col, row) = (block_col + col, block_row + row);
                if col < self.width && row < self.height {
                    f(col, row, element);
                }
            }
        }
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }

        let bs = self.blocksize;
        let block = (row / bs) * self.blocks_wide + col / bs;
        Some(block * bs * bs + (row % bs) * bs + col % bs)
    }
}

impl<T> Array2<T> for BlockedArray2<T> {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, col: usize, row: usize) -> Option<&T> {
        self.index(col, row).map(|i| &self.elements[i])
    }

    #[inline]
    fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        self.index(col, row).map(|i| &mut self.elements[i])
    }

    fn map_default(&self, f: impl FnMut(usize, usize, &T)) {
        self.map_block_major(f)
    }
}
