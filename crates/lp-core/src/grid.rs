use crate::{Dims, Error, Histogram, MAX_AXES};

/// Dense row-major grid of `u8` labels with one to three axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: Dims,
    shape: [usize; MAX_AXES],
    strides: [usize; MAX_AXES],
    data: Vec<u8>,
}

impl Grid {
    /// Allocates a zero-filled grid. The axis count is taken from `extents`.
    pub fn new(extents: &[usize]) -> Result<Self, Error> {
        let dims = Dims::from_axes(extents.len())?;
        Self::with_dims(dims, extents)
    }

    /// Allocates a zero-filled grid, checking `extents` against `dims`.
    pub fn with_dims(dims: Dims, extents: &[usize]) -> Result<Self, Error> {
        let shape = dims.shape_of(extents)?;
        Self::from_shape(dims, shape)
    }

    /// Allocates a zero-filled grid from a padded three-axis shape.
    ///
    /// Axes beyond `dims.axes()` must have extent 1.
    pub fn from_shape(dims: Dims, shape: [usize; MAX_AXES]) -> Result<Self, Error> {
        if shape.contains(&0) {
            return Err(Error::InvalidDimension {
                reason: "extents must be non-zero",
            });
        }
        if shape[dims.axes()..].iter().any(|&e| e != 1) {
            return Err(Error::InvalidDimension {
                reason: "unused axes must have extent 1",
            });
        }

        let len = cell_count(shape)?;
        Ok(Self {
            dims,
            shape,
            strides: strides_of(shape),
            data: vec![0; len],
        })
    }

    pub fn from_vec(extents: &[usize], data: Vec<u8>) -> Result<Self, Error> {
        let mut grid = Self::new(extents)?;
        if data.len() != grid.data.len() {
            return Err(Error::SizeMismatch {
                expected: grid.data.len(),
                actual: data.len(),
            });
        }
        grid.data = data;
        Ok(grid)
    }

    /// Overwrites every cell with `values`.
    pub fn load(&mut self, values: &[u8]) -> Result<(), Error> {
        if values.len() != self.data.len() {
            return Err(Error::SizeMismatch {
                expected: self.data.len(),
                actual: values.len(),
            });
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    /// Overwrites every cell with wider integer labels.
    ///
    /// The grid is left untouched if any value is above 255.
    pub fn load_labels(&mut self, values: &[u32]) -> Result<(), Error> {
        if values.len() != self.data.len() {
            return Err(Error::SizeMismatch {
                expected: self.data.len(),
                actual: values.len(),
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v > 255) {
            return Err(Error::ValueOutOfDomain { index, value });
        }

        for (dst, &src) in self.data.iter_mut().zip(values) {
            *dst = src as u8;
        }
        Ok(())
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Extents of the populated axes only.
    pub fn extents(&self) -> &[usize] {
        &self.shape[..self.dims.axes()]
    }

    /// Extents padded to three axes.
    pub fn shape(&self) -> [usize; MAX_AXES] {
        self.shape
    }

    pub fn strides(&self) -> [usize; MAX_AXES] {
        self.strides
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn get(&self, index: usize) -> Result<u8, Error> {
        self.data.get(index).copied().ok_or(Error::OutOfRange {
            index,
            len: self.data.len(),
        })
    }

    pub fn set(&mut self, index: usize, value: u8) -> Result<(), Error> {
        let len = self.data.len();
        let cell = self
            .data
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })?;
        *cell = value;
        Ok(())
    }

    pub fn linear_index(&self, coord: [usize; MAX_AXES]) -> Option<usize> {
        if coord.iter().zip(self.shape.iter()).any(|(&c, &e)| c >= e) {
            return None;
        }
        Some(
            coord
                .iter()
                .zip(self.strides.iter())
                .map(|(&c, &s)| c * s)
                .sum(),
        )
    }

    pub fn get_at(&self, coord: [usize; MAX_AXES]) -> Option<u8> {
        self.linear_index(coord).map(|idx| self.data[idx])
    }

    /// Adds one count per cell of the block at `origin` with extent `span`.
    ///
    /// Unused axes must use span 1. The block must lie fully inside the grid.
    pub fn histogram_into(
        &self,
        origin: [usize; MAX_AXES],
        span: [usize; MAX_AXES],
        hist: &mut Histogram,
    ) -> Result<(), Error> {
        let inside = (0..MAX_AXES).all(|axis| {
            span[axis] > 0
                && origin[axis]
                    .checked_add(span[axis])
                    .is_some_and(|end| end <= self.shape[axis])
        });
        if !inside {
            return Err(Error::BlockOutOfRange { origin, span });
        }

        let [row_stride, col_stride, _] = self.strides;
        for row in origin[0]..origin[0] + span[0] {
            for col in origin[1]..origin[1] + span[1] {
                let start = row * row_stride + col * col_stride + origin[2];
                for &value in &self.data[start..start + span[2]] {
                    hist.add(value);
                }
            }
        }
        Ok(())
    }

    /// Returns the mode of one block, reusing `hist` as scratch space.
    pub fn block_mode(
        &self,
        origin: [usize; MAX_AXES],
        span: [usize; MAX_AXES],
        hist: &mut Histogram,
    ) -> Result<u8, Error> {
        hist.clear();
        self.histogram_into(origin, span, hist)?;
        Ok(hist.mode())
    }
}

fn cell_count(shape: [usize; MAX_AXES]) -> Result<usize, Error> {
    shape
        .iter()
        .try_fold(1usize, |acc, &e| acc.checked_mul(e))
        .ok_or(Error::InvalidDimension {
            reason: "grid size overflows usize",
        })
}

fn strides_of(shape: [usize; MAX_AXES]) -> [usize; MAX_AXES] {
    [shape[1] * shape[2], shape[2], 1]
}

#[cfg(test)]
mod tests {
    use super::Grid;
    use crate::{Dims, Error, Histogram};

    fn mask_4x8() -> Grid {
        Grid::from_vec(
            &[4, 8],
            vec![
                1u8, 1, 1, 1, 1, 1, 1, 1, //
                1, 2, 1, 2, 1, 2, 1, 2, //
                1, 1, 2, 2, 2, 2, 2, 2, //
                1, 2, 2, 2, 2, 2, 2, 2, //
            ],
        )
        .expect("valid grid")
    }

    #[test]
    fn new_is_zero_filled_with_padded_shape() {
        let grid = Grid::new(&[3, 5]).expect("valid extents");
        assert_eq!(grid.dims(), Dims::Two);
        assert_eq!(grid.extents(), &[3, 5]);
        assert_eq!(grid.shape(), [3, 5, 1]);
        assert_eq!(grid.strides(), [5, 1, 1]);
        assert_eq!(grid.len(), 15);
        assert!(grid.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn construction_rejects_bad_extents() {
        assert!(matches!(
            Grid::new(&[]),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Grid::new(&[2, 2, 2, 2]),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Grid::new(&[4, 0]),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Grid::with_dims(Dims::Three, &[4, 4]),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Grid::from_shape(Dims::One, [4, 2, 1]),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn load_checks_length() {
        let mut grid = Grid::new(&[2, 2]).expect("valid extents");
        assert_eq!(
            grid.load(&[1, 2, 3]),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );
        grid.load(&[1, 2, 3, 4]).expect("matching length");
        assert_eq!(grid.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn load_labels_rejects_values_above_255() {
        let mut grid = Grid::new(&[4]).expect("valid extents");
        grid.load(&[9, 9, 9, 9]).expect("matching length");

        let err = grid.load_labels(&[1, 2, 256, 3]).expect_err("out of domain");
        assert_eq!(err, Error::ValueOutOfDomain { index: 2, value: 256 });
        assert_eq!(grid.data(), &[9, 9, 9, 9]);

        grid.load_labels(&[0, 17, 255, 3]).expect("in domain");
        assert_eq!(grid.data(), &[0, 17, 255, 3]);
    }

    #[test]
    fn flat_access_is_bounds_checked() {
        let mut grid = Grid::new(&[2, 3]).expect("valid extents");
        grid.set(5, 42).expect("in range");
        assert_eq!(grid.get(5), Ok(42));
        assert_eq!(grid.get(5), Ok(42));
        assert_eq!(grid.get(6), Err(Error::OutOfRange { index: 6, len: 6 }));
        assert_eq!(grid.set(6, 1), Err(Error::OutOfRange { index: 6, len: 6 }));
    }

    #[test]
    fn coordinates_are_row_major_last_axis_fastest() {
        let data: Vec<u8> = (0..24).collect();
        let grid = Grid::from_vec(&[2, 3, 4], data).expect("valid grid");
        assert_eq!(grid.strides(), [12, 4, 1]);
        assert_eq!(grid.linear_index([1, 2, 3]), Some(23));
        assert_eq!(grid.get_at([1, 0, 2]), Some(14));
        assert_eq!(grid.get_at([2, 0, 0]), None);
    }

    #[test]
    fn histogram_counts_block_cells_only() {
        let grid = mask_4x8();
        let mut hist = Histogram::new();
        grid.histogram_into([0, 0, 0], [2, 2, 1], &mut hist)
            .expect("block inside grid");
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.count(1), 3);
        assert_eq!(hist.count(2), 1);

        grid.histogram_into([2, 6, 0], [2, 2, 1], &mut hist)
            .expect("block inside grid");
        assert_eq!(hist.total(), 8);
        assert_eq!(hist.count(2), 5);
    }

    #[test]
    fn block_mode_follows_tie_break() {
        let grid = mask_4x8();
        let mut hist = Histogram::new();
        assert_eq!(grid.block_mode([0, 0, 0], [2, 2, 1], &mut hist), Ok(1));
        assert_eq!(grid.block_mode([2, 2, 0], [2, 2, 1], &mut hist), Ok(2));
        assert_eq!(grid.block_mode([2, 0, 0], [2, 2, 1], &mut hist), Ok(1));

        let tied = Grid::from_vec(&[2, 2], vec![9, 4, 4, 9]).expect("valid grid");
        assert_eq!(tied.block_mode([0, 0, 0], [2, 2, 1], &mut hist), Ok(4));
    }

    #[test]
    fn histogram_rejects_blocks_leaving_the_grid() {
        let grid = mask_4x8();
        let mut hist = Histogram::new();
        assert_eq!(
            grid.histogram_into([3, 0, 0], [2, 2, 1], &mut hist),
            Err(Error::BlockOutOfRange {
                origin: [3, 0, 0],
                span: [2, 2, 1]
            })
        );
        assert!(grid.histogram_into([0, 0, 0], [2, 2, 2], &mut hist).is_err());
        assert!(grid.histogram_into([0, 0, 0], [0, 2, 1], &mut hist).is_err());
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn three_axis_block_reads_depth_runs() {
        let mut data = vec![0u8; 2 * 2 * 4];
        for (i, v) in data.iter_mut().enumerate() {
            *v = if i % 4 < 2 { 3 } else { 7 };
        }
        let grid = Grid::from_vec(&[2, 2, 4], data).expect("valid grid");
        let mut hist = Histogram::new();
        assert_eq!(grid.block_mode([0, 0, 0], [2, 2, 2], &mut hist), Ok(3));
        assert_eq!(grid.block_mode([0, 0, 2], [2, 2, 2], &mut hist), Ok(7));
        assert_eq!(hist.total(), 8);
    }
}
