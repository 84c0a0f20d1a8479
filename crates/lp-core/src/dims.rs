use crate::Error;

/// Largest supported number of axes.
pub const MAX_AXES: usize = 3;

/// Dimensionality of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dims {
    One,
    Two,
    Three,
}

impl Dims {
    pub fn from_axes(axes: usize) -> Result<Self, Error> {
        match axes {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            0 => Err(Error::InvalidDimension {
                reason: "a grid needs at least one axis",
            }),
            _ => Err(Error::InvalidDimension {
                reason: "at most three axes are supported",
            }),
        }
    }

    pub fn axes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Number of source cells a full block holds: 2, 4 or 8.
    pub fn block_cells(self) -> usize {
        1 << self.axes()
    }

    /// Pads `extents` to a three-axis shape, unused axes set to 1.
    ///
    /// Fails if `extents` has a different axis count or holds a zero.
    pub fn shape_of(self, extents: &[usize]) -> Result<[usize; MAX_AXES], Error> {
        if extents.len() != self.axes() {
            return Err(Error::InvalidDimension {
                reason: "extent count does not match dimensionality",
            });
        }
        if extents.contains(&0) {
            return Err(Error::InvalidDimension {
                reason: "extents must be non-zero",
            });
        }

        let mut shape = [1usize; MAX_AXES];
        shape[..extents.len()].copy_from_slice(extents);
        Ok(shape)
    }

    /// Like [`Dims::shape_of`], for the base grid of a pyramid.
    ///
    /// Every populated axis must have extent > 1, except for a grid that is a
    /// single cell. Coarse levels clamp axes to 1 and go through
    /// [`Dims::shape_of`] instead.
    pub fn base_shape_of(self, extents: &[usize]) -> Result<[usize; MAX_AXES], Error> {
        let shape = self.shape_of(extents)?;
        let populated = &shape[..self.axes()];
        if populated.contains(&1) && populated.iter().any(|&e| e > 1) {
            return Err(Error::InvalidDimension {
                reason: "dimensionality does not match the number of non-trivial axes",
            });
        }
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::Dims;
    use crate::Error;

    #[test]
    fn axes_round_trip_and_block_cells() {
        for axes in 1..=3 {
            let dims = Dims::from_axes(axes).expect("valid axis count");
            assert_eq!(dims.axes(), axes);
        }
        assert_eq!(Dims::One.block_cells(), 2);
        assert_eq!(Dims::Two.block_cells(), 4);
        assert_eq!(Dims::Three.block_cells(), 8);
    }

    #[test]
    fn rejects_unsupported_axis_counts() {
        assert!(matches!(
            Dims::from_axes(0),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Dims::from_axes(4),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn shape_pads_unused_axes() {
        assert_eq!(Dims::Two.shape_of(&[4, 8]), Ok([4, 8, 1]));
        assert_eq!(Dims::One.shape_of(&[5]), Ok([5, 1, 1]));
        assert!(Dims::Two.shape_of(&[4, 8, 2]).is_err());
        assert!(Dims::Three.shape_of(&[4, 0, 2]).is_err());
    }

    #[test]
    fn base_shape_needs_non_trivial_axes() {
        assert_eq!(Dims::Two.base_shape_of(&[4, 8]), Ok([4, 8, 1]));
        assert_eq!(Dims::Three.base_shape_of(&[1, 1, 1]), Ok([1, 1, 1]));
        assert!(matches!(
            Dims::Two.base_shape_of(&[1, 8]),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Dims::Three.base_shape_of(&[4, 4, 1]),
            Err(Error::InvalidDimension { .. })
        ));
        assert_eq!(Dims::Two.shape_of(&[1, 8]), Ok([1, 8, 1]));
    }
}
