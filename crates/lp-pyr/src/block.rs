use lp_core::{Dims, Error, MAX_AXES};

use crate::Reduction;

/// One block of a source level and the destination cell its mode goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Destination pyramid level. The base grid is level 0.
    pub level: usize,
    /// Linear index inside the destination level.
    pub index: usize,
    /// Pyramid level the block is read from.
    pub source: usize,
    pub origin: [usize; MAX_AXES],
    pub span: [usize; MAX_AXES],
}

impl BlockDescriptor {
    /// Edge length along the populated axes that are still being halved.
    pub fn edge_length(&self) -> usize {
        self.span.iter().copied().max().unwrap_or(1)
    }
}

/// Geometry of one coarse level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPlan {
    pub level: usize,
    pub source: usize,
    pub source_shape: [usize; MAX_AXES],
    pub shape: [usize; MAX_AXES],
    pub span: [usize; MAX_AXES],
}

impl LevelPlan {
    pub fn block_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Enumerates the level's blocks in destination row-major order.
    ///
    /// The n-th descriptor always has `index == n`.
    pub fn descriptors(&self) -> impl Iterator<Item = BlockDescriptor> + '_ {
        let [_, cols, depth] = self.shape;
        (0..self.block_count()).map(move |index| {
            let coord = [index / (cols * depth), (index / depth) % cols, index % depth];
            BlockDescriptor {
                level: self.level,
                index,
                source: self.source,
                origin: [
                    coord[0] * self.span[0],
                    coord[1] * self.span[1],
                    coord[2] * self.span[2],
                ],
                span: self.span,
            }
        })
    }
}

/// Plans up to `requested` coarse levels below a base of shape `base_shape`.
///
/// Planning stops early once every populated axis has extent 1; that terminal
/// level is still included. Returns `DegenerateWorkload` when levels are
/// requested from a base that cannot be halved at all.
pub fn plan_levels(
    dims: Dims,
    base_shape: [usize; MAX_AXES],
    requested: usize,
    reduction: Reduction,
) -> Result<Vec<LevelPlan>, Error> {
    let mut plans = Vec::new();
    if requested == 0 {
        return Ok(plans);
    }

    let axes = dims.axes();
    if !can_halve(base_shape, axes) {
        return Err(Error::DegenerateWorkload { level: 1 });
    }

    let mut shape = base_shape;
    let mut scale = [1usize; MAX_AXES];
    for level in 1..=requested {
        let mut next = [1usize; MAX_AXES];
        let mut step = [1usize; MAX_AXES];
        for axis in 0..axes {
            if shape[axis] >= 2 {
                step[axis] = 2;
                next[axis] = shape[axis] / 2;
            }
        }

        let mut cumulative = scale;
        for (c, s) in cumulative.iter_mut().zip(step) {
            *c *= s;
        }

        let plan = match reduction {
            Reduction::Cascade => LevelPlan {
                level,
                source: level - 1,
                source_shape: shape,
                shape: next,
                span: step,
            },
            Reduction::FromBase => LevelPlan {
                level,
                source: 0,
                source_shape: base_shape,
                shape: next,
                span: cumulative,
            },
        };
        log::debug!(
            "planned level {} shape {:?} span {:?} from level {}",
            plan.level,
            plan.shape,
            plan.span,
            plan.source
        );
        plans.push(plan);

        shape = next;
        scale = cumulative;
        if !can_halve(shape, axes) {
            break;
        }
    }

    Ok(plans)
}

fn can_halve(shape: [usize; MAX_AXES], axes: usize) -> bool {
    shape[..axes].iter().any(|&e| e >= 2)
}
