use lp_core::{Dims, Error, Grid};

use crate::{DownsampleConfig, LevelPlan, Reduction, execute, plan_levels};

/// Label pyramid built by repeated block-mode downsampling.
///
/// Level 0 is the base grid supplied by the caller. Each next level halves
/// every populated axis and stores the mode of the source block each cell
/// replaces.
///
/// Building stops early once every populated axis has extent 1; requesting
/// more levels than that is not an error.
#[derive(Debug, Clone)]
pub struct ModePyramid {
    config: DownsampleConfig,
    levels: Vec<Grid>,
}

impl ModePyramid {
    pub fn new(dims: Dims, extents: &[usize]) -> Result<Self, Error> {
        Self::with_config(dims, extents, DownsampleConfig::default())
    }

    pub fn with_config(
        dims: Dims,
        extents: &[usize],
        config: DownsampleConfig,
    ) -> Result<Self, Error> {
        let base = Grid::from_shape(dims, dims.base_shape_of(extents)?)?;
        Self::from_grid(base, config)
    }

    /// Wraps an existing base grid.
    ///
    /// Fails with `InvalidDimension` if any axis of the grid's dimensionality
    /// has extent 1 while another does not.
    pub fn from_grid(base: Grid, config: DownsampleConfig) -> Result<Self, Error> {
        base.dims().base_shape_of(base.extents())?;
        Ok(Self {
            config,
            levels: vec![base],
        })
    }

    pub fn config(&self) -> &DownsampleConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DownsampleConfig) {
        self.config = config;
    }

    /// Replaces the base grid contents and drops any coarse levels.
    pub fn load(&mut self, values: &[u8]) -> Result<(), Error> {
        self.levels.truncate(1);
        self.levels[0].load(values)
    }

    pub fn load_labels(&mut self, values: &[u32]) -> Result<(), Error> {
        self.levels.truncate(1);
        self.levels[0].load_labels(values)
    }

    pub fn base(&self) -> &Grid {
        &self.levels[0]
    }

    /// Builds up to `requested_levels` coarse levels below the base.
    ///
    /// Previously built levels are discarded first. On failure the pyramid is
    /// reset to the base grid, so a partially built pyramid is never visible.
    pub fn downsample(&mut self, requested_levels: usize) -> Result<&[Grid], Error> {
        self.levels.truncate(1);

        let base = &self.levels[0];
        let plans = plan_levels(
            base.dims(),
            base.shape(),
            requested_levels,
            self.config.reduction,
        )?;

        self.build(&plans)?;
        log::debug!(
            "built {} of {} requested levels",
            self.levels.len() - 1,
            requested_levels
        );
        Ok(&self.levels)
    }

    pub fn levels(&self) -> &[Grid] {
        &self.levels
    }

    pub fn level(&self, i: usize) -> Option<&Grid> {
        self.levels.get(i)
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn cell(&self, level: usize, index: usize) -> Result<u8, Error> {
        let grid = self.level(level).ok_or(Error::OutOfRange {
            index: level,
            len: self.levels.len(),
        })?;
        grid.get(index)
    }

    fn build(&mut self, plans: &[LevelPlan]) -> Result<(), Error> {
        self.levels.truncate(1);
        let built = match self.config.reduction {
            Reduction::Cascade => self.build_cascade(plans),
            Reduction::FromBase => self.build_from_base(plans),
        };
        if built.is_err() {
            self.levels.truncate(1);
        }
        built
    }

    // Level k is fully written before level k + 1 is enumerated.
    fn build_cascade(&mut self, plans: &[LevelPlan]) -> Result<(), Error> {
        let dims = self.levels[0].dims();
        for plan in plans {
            let descriptors: Vec<_> = plan.descriptors().collect();
            if descriptors.is_empty() {
                return Err(Error::DegenerateWorkload { level: plan.level });
            }

            self.levels.push(Grid::from_shape(dims, plan.shape)?);
            execute(&descriptors, &mut self.levels, plan.level, self.config.workers)?;
        }
        Ok(())
    }

    fn build_from_base(&mut self, plans: &[LevelPlan]) -> Result<(), Error> {
        let dims = self.levels[0].dims();
        let total: usize = plans.iter().map(LevelPlan::block_count).sum();
        let mut descriptors = Vec::with_capacity(total);
        for plan in plans {
            let before = descriptors.len();
            descriptors.extend(plan.descriptors());
            if descriptors.len() == before {
                return Err(Error::DegenerateWorkload { level: plan.level });
            }
            self.levels.push(Grid::from_shape(dims, plan.shape)?);
        }

        if descriptors.is_empty() {
            return Ok(());
        }
        execute(&descriptors, &mut self.levels, 1, self.config.workers)
    }
}
