use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use label_pyramid::{Dims, DownsampleConfig, Grid, LevelPlan, ModePyramid, Reduction, plan_levels};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "lp_gallery")]
#[command(about = "Run label-pyramid on external fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "pyramid")]
    Pyramid(PyramidArgs),
    #[command(name = "plan")]
    Plan(PlanArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "target/gallery")]
    out: PathBuf,
    #[arg(long, default_value_t = 8)]
    levels: usize,
    #[arg(long, value_enum, default_value_t = ReductionArg::Cascade)]
    reduction: ReductionArg,
}

#[derive(Args, Debug, Clone)]
struct PyramidArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = label_pyramid::DEFAULT_WORKERS)]
    workers: usize,
}

#[derive(Args, Debug, Clone)]
struct PlanArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ReductionArg {
    Cascade,
    FromBase,
}

impl From<ReductionArg> for Reduction {
    fn from(arg: ReductionArg) -> Self {
        match arg {
            ReductionArg::Cascade => Reduction::Cascade,
            ReductionArg::FromBase => Reduction::FromBase,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelDto {
    extents: Vec<usize>,
    values: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Fixture {
    case: String,
    extents: Vec<usize>,
    values: Vec<u32>,
    #[serde(default)]
    notes: Option<String>,
    /// Expected levels keyed by reduction name (`cascade`, `from-base`).
    #[serde(default)]
    expected: BTreeMap<String, Vec<LevelDto>>,
}

impl Fixture {
    fn expected_for(&self, reduction: Reduction) -> Option<&[LevelDto]> {
        self.expected
            .get(reduction_name(reduction))
            .map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, Serialize)]
struct MetaPyramid {
    case: String,
    requested_levels: usize,
    built_levels: usize,
    level_sizes: Vec<Vec<usize>>,
    workers: usize,
    reduction: &'static str,
    policy: &'static str,
    checked_against_expected: bool,
}

#[derive(Debug, Clone, Serialize)]
struct PlanDto {
    level: usize,
    source: usize,
    shape: Vec<usize>,
    span: Vec<usize>,
    blocks: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Pyramid(args) => run_pyramid(args),
        Command::Plan(args) => run_plan(args),
    }
}

fn run_pyramid(args: PyramidArgs) -> Result<()> {
    let common = &args.common;
    let (case_dir, fixture) = prepare_case(common)?;
    let base = load_base(&fixture)?;

    let cfg = DownsampleConfig::default()
        .with_workers(args.workers)
        .with_reduction(common.reduction.into());
    let mut pyr = ModePyramid::from_grid(base, cfg)
        .with_context(|| format!("case '{}' extents {:?}", fixture.case, fixture.extents))?;
    let levels = pyr
        .downsample(common.levels)
        .with_context(|| format!("downsampling case '{}'", fixture.case))?;

    let mut sizes = Vec::with_capacity(levels.len());
    for (i, level) in levels.iter().enumerate() {
        sizes.push(level.extents().to_vec());
        write_json(case_dir.join(format!("level_{i}.json")), &level_dto(level))?;
    }

    let checked = match fixture.expected_for(cfg.reduction) {
        Some(expected) => {
            check_expected(levels, expected)?;
            true
        }
        None => false,
    };
    log::info!(
        "case '{}': built {} levels, expected levels checked: {}",
        fixture.case,
        levels.len(),
        checked
    );

    write_json(
        case_dir.join("meta.json"),
        &MetaPyramid {
            case: fixture.case.clone(),
            requested_levels: common.levels,
            built_levels: levels.len(),
            level_sizes: sizes,
            workers: cfg.workers,
            reduction: reduction_name(cfg.reduction),
            policy: "block mode, ties to smallest label, drop-odd extents",
            checked_against_expected: checked,
        },
    )?;

    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let common = &args.common;
    let (case_dir, fixture) = prepare_case(common)?;
    let base = load_base(&fixture)?;

    let plans = plan_levels(
        base.dims(),
        base.shape(),
        common.levels,
        common.reduction.into(),
    )
    .with_context(|| format!("planning case '{}'", fixture.case))?;

    let axes = base.dims().axes();
    let dtos: Vec<PlanDto> = plans.iter().map(|p| plan_dto(p, axes)).collect();
    write_json(case_dir.join("plan.json"), &dtos)
}

fn prepare_case(common: &CommonArgs) -> Result<(PathBuf, Fixture)> {
    let fixture = read_fixture(&common.input)?;
    if let Some(notes) = &fixture.notes {
        log::debug!("case '{}': {}", fixture.case, notes);
    }

    let case_dir = common.out.join(&fixture.case);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    Ok((case_dir, fixture))
}

fn load_base(fixture: &Fixture) -> Result<Grid> {
    let context = || format!("case '{}' extents {:?}", fixture.case, fixture.extents);
    let dims = Dims::from_axes(fixture.extents.len()).with_context(context)?;
    let shape = dims.base_shape_of(&fixture.extents).with_context(context)?;
    let mut base = Grid::from_shape(dims, shape).with_context(context)?;
    base.load_labels(&fixture.values)
        .with_context(|| format!("loading values for case '{}'", fixture.case))?;
    Ok(base)
}

fn check_expected(levels: &[Grid], expected: &[LevelDto]) -> Result<()> {
    if levels.len() != expected.len() {
        bail!(
            "expected {} levels, built {}.",
            expected.len(),
            levels.len()
        );
    }

    for (i, (level, want)) in levels.iter().zip(expected).enumerate() {
        let got = level_dto(level);
        if got.extents != want.extents {
            bail!(
                "level {} extents {:?} do not match expected {:?}.",
                i,
                got.extents,
                want.extents
            );
        }
        if let Some(idx) = got.values.iter().zip(&want.values).position(|(a, b)| a != b) {
            bail!(
                "level {} differs at index {}: got {}, expected {}.",
                i,
                idx,
                got.values[idx],
                want.values[idx]
            );
        }
        if got.values.len() != want.values.len() {
            bail!(
                "level {} has {} values, expected {}.",
                i,
                got.values.len(),
                want.values.len()
            );
        }
    }
    Ok(())
}

fn level_dto(level: &Grid) -> LevelDto {
    LevelDto {
        extents: level.extents().to_vec(),
        values: level.data().iter().map(|&v| v as u32).collect(),
    }
}

fn plan_dto(plan: &LevelPlan, axes: usize) -> PlanDto {
    PlanDto {
        level: plan.level,
        source: plan.source,
        shape: plan.shape[..axes].to_vec(),
        span: plan.span[..axes].to_vec(),
        blocks: plan.block_count(),
    }
}

fn reduction_name(reduction: Reduction) -> &'static str {
    match reduction {
        Reduction::Cascade => "cascade",
        Reduction::FromBase => "from-base",
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn read_fixture(path: &Path) -> Result<Fixture> {
    if !path.is_file() {
        bail!("fixture is not a readable file: {}", path.display());
    }
    let data = fs::read(path).with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("parsing fixture json {}", path.display()))
}
