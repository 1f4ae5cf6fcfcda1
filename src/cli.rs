use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, bail};
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use search_space::{
    Registry, SearchSpace, SpaceSpec,
    graph::{Shape, ShapeTracer},
    sample_tokens,
};

use crate::report::{DecodeReport, RangeReport, Report, TraceReport};

const USAGE: &str = "usage: resnet-nas <space.json> <range | decode [t0,t1,...] | sample [seed]>";
const DEFAULT_INPUT_SIZE: usize = 224;
const INPUT_CHANNELS: usize = 3;

/// What to do with the loaded search space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Range,
    Decode { tokens: Option<Vec<usize>> },
    Sample { seed: Option<u64> },
}

/// The parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: PathBuf,
    pub command: Command,
}

impl Args {
    /// Parses the command line arguments, without the program name.
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let (Some(config), Some(command)) = (args.next(), args.next()) else {
            bail!(USAGE);
        };

        let operand = args.next();
        if args.next().is_some() {
            bail!(USAGE);
        }

        let command = match (command.as_str(), operand) {
            ("range", None) => Command::Range,
            ("decode", tokens) => Command::Decode {
                tokens: tokens.as_deref().map(parse_tokens).transpose()?,
            },
            ("sample", seed) => Command::Sample {
                seed: seed
                    .map(|s| s.parse::<u64>().with_context(|| format!("invalid seed '{s}'")))
                    .transpose()?,
            },
            _ => bail!(USAGE),
        };

        Ok(Self {
            config: config.into(),
            command,
        })
    }
}

/// Parses a comma separated token vector such as `0,3,1,2`.
pub fn parse_tokens(s: &str) -> anyhow::Result<Vec<usize>> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid token '{t}'"))
        })
        .collect()
}

/// Loads a `SpaceSpec` from a JSON file.
pub fn load_spec(path: &Path) -> anyhow::Result<SpaceSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("invalid space '{}'", path.display()))
}

/// Runs `args` against the spaces in `registry`.
pub fn run(args: &Args, registry: &Registry) -> anyhow::Result<Report> {
    let spec = load_spec(&args.config)?;
    let space = registry
        .build(&spec)
        .with_context(|| format!("cannot build search space {}", spec.name))?;
    info!("loaded {} from {}", space.name(), args.config.display());

    match &args.command {
        Command::Range => Ok(Report::Range(RangeReport {
            space: space.name().to_string(),
            init_tokens: space.init_tokens(),
            range_table: space.range_table(),
        })),
        Command::Decode { tokens } => {
            let tokens = tokens.clone().unwrap_or_else(|| space.init_tokens());
            decode(&spec, space.as_ref(), tokens)
        }
        Command::Sample { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_os_rng(),
            };

            let tokens = sample_tokens(&space.range_table(), &mut rng);
            info!("sampled tokens {tokens:?}");
            decode(&spec, space.as_ref(), tokens)
        }
    }
}

fn decode(spec: &SpaceSpec, space: &dyn SearchSpace, tokens: Vec<usize>) -> anyhow::Result<Report> {
    let architecture = space
        .token_to_arch(Some(tokens.as_slice()))
        .with_context(|| format!("cannot decode tokens {tokens:?}"))?;

    let input = Shape::image(
        INPUT_CHANNELS,
        spec.config.input_size.unwrap_or(DEFAULT_INPUT_SIZE),
    );
    let mut tracer = ShapeTracer::new();
    let output = architecture
        .build(&mut tracer, input)
        .context("architecture does not fit the input")?;

    let blocks = architecture.as_resnet().map_or(0, |plan| plan.num_blocks());
    let layers = architecture.layers().len();

    Ok(Report::Decode(DecodeReport {
        space: space.name().to_string(),
        tokens,
        architecture,
        blocks,
        layers,
        trace: TraceReport {
            input,
            output,
            summary: tracer.summary(),
        },
    }))
}
