use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ndarray::{Array2, ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use topk_distance::{Aggregation, Metric, TopKDistance, TopKParams};

#[derive(Clone, Copy, ValueEnum, Debug)]
enum MetricArg { Euclidean, Cosine, Correlation, Chebyshev, Minkowski, Cityblock }
impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Cosine => Metric::Cosine,
            MetricArg::Correlation => Metric::Correlation,
            MetricArg::Chebyshev => Metric::Chebyshev,
            MetricArg::Minkowski => Metric::Minkowski,
            MetricArg::Cityblock => Metric::Cityblock,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum AggregationArg { Mean, Median, RobustMean }
impl From<AggregationArg> for Aggregation {
    fn from(a: AggregationArg) -> Self {
        match a {
            AggregationArg::Mean => Aggregation::Mean,
            AggregationArg::Median => Aggregation::Median,
            AggregationArg::RobustMean => Aggregation::RobustMean,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "topk-distance", about = "Top-K distance of a noisy copy against a random reference collection")]
struct Args {
    #[arg(long, default_value_t = 100)] n: usize,
    #[arg(long, default_value_t = 10)] dim: usize,
    /// Samples per item; above 1 the inputs are (n, samples, dim) and get aggregated.
    #[arg(long, default_value_t = 1)] samples: usize,
    /// Uniform noise amplitude added to the reference to build the second collection.
    #[arg(long, default_value_t = 0.5)] noise: f32,
    #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)] metric: MetricArg,
    #[arg(long, value_enum, default_value_t = AggregationArg::Mean)] aggregation: AggregationArg,
    #[arg(long, default_value = "1,5,10")] k: String,
    #[arg(long, default_value_t = 1)] threads: usize,
    #[arg(long, default_value_t = 42)] seed: u64,
}

fn parse_list(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|t| t.trim().parse::<f64>().with_context(|| format!("invalid k value {t:?}")))
        .collect()
}

fn init_subscriber() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_subscriber();
    let args = Args::parse();
    if args.n == 0 || args.dim == 0 || args.samples == 0 {
        bail!("--n, --dim and --samples must be positive");
    }
    let params = TopKParams {
        metric: args.metric.into(),
        aggregation: args.aggregation.into(),
        k_range: parse_list(&args.k)?,
        threads: args.threads,
    };

    // Reference items, then per-sample noisy observations of each
    let mut rng = StdRng::seed_from_u64(args.seed);
    let reference = Array2::from_shape_fn((args.n, args.dim), |_| rng.gen::<f32>() - 0.5);
    let shape: Vec<usize> = if args.samples > 1 { vec![args.n, args.samples, args.dim] } else { vec![args.n, args.dim] };
    let last = shape.len() - 1;
    let observed = ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        let (item, feature) = (ix[0], ix[last]);
        reference[[item, feature]] + args.noise * (rng.gen::<f32>() - 0.5)
    });
    info!(n = args.n, dim = args.dim, samples = args.samples, noise = args.noise, metric = %params.metric, "collections ready");

    let topk = TopKDistance::new(params);
    let report = topk
        .evaluate(observed.view(), reference.view().into_dyn())
        .context("top-k evaluation failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
