use anyhow::Context as _;
use anyhow::Result;
use csp2d_tools::Outcome;
use std::io::Write as _;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

const USAGE: &str = "Usage: csp-solve [options] [in-points [out-clusters]] <in.csv >out.txt

Each algorithm prints a '# ALGORITHM' line, followed by one line per cluster:

    corner_x corner_y total_weight cost ids...

ALGORITHMS:
    kmeans,K[,ROUNDS]       k-means with K centers and ROUNDS rounds (default 5)
    hierarchical,K          merge the closest clusters until K are left
    brute-force,K           exhaustive search over K containers
    angular,RAYS[,OPS]      estimate the running time of the PTAS with RAYS
                            angular sections, given OPS operations per second";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optmulti(
        "a",
        "algorithm",
        "algorithm to run, see ALGORITHMS",
        "SPEC",
    );
    options.optflag(
        "r",
        "reassign",
        "move each point to the closest corner of the resulting clusters",
    );
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print diagnostic data");

    let matches = csp2d_tools::parse_args(options, USAGE, 2)?;

    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_thread_ids(true)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    let _chrome_trace_guard = match matches.opt_str("t") {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    let algorithm_specs = matches.opt_strs("a");
    if algorithm_specs.is_empty() {
        anyhow::bail!("missing required option 'algorithm'");
    }
    let algorithms: Vec<_> = algorithm_specs
        .iter()
        .map(|algorithm_spec| {
            csp2d_tools::parse_algorithm(algorithm_spec)
                .with_context(|| format!("invalid algorithm {algorithm_spec:?}"))
        })
        .collect::<Result<_>>()?;

    let input = csp2d_tools::reader(matches.free.first())?;
    let table = csp2d_tools::read_points(input).context("failed to read point table")?;
    let points = &table.points;
    let lower_bound = csp2d::lower_bound(points);

    let reassign = matches.opt_present("r");
    let show_metadata = matches.opt_present("v");
    let mut output = csp2d_tools::writer(matches.free.get(1))?;

    for (algorithm_spec, mut algorithm) in algorithm_specs.iter().zip(algorithms) {
        let outcome = algorithm
            .run(points)
            .with_context(|| format!("failed to apply algorithm {algorithm_spec:?}"))?;
        match outcome {
            Outcome::Solution { solution, metadata } => {
                let solution = if reassign {
                    solution.reassign(points).with_context(|| {
                        format!("failed to reassign points for {algorithm_spec:?}")
                    })?
                } else {
                    solution
                };
                if show_metadata {
                    eprintln!("{algorithm_spec}: {metadata}");
                    let error: f64 = solution
                        .clusters
                        .iter()
                        .map(|cluster| cluster.error(points))
                        .sum();
                    eprintln!(
                        "{algorithm_spec}: cost {}, lower bound {lower_bound}, ratio {}, error {error}",
                        solution.cost,
                        solution.approximation_ratio(points),
                    );
                }
                writeln!(output, "# {algorithm_spec}")?;
                csp2d_tools::write_solution(&mut output, &table, &solution)
                    .context("failed to print clusters")?;
            }
            Outcome::Estimate(estimate) => {
                writeln!(
                    output,
                    "# {algorithm_spec}: {} profiles, {} years to enumerate, {} years in total",
                    estimate.profile_count, estimate.profile_years, estimate.total_years,
                )?;
            }
        }
    }

    output.flush()?;
    Ok(())
}
