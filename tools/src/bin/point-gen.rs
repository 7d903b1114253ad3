use anyhow::Context as _;
use anyhow::Result;
use rand::SeedableRng as _;

const USAGE: &str = "Usage: point-gen [options] [out-points] >out.csv";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt(
        "c",
        "counter-example",
        "generate the counter example of the given size instead of random points",
        "SIZE",
    );
    options.optopt("n", "count", "number of random points (default: 50)", "COUNT");
    options.optopt(
        "r",
        "range",
        "coordinates are drawn in [0, RANGE) (default: 100)",
        "RANGE",
    );
    options.optopt("s", "seed", "seed of the random number generator", "SEED");

    let matches = csp2d_tools::parse_args(options, USAGE, 1)?;

    let table = match matches.opt_get::<usize>("c").context("invalid size")? {
        Some(size) => csp2d_tools::counter_example(size),
        None => {
            let point_count = matches.opt_get_default("n", 50).context("invalid count")?;
            let range: f64 = matches.opt_get_default("r", 100.0).context("invalid range")?;
            if !(range.is_finite() && 0.0 < range) {
                anyhow::bail!("expected range to be a positive number, found {range}");
            }
            let mut rng = match matches.opt_get::<u64>("s").context("invalid seed")? {
                Some(seed) => rand_pcg::Pcg64::seed_from_u64(seed),
                None => rand_pcg::Pcg64::from_entropy(),
            };
            csp2d_tools::random_points(&mut rng, range, point_count)
        }
    };

    let output = csp2d_tools::writer(matches.free.first())?;
    csp2d_tools::write_points(output, &table).context("failed to write point table")
}
