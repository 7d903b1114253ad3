use anyhow::Context as _;
use anyhow::Result;
use csp2d::Point;
use csp2d::Select as _;
use csp2d::Solution;
use itertools::Itertools as _;
use rand::Rng;
use std::env;
use std::fs;
use std::io;

/// Parse the command line, handling `--help` and rejecting extra free
/// arguments.
pub fn parse_args(
    mut options: getopts::Options,
    usage: &str,
    max_free_args: usize,
) -> Result<getopts::Matches> {
    options.optflag("h", "help", "print this help menu");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(usage));
        std::process::exit(0);
    }

    if matches.free.len() > max_free_args {
        anyhow::bail!("too many arguments\n\n{}", options.usage(usage));
    }

    Ok(matches)
}

/// Open the given file, or stdin when `path` is missing or `-`.
pub fn reader(path: Option<&String>) -> Result<Box<dyn io::BufRead>> {
    Ok(match path.map(String::as_str) {
        None | Some("-") => Box::new(io::stdin().lock()),
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("failed to open {path:?} for reading"))?;
            Box::new(io::BufReader::new(file))
        }
    })
}

/// Create the given file, or use stdout when `path` is missing or `-`.
pub fn writer(path: Option<&String>) -> Result<Box<dyn io::Write>> {
    Ok(match path.map(String::as_str) {
        None | Some("-") => Box::new(io::BufWriter::new(io::stdout().lock())),
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to open {path:?} for writing"))?;
            Box::new(io::BufWriter::new(file))
        }
    })
}

/// Weighted points along with their identifiers.
///
/// Point tables are text files with one `id, x, y, weight, extra` record per
/// line.  The trailing field is unused.  Blank lines and lines starting with
/// `#` are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTable {
    pub ids: Vec<String>,
    pub points: Vec<Point>,
}

impl PointTable {
    pub fn push(&mut self, id: impl ToString, point: Point) {
        self.ids.push(id.to_string());
        self.points.push(point);
    }
}

fn parse_record(record: &str) -> Result<(String, Point)> {
    let mut fields = record.split(',').map(str::trim);

    let id = fields.next().filter(|id| !id.is_empty()).context("missing id")?;
    let mut f64_field = |name: &str| -> Result<f64> {
        let field = fields
            .next()
            .with_context(|| format!("missing field {name:?}"))?;
        let f = field
            .parse::<f64>()
            .with_context(|| format!("{name} {field:?} is not a valid float"))?;
        if !f.is_finite() {
            anyhow::bail!("{name} {field:?} is not finite");
        }
        Ok(f)
    };
    let x = f64_field("x")?;
    let y = f64_field("y")?;
    let weight = f64_field("weight")?;

    Ok((id.to_owned(), Point::new(x, y, weight)))
}

pub fn read_points(r: impl io::BufRead) -> Result<PointTable> {
    let mut table = PointTable::default();
    for (line_idx, line) in r.lines().enumerate() {
        let line = line.context("failed to read point table")?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        let (id, point) =
            parse_record(record).with_context(|| format!("line {}", line_idx + 1))?;
        table.push(id, point);
    }
    Ok(table)
}

pub fn write_points(mut w: impl io::Write, table: &PointTable) -> io::Result<()> {
    for (id, point) in table.ids.iter().zip(&table.points) {
        writeln!(
            w,
            "{}, {}, {}, {}, 0",
            id, point.position.x, point.position.y, point.weight,
        )?;
    }
    w.flush()
}

/// Print one line per cluster: its corner, weight, cost and the ids of its
/// members.
pub fn write_solution(
    mut w: impl io::Write,
    table: &PointTable,
    solution: &Solution,
) -> io::Result<()> {
    for cluster in &solution.clusters {
        let corner = cluster.corner();
        let ids = cluster.members().iter().map(|&idx| &table.ids[idx]).join(" ");
        writeln!(
            w,
            "{} {} {} {} {}",
            corner.x,
            corner.y,
            cluster.total_weight(),
            cluster.cost(),
            ids,
        )?;
    }
    w.flush()
}

/// `point_count` points with coordinates uniformly drawn in
/// `[0, range) x [0, range)` and unit weights, numbered from 1.
pub fn random_points(rng: &mut impl Rng, range: f64, point_count: usize) -> PointTable {
    let mut table = PointTable::default();
    for id in 1..=point_count {
        let x = range * rng.gen::<f64>();
        let y = range * rng.gen::<f64>();
        table.push(id, Point::new(x, y, 1.0));
    }
    table
}

/// A family of inputs on which the clustering heuristics perform badly:
/// pairs of points stacked along the top and right edges of the
/// `[1, size]` square, `4 * (size - 1)` points in total.
pub fn counter_example(size: usize) -> PointTable {
    let n = size as f64;
    let mut table = PointTable::default();
    for i in 0..size.saturating_sub(1) {
        let offset = i as f64 + 1.0;
        table.push(4 * i + 1, Point::new(offset, n, 1.0));
        table.push(4 * i + 2, Point::new(offset, n - 1.0, 1.0));
        table.push(4 * i + 3, Point::new(n, offset, 1.0));
        table.push(4 * i + 4, Point::new(n - 1.0, offset, 1.0));
    }
    table
}

/// What running an [Algorithm] yields.
#[derive(Debug)]
pub enum Outcome {
    Solution {
        solution: Solution,
        /// Algorithm-specific diagnostic data, debug-formatted.
        metadata: String,
    },
    Estimate(csp2d::ProfileEstimate),
}

#[derive(Debug, Clone, Copy)]
pub enum Algorithm {
    KMeans(csp2d::KMeans),
    Hierarchical(csp2d::Hierarchical),
    BruteForce(csp2d::BruteForce),
    Angular(csp2d::AngularSections),
}

impl Algorithm {
    pub fn run(&mut self, points: &[Point]) -> Result<Outcome> {
        fn solution<M: std::fmt::Debug>((solution, metadata): (Solution, M)) -> Outcome {
            Outcome::Solution {
                solution,
                metadata: format!("{metadata:?}"),
            }
        }

        Ok(match self {
            Self::KMeans(algo) => solution(algo.select(points)?),
            Self::Hierarchical(algo) => solution(algo.select(points)?),
            Self::BruteForce(algo) => solution(algo.select(points)?),
            Self::Angular(algo) => {
                let candidates = csp2d::candidate_corners(points);
                Outcome::Estimate(algo.estimate(&candidates)?)
            }
        })
    }
}

/// Parse an algorithm specification such as `kmeans,5,10`.
pub fn parse_algorithm(spec: &str) -> Result<Algorithm> {
    let mut args = spec.split(',');
    let name = args.next().context("empty algorithm spec")?;

    fn optional<T>(maybe_arg: Option<Result<T>>, default: T) -> Result<T> {
        Ok(maybe_arg.transpose()?.unwrap_or(default))
    }

    fn required<T>(maybe_arg: Option<Result<T>>) -> Result<T> {
        maybe_arg.context("not enough arguments")?
    }

    fn usize_arg(arg: Option<&str>) -> Option<Result<usize>> {
        arg.map(|arg| {
            arg.parse::<usize>()
                .with_context(|| format!("arg {arg:?} is not a valid unsigned integer"))
        })
    }

    fn f64_arg(arg: Option<&str>) -> Option<Result<f64>> {
        arg.map(|arg| {
            let f = arg
                .parse::<f64>()
                .with_context(|| format!("arg {arg:?} is not a valid float"))?;
            if !(f.is_finite() && 0.0 < f) {
                anyhow::bail!("arg {arg:?} is not a positive number");
            }
            Ok(f)
        })
    }

    let algorithm = match name {
        "kmeans" | "k-means" => Algorithm::KMeans(csp2d::KMeans {
            cluster_count: required(usize_arg(args.next()))?,
            iter_count: optional(usize_arg(args.next()), csp2d::KMeans::default().iter_count)?,
        }),
        "hierarchical" => Algorithm::Hierarchical(csp2d::Hierarchical {
            cluster_count: required(usize_arg(args.next()))?,
        }),
        "brute-force" => Algorithm::BruteForce(csp2d::BruteForce {
            container_count: required(usize_arg(args.next()))?,
        }),
        "angular" => {
            let default = csp2d::AngularSections::default();
            Algorithm::Angular(csp2d::AngularSections {
                ray_count: optional(usize_arg(args.next()), default.ray_count)?,
                ops_per_second: optional(f64_arg(args.next()), default.ops_per_second)?,
            })
        }
        _ => anyhow::bail!("unknown algorithm {name:?}"),
    };

    if let Some(extra) = args.next() {
        anyhow::bail!("unexpected argument {extra:?}");
    }

    Ok(algorithm)
}
