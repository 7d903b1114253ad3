/// Information on an algorithm run.
///
/// Filled in by iterative algorithms when run on a given input.  Gives
/// information about how the run went.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RunInfo {
    /// Number of iterations the algorithm underwent to provide a solution.
    pub algo_iterations: Option<usize>,
}

impl RunInfo {
    pub fn iterations(count: usize) -> RunInfo {
        RunInfo {
            algo_iterations: Some(count),
        }
    }
}
