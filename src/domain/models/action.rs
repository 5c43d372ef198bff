use super::RunRequest;

pub enum Action {
    /// Starts a new run of the sampling loop. Rejected while another run is in
    /// flight. Everything reported for the run carries the given id.
    Run(u64, RunRequest),
    /// Cancels the in-flight run, if any.
    Stop(),
}
