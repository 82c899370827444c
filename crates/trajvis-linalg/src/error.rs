/// An error type for the linear algebra module.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// The coefficient matrix has a zero pivot, so the system has no unique solution.
    #[error("linear system is singular (zero pivot at row {0})")]
    Singular(usize),
}
