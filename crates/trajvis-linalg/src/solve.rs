use crate::error::LinalgError;

/// A dense square linear system `a * x = b` with a compile time size.
///
/// # Fields
///
/// * `a` - The coefficient matrix in row-major order.
/// * `b` - The right-hand-side vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSystem<const N: usize> {
    /// The coefficient matrix in row-major order.
    pub a: [[f64; N]; N],
    /// The right-hand-side vector.
    pub b: [f64; N],
}

impl<const N: usize> LinearSystem<N> {
    /// Create a new linear system from its coefficients and right-hand side.
    pub fn new(a: [[f64; N]; N], b: [f64; N]) -> Self {
        Self { a, b }
    }

    /// Solve the system, consuming it.
    ///
    /// See [`solve_linear_system`] for the numeric contract.
    pub fn solve(mut self) -> Result<[f64; N], LinalgError> {
        solve_linear_system(&mut self.a, &mut self.b)
    }
}

/// Solve a dense linear system using Gaussian elimination with partial pivoting.
///
/// The coefficient matrix and the right-hand side are reduced in place, so both
/// hold the upper triangular system after the call.
///
/// A pivot is rejected only when it is exactly `0.0`. Near singular systems are
/// solved and may return very large or non finite values.
///
/// # Arguments
///
/// * `a` - The coefficient matrix with shape (N, N) in row-major order.
/// * `b` - The right-hand-side vector with shape (N).
///
/// # Returns
///
/// The solution vector `x` with shape (N), or [`LinalgError::Singular`] with
/// the row of the first zero pivot.
///
/// # Example
///
/// ```
/// use trajvis_linalg::solve_linear_system;
///
/// let mut a = [[2.0, 1.0], [1.0, 3.0]];
/// let mut b = [3.0, 5.0];
///
/// let x = solve_linear_system(&mut a, &mut b).unwrap();
///
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve_linear_system<const N: usize>(
    a: &mut [[f64; N]; N],
    b: &mut [f64; N],
) -> Result<[f64; N], LinalgError> {
    // forward elimination
    for col in 0..N {
        // pick the row with the largest magnitude in this column
        let mut pivot = col;
        for row in col + 1..N {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }

        if pivot != col {
            for k in col..N {
                let tmp = a[col][k];
                a[col][k] = a[pivot][k];
                a[pivot][k] = tmp;
            }
            b.swap(col, pivot);
        }

        let diag = a[col][col];
        if diag == 0.0 {
            return Err(LinalgError::Singular(col));
        }

        for row in col + 1..N {
            let r = a[row][col] / diag;
            for k in col..N {
                let v = a[col][k];
                a[row][k] -= r * v;
            }
            let v = b[col];
            b[row] -= r * v;
        }
    }

    // back substitution
    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let diag = a[row][row];
        if diag == 0.0 {
            return Err(LinalgError::Singular(row));
        }

        let mut sum = 0.0;
        for col in row + 1..N {
            sum += a[row][col] * x[col];
        }
        x[row] = (b[row] - sum) / diag;
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solve_identity() -> Result<(), LinalgError> {
        let mut a = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut b = [4.0, -2.0, 0.5];
        let x = solve_linear_system(&mut a, &mut b)?;
        assert_eq!(x, [4.0, -2.0, 0.5]);
        Ok(())
    }

    #[test]
    fn solve_3x3() -> Result<(), LinalgError> {
        // x = 1, y = -2, z = 3
        let mut a = [[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]];
        let mut b = [-3.0, 5.0, 2.0];
        let x = solve_linear_system(&mut a, &mut b)?;
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn solve_needs_pivoting() -> Result<(), LinalgError> {
        // a zero in the top-left corner must be swapped away
        let mut a = [[0.0, 1.0], [1.0, 0.0]];
        let mut b = [2.0, 3.0];
        let x = solve_linear_system(&mut a, &mut b)?;
        assert_eq!(x, [3.0, 2.0]);
        Ok(())
    }

    #[test]
    fn solve_reduces_in_place() -> Result<(), LinalgError> {
        let mut a = [[1.0, 2.0], [3.0, 4.0]];
        let mut b = [5.0, 6.0];
        solve_linear_system(&mut a, &mut b)?;
        // the largest pivot (3.0) is moved to the first row
        assert_eq!(a[0], [3.0, 4.0]);
        assert_eq!(a[1][0], 0.0);
        assert_eq!(b[0], 6.0);
        Ok(())
    }

    #[test]
    fn solve_singular_zero_column() {
        let mut a = [[0.0, 1.0], [0.0, 2.0]];
        let mut b = [1.0, 2.0];
        assert_eq!(
            solve_linear_system(&mut a, &mut b),
            Err(LinalgError::Singular(0))
        );
    }

    #[test]
    fn solve_singular_duplicated_rows() {
        let mut a = [[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [0.0, 1.0, 1.0]];
        let mut b = [1.0, 1.0, 1.0];
        assert!(matches!(
            solve_linear_system(&mut a, &mut b),
            Err(LinalgError::Singular(_))
        ));
    }

    #[test]
    fn linear_system_solve() -> Result<(), LinalgError> {
        let system = LinearSystem::new([[4.0, 0.0], [0.0, 0.5]], [2.0, 2.0]);
        let x = system.solve()?;
        assert_eq!(x, [0.5, 4.0]);
        // the system is Copy, solving does not touch the original
        assert_eq!(system.b, [2.0, 2.0]);
        Ok(())
    }
}
