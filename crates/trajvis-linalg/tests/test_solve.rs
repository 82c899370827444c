use approx::assert_relative_eq;
use rand::Rng;
use trajvis_linalg::{solve_linear_system, LinalgError, LinearSystem};

fn mat_vec<const N: usize>(a: &[[f64; N]; N], x: &[f64; N]) -> [f64; N] {
    let mut b = [0.0; N];
    for (row, b_i) in a.iter().zip(b.iter_mut()) {
        *b_i = row.iter().zip(x.iter()).map(|(a_ij, x_j)| a_ij * x_j).sum();
    }
    b
}

#[test]
fn solve_random_diagonally_dominant() -> Result<(), LinalgError> {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let mut a = [[0.0; 8]; 8];
        for (i, row) in a.iter_mut().enumerate() {
            for v in row.iter_mut() {
                *v = rng.random_range(-1.0..1.0);
            }
            row[i] += 10.0;
        }

        let mut x_expected = [0.0; 8];
        for v in x_expected.iter_mut() {
            *v = rng.random_range(-100.0..100.0);
        }

        let b = mat_vec(&a, &x_expected);
        let x = LinearSystem::new(a, b).solve()?;

        for (x_i, e_i) in x.iter().zip(x_expected.iter()) {
            assert_relative_eq!(*x_i, *e_i, epsilon = 1e-8);
        }
    }

    Ok(())
}

#[test]
fn solve_is_deterministic() -> Result<(), LinalgError> {
    let a = [[3.0, 2.0, -4.0], [2.0, 3.0, 3.0], [5.0, -3.0, 1.0]];
    let b = [3.0, 15.0, 14.0];

    let x1 = solve_linear_system(&mut a.clone(), &mut b.clone())?;
    let x2 = solve_linear_system(&mut a.clone(), &mut b.clone())?;

    // bit identical for identical inputs
    assert_eq!(x1.map(f64::to_bits), x2.map(f64::to_bits));
    assert_relative_eq!(x1[0], 3.0, epsilon = 1e-12);
    assert_relative_eq!(x1[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(x1[2], 2.0, epsilon = 1e-12);

    Ok(())
}

#[test]
fn solve_near_singular_is_not_rejected() {
    // the pivot check is an exact zero comparison
    let mut a = [[1.0, 1.0], [1.0, 1.0 + 1e-15]];
    let mut b = [2.0, 2.0];
    assert!(solve_linear_system(&mut a, &mut b).is_ok());
}

#[test]
fn solve_singular_last_pivot() {
    let mut a = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
    let mut b = [1.0, 1.0, 1.0];
    assert_eq!(
        solve_linear_system(&mut a, &mut b),
        Err(LinalgError::Singular(2))
    );
}
