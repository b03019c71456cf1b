extern crate nalgebra as na;

use na::{ClosedAdd, ClosedMul, Scalar};
use num_traits::{One, Zero};
use serde::Deserialize;

use crate::control::error::{ModelError, ModelResult};

/// Numeric element usable in a state-space model: anything nalgebra can
/// multiply and accumulate (floats, and integers for exact arithmetic).
pub trait Element: Scalar + Copy + Zero + One + ClosedAdd + ClosedMul {}

impl<T> Element for T where T: Scalar + Copy + Zero + One + ClosedAdd + ClosedMul {}

/// Order of the elements in a flat buffer handed to the slice constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixLayout {
    RowMajor,
    #[default]
    ColumnMajor,
}

pub trait DiscreteStateSpaceModel<T, const N: usize, const P: usize, const Q: usize> {
    fn get_mat_a(&self) -> &na::SMatrix<T, N, N>;
    fn get_mat_b(&self) -> &na::SMatrix<T, N, P>;
    fn get_mat_c(&self) -> &na::SMatrix<T, Q, N>;
    fn get_mat_d(&self) -> &na::SMatrix<T, Q, P>;
    fn get_state(&self) -> &na::SVector<T, N>;
    fn get_output(&self) -> &na::SVector<T, Q>;
    fn apply_input(&mut self, input: na::SVector<T, P>);
    fn step(&mut self);
}

/// Discrete-time LTI system
///
/// ```text
/// x[k+1] = A x[k] + B u[k]
/// y[k]   = C x[k] + D u[k]
/// ```
///
/// with `N` states, `P` inputs and `Q` outputs. The input is held between
/// calls to [`LinearStateSpaceModel::propagate`] until it is set again.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearStateSpaceModel<T, const N: usize, const P: usize, const Q: usize> {
    mat_a: na::SMatrix<T, N, N>,
    mat_b: na::SMatrix<T, N, P>,
    mat_c: na::SMatrix<T, Q, N>,
    mat_d: na::SMatrix<T, Q, P>,
    state: na::SVector<T, N>,
    input: na::SVector<T, P>,
    output: na::SVector<T, Q>,
}

impl<T: Element, const N: usize, const P: usize, const Q: usize> LinearStateSpaceModel<T, N, P, Q> {
    /// Model with the given matrices; state, input and output start at zero.
    pub fn new(
        mat_a: na::SMatrix<T, N, N>,
        mat_b: na::SMatrix<T, N, P>,
        mat_c: na::SMatrix<T, Q, N>,
        mat_d: na::SMatrix<T, Q, P>,
    ) -> Self {
        LinearStateSpaceModel {
            mat_a,
            mat_b,
            mat_c,
            mat_d,
            state: na::SVector::zeros(),
            input: na::SVector::zeros(),
            output: na::SVector::zeros(),
        }
    }

    pub fn zeros() -> Self {
        Self::new(
            na::SMatrix::zeros(),
            na::SMatrix::zeros(),
            na::SMatrix::zeros(),
            na::SMatrix::zeros(),
        )
    }

    /// Builds a model from flat buffers laid out as `layout` says.
    pub fn from_slices(
        mat_a: &[T],
        mat_b: &[T],
        mat_c: &[T],
        mat_d: &[T],
        layout: MatrixLayout,
    ) -> ModelResult<Self> {
        Ok(Self::new(
            matrix_from_slice("A", mat_a, layout)?,
            matrix_from_slice("B", mat_b, layout)?,
            matrix_from_slice("C", mat_c, layout)?,
            matrix_from_slice("D", mat_d, layout)?,
        ))
    }

    /// Replaces the four matrices. State, input and output are kept.
    pub fn set_matrices(
        &mut self,
        mat_a: na::SMatrix<T, N, N>,
        mat_b: na::SMatrix<T, N, P>,
        mat_c: na::SMatrix<T, Q, N>,
        mat_d: na::SMatrix<T, Q, P>,
    ) {
        self.mat_a = mat_a;
        self.mat_b = mat_b;
        self.mat_c = mat_c;
        self.mat_d = mat_d;
    }

    /// Slice version of [`Self::set_matrices`]. Every buffer is checked
    /// before anything is replaced.
    pub fn set_matrices_from_slices(
        &mut self,
        mat_a: &[T],
        mat_b: &[T],
        mat_c: &[T],
        mat_d: &[T],
        layout: MatrixLayout,
    ) -> ModelResult<()> {
        let mat_a = matrix_from_slice("A", mat_a, layout)?;
        let mat_b = matrix_from_slice("B", mat_b, layout)?;
        let mat_c = matrix_from_slice("C", mat_c, layout)?;
        let mat_d = matrix_from_slice("D", mat_d, layout)?;
        self.set_matrices(mat_a, mat_b, mat_c, mat_d);

        Ok(())
    }

    pub fn set_state(&mut self, state: na::SVector<T, N>) {
        self.state = state;
    }

    pub fn set_state_from_slice(&mut self, state: &[T]) -> ModelResult<()> {
        self.state = vector_from_slice("x", state)?;
        Ok(())
    }

    pub fn set_input(&mut self, input: na::SVector<T, P>) {
        self.input = input;
    }

    pub fn set_input_from_slice(&mut self, input: &[T]) -> ModelResult<()> {
        self.input = vector_from_slice("u", input)?;
        Ok(())
    }

    /// Advances the system by one step. The output is computed from the
    /// state before the update.
    pub fn propagate(&mut self) {
        let y_k = &self.mat_c * &self.state + &self.mat_d * &self.input;
        let x_kp1 = &self.mat_a * &self.state + &self.mat_b * &self.input;

        self.output = y_k;
        self.state = x_kp1;
    }

    pub fn mat_a(&self) -> &na::SMatrix<T, N, N> {
        &self.mat_a
    }

    pub fn mat_b(&self) -> &na::SMatrix<T, N, P> {
        &self.mat_b
    }

    pub fn mat_c(&self) -> &na::SMatrix<T, Q, N> {
        &self.mat_c
    }

    pub fn mat_d(&self) -> &na::SMatrix<T, Q, P> {
        &self.mat_d
    }

    pub fn state(&self) -> &na::SVector<T, N> {
        &self.state
    }

    pub fn input(&self) -> &na::SVector<T, P> {
        &self.input
    }

    pub fn output(&self) -> &na::SVector<T, Q> {
        &self.output
    }
}

impl<T: Element, const N: usize, const P: usize, const Q: usize> Default
    for LinearStateSpaceModel<T, N, P, Q>
{
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: Element, const N: usize, const P: usize, const Q: usize> DiscreteStateSpaceModel<T, N, P, Q>
    for LinearStateSpaceModel<T, N, P, Q>
{
    fn get_mat_a(&self) -> &na::SMatrix<T, N, N> {
        &self.mat_a
    }

    fn get_mat_b(&self) -> &na::SMatrix<T, N, P> {
        &self.mat_b
    }

    fn get_mat_c(&self) -> &na::SMatrix<T, Q, N> {
        &self.mat_c
    }

    fn get_mat_d(&self) -> &na::SMatrix<T, Q, P> {
        &self.mat_d
    }

    fn get_state(&self) -> &na::SVector<T, N> {
        &self.state
    }

    fn get_output(&self) -> &na::SVector<T, Q> {
        &self.output
    }

    fn apply_input(&mut self, input: na::SVector<T, P>) {
        self.set_input(input);
    }

    fn step(&mut self) {
        self.propagate();
    }
}

/// Copies `data` into an `R x C` matrix, or reports the length mismatch.
pub fn matrix_from_slice<T: Element, const R: usize, const C: usize>(
    name: &'static str,
    data: &[T],
    layout: MatrixLayout,
) -> ModelResult<na::SMatrix<T, R, C>> {
    if data.len() != R * C {
        return Err(ModelError::MatrixShape {
            name,
            rows: R,
            cols: C,
            expected: R * C,
            actual: data.len(),
        });
    }

    Ok(match layout {
        MatrixLayout::RowMajor => na::SMatrix::from_row_slice(data),
        MatrixLayout::ColumnMajor => na::SMatrix::from_column_slice(data),
    })
}

pub fn vector_from_slice<T: Element, const D: usize>(
    name: &'static str,
    data: &[T],
) -> ModelResult<na::SVector<T, D>> {
    if data.len() != D {
        return Err(ModelError::VectorLength {
            name,
            expected: D,
            actual: data.len(),
        });
    }

    Ok(na::SVector::from_column_slice(data))
}
