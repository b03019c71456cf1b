use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Matrix {name} is {rows}x{cols} and needs {expected} elements, got {actual}")]
    MatrixShape {
        name: &'static str,
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Vector {name} needs {expected} elements, got {actual}")]
    VectorLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
