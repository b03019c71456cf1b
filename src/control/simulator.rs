use nalgebra as na;

use crate::control::model::{DiscreteStateSpaceModel, Element};

/// States and outputs recorded while stepping a model. `states[0]` is the
/// state before the first step, `outputs[k]` is the output of step `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<T, const N: usize, const Q: usize> {
    pub states: Vec<na::SVector<T, N>>,
    pub outputs: Vec<na::SVector<T, Q>>,
}

impl<T, const N: usize, const Q: usize> Trajectory<T, N, Q> {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Drives `model` with one input column per step and returns the output
/// matrix (`Q x steps`) and the state matrix (`N x (steps + 1)`).
pub fn system_simulate<T, M, const N: usize, const P: usize, const Q: usize>(
    model: &mut M,
    mat_u: &na::OMatrix<T, na::Const<P>, na::Dyn>,
) -> (
    na::OMatrix<T, na::Const<Q>, na::Dyn>,
    na::OMatrix<T, na::Const<N>, na::Dyn>,
)
where
    T: Element,
    M: DiscreteStateSpaceModel<T, N, P, Q>,
{
    let sim_time = mat_u.ncols();
    let mut mat_x = na::OMatrix::<T, na::Const<N>, na::Dyn>::zeros(sim_time + 1);
    let mut mat_y = na::OMatrix::<T, na::Const<Q>, na::Dyn>::zeros(sim_time);

    mat_x.column_mut(0).copy_from(model.get_state());
    for i in 0..sim_time {
        model.apply_input(mat_u.column(i).into_owned());
        model.step();

        mat_y.column_mut(i).copy_from(model.get_output());
        mat_x.column_mut(i + 1).copy_from(model.get_state());
        crate::debug!(
            "step {}: x = {:?}, y = {:?}",
            i + 1,
            model.get_state().as_slice(),
            model.get_output().as_slice()
        );
    }

    (mat_y, mat_x)
}

/// Steps `model` `steps` times with whatever input it currently holds.
pub fn simulate_held<T, M, const N: usize, const P: usize, const Q: usize>(
    model: &mut M,
    steps: usize,
) -> Trajectory<T, N, Q>
where
    T: Element,
    M: DiscreteStateSpaceModel<T, N, P, Q>,
{
    let mut states = Vec::with_capacity(steps + 1);
    let mut outputs = Vec::with_capacity(steps);

    states.push(*model.get_state());
    for i in 0..steps {
        model.step();

        states.push(*model.get_state());
        outputs.push(*model.get_output());
        crate::debug!(
            "step {}: x = {:?}, y = {:?}",
            i + 1,
            model.get_state().as_slice(),
            model.get_output().as_slice()
        );
    }

    Trajectory { states, outputs }
}

/// First output channel of [`system_simulate`].
pub fn compute_system_response<T, M, const N: usize, const P: usize, const Q: usize>(
    model: &mut M,
    input: &na::OMatrix<T, na::Const<P>, na::Dyn>,
) -> Vec<T>
where
    T: Element,
    M: DiscreteStateSpaceModel<T, N, P, Q>,
{
    let (y_test, _x_test) = system_simulate(model, input);

    y_test.row(0).iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::model::LinearStateSpaceModel;

    fn reference_model() -> LinearStateSpaceModel<f64, 2, 1, 1> {
        let mut model = LinearStateSpaceModel::new(
            na::matrix![0.0, 2.0; -1.0, -3.0],
            na::matrix![5.0; 0.0],
            na::matrix![1.0, 0.0],
            na::matrix![0.0],
        );
        model.set_state(na::vector![1.0, 2.0]);
        model.set_input(na::vector![0.6]);
        model
    }

    #[test]
    fn test_system_simulate_records_pre_step_outputs() {
        let mut model = reference_model();
        let mat_u = na::OMatrix::<f64, na::Const<1>, na::Dyn>::from_element(2, 0.6);

        let (mat_y, mat_x) = system_simulate(&mut model, &mat_u);

        assert_eq!(mat_x.ncols(), 3);
        assert_eq!(mat_y.ncols(), 2);
        let expected_x = [[1.0, 2.0], [7.0, -7.0], [-11.0, 14.0]];
        for (k, expected) in expected_x.iter().enumerate() {
            assert!((mat_x[(0, k)] - expected[0]).abs() < 1e-12);
            assert!((mat_x[(1, k)] - expected[1]).abs() < 1e-12);
        }
        assert!((mat_y[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((mat_y[(0, 1)] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_system_simulate_applies_each_input_column() {
        let mut model = LinearStateSpaceModel::<i64, 1, 1, 1>::new(
            na::matrix![1],
            na::matrix![1],
            na::matrix![1],
            na::matrix![10],
        );
        let mat_u = na::OMatrix::<i64, na::Const<1>, na::Dyn>::from_row_slice_generic(na::Const::<1>, na::Dyn(3), &[1, 2, 3]);

        let (mat_y, mat_x) = system_simulate(&mut model, &mat_u);

        assert_eq!(mat_x.as_slice(), &[0, 1, 3, 6]);
        assert_eq!(mat_y.as_slice(), &[10, 21, 33]);
        assert_eq!(model.input(), &na::vector![3]);
    }

    #[test]
    fn test_simulate_held_matches_manual_propagation() {
        let mut simulated = reference_model();
        let mut manual = reference_model();

        let trajectory = simulate_held(&mut simulated, 10);

        assert_eq!(trajectory.len(), 10);
        assert_eq!(trajectory.states.len(), 11);
        assert_eq!(trajectory.states[0], na::vector![1.0, 2.0]);
        for k in 0..10 {
            manual.propagate();
            assert_eq!(&trajectory.states[k + 1], manual.state());
            assert_eq!(&trajectory.outputs[k], manual.output());
        }
    }

    #[test]
    fn test_simulate_held_zero_steps() {
        let mut model = reference_model();
        let trajectory = simulate_held(&mut model, 0);

        assert!(trajectory.is_empty());
        assert_eq!(trajectory.states, vec![na::vector![1.0, 2.0]]);
        assert_eq!(model, reference_model());
    }

    #[test]
    fn test_compute_system_response() {
        let mut model = reference_model();
        let input = na::OMatrix::<f64, na::Const<1>, na::Dyn>::from_element(3, 0.6);

        let response = compute_system_response(&mut model, &input);

        assert_eq!(response.len(), 3);
        assert!((response[0] - 1.0).abs() < 1e-12);
        assert!((response[1] - 7.0).abs() < 1e-12);
        assert!((response[2] + 11.0).abs() < 1e-12);
    }
}
