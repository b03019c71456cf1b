use lti_sim::config::{load_scenario, ScenarioConfig};
use lti_sim::control::simulator::{simulate_held, Trajectory};
use lti_sim::{error, info, warn};

use plotters::prelude::*;

use std::path::Path;

const N_STATES: usize = 2;
const N_INPUTS: usize = 1;
const N_OUTPUTS: usize = 1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading scenario from {path}");
            load_scenario(Path::new(&path)).inspect_err(|e| error!("{e}"))?
        }
        None => {
            info!("No scenario given, running the reference system");
            ScenarioConfig::default()
        }
    };

    let mut ss = scenario
        .build_model::<N_STATES, N_INPUTS, N_OUTPUTS>()
        .inspect_err(|e| error!("{e}"))?;

    if scenario.steps == 0 {
        warn!("Scenario has no steps to run");
    }

    let trajectory = simulate_held(&mut ss, scenario.steps);
    for (i, (state, output)) in trajectory
        .states
        .iter()
        .skip(1)
        .zip(trajectory.outputs.iter())
        .enumerate()
    {
        println!("State Estimate @ t = {}: {}", i + 1, state);
        println!("Output Estimate @ t = {}: {}", i + 1, output);
    }

    if let Some(plot) = &scenario.plot {
        match value_range(&trajectory) {
            Some(range) => {
                draw_trajectory(plot, &trajectory, range)?;
                info!("Trajectory written to {}", plot.display());
            }
            None => warn!("Trajectory has no finite values, skipping plot"),
        }
    }

    Ok(())
}

/// Vertical plot range over the finite states and outputs, or `None` when
/// the run diverged everywhere.
fn value_range<const N: usize, const Q: usize>(
    trajectory: &Trajectory<f64, N, Q>,
) -> Option<(f64, f64)> {
    let (mut min_y, mut max_y) = trajectory
        .states
        .iter()
        .flat_map(|x| x.iter())
        .chain(trajectory.outputs.iter().flat_map(|y| y.iter()))
        .cloned()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min_y > max_y {
        return None;
    }
    if min_y >= max_y {
        min_y -= 1.0;
        max_y += 1.0;
    }

    Some((min_y, max_y))
}

fn draw_trajectory<const N: usize, const Q: usize>(
    path: &Path,
    trajectory: &Trajectory<f64, N, Q>,
    (min_y, max_y): (f64, f64),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("State X and output Y", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..trajectory.states.len() as i32, min_y..max_y)?;

    chart.configure_mesh().draw()?;

    for n in 0..N {
        let series_x: Vec<(i32, f64)> = trajectory
            .states
            .iter()
            .enumerate()
            .map(|(i, x)| (i as i32, x[n]))
            .filter(|(_, v)| v.is_finite())
            .collect();

        chart
            .draw_series(LineSeries::new(series_x, &Palette99::pick(n)))?
            .label(format!("State {}", n))
            .legend(move |(x, y)| PathElement::new([(x, y), (x + 20, y)], &Palette99::pick(n)));
    }

    // Outputs belong to the step they were computed at
    for q in 0..Q {
        let series_y: Vec<(i32, f64)> = trajectory
            .outputs
            .iter()
            .enumerate()
            .map(|(i, y)| (i as i32, y[q]))
            .filter(|(_, v)| v.is_finite())
            .collect();

        chart
            .draw_series(LineSeries::new(series_y, &Palette99::pick(N + q)))?
            .label(format!("Output {}", q))
            .legend(move |(x, y)| {
                PathElement::new([(x, y), (x + 20, y)], &Palette99::pick(N + q))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
