//! Performance maps: many independent operating points.

use crate::error::{MeanlineError, MeanlineResult};
use crate::model::CompressorModel;
use crate::point::OperatingPoint;
use crate::propagate::{SolverResult, propagate};
use axc_stage::StageCharacteristics;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Points finished so far out of the run total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapProgress {
    pub completed: usize,
    pub total: usize,
}

pub type ProgressCallback = Arc<dyn Fn(MapProgress) + Send + Sync>;

/// Options for a map run.
#[derive(Clone)]
pub struct MapOptions {
    /// Called after every finished point with strictly increasing `completed`
    pub progress: Option<ProgressCallback>,
    /// Points not yet started when this is set return `Cancelled`
    pub cancel: Option<Arc<AtomicBool>>,
    pub parallel: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            progress: None,
            cancel: None,
            parallel: true,
        }
    }
}

impl fmt::Debug for MapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions")
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl MapOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(MapProgress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

type SpeedCurves = HashMap<u64, Vec<Option<StageCharacteristics>>>;

/// Characteristics for every distinct speed in `points`; `None` once the run is cancelled.
fn speed_curves(
    model: &CompressorModel,
    points: &[OperatingPoint],
    options: &MapOptions,
) -> Option<SpeedCurves> {
    let mut curves: SpeedCurves = HashMap::new();
    for point in points {
        if options.cancelled() {
            return None;
        }
        let key = point.speed.value.to_bits();
        if !curves.contains_key(&key) {
            curves.insert(key, model.characteristics_at(point.speed));
        }
    }
    Some(curves)
}

/// Solve every point; results come back in input order.
///
/// Speed-adjusted characteristics are built once per distinct speed before any point runs.
pub fn solve_map(
    model: &CompressorModel,
    points: &[OperatingPoint],
    options: &MapOptions,
) -> Vec<MeanlineResult<SolverResult>> {
    let total = points.len();
    info!(points = total, parallel = options.parallel, "map run started");

    let Some(curves) = speed_curves(model, points, options) else {
        info!(points = total, "map run cancelled before solving");
        return points.iter().map(|_| Err(MeanlineError::Cancelled)).collect();
    };

    let completed = Mutex::new(0usize);
    let chain = model.chain();
    let run = |point: &OperatingPoint| -> MeanlineResult<SolverResult> {
        if options.cancelled() {
            return Err(MeanlineError::Cancelled);
        }
        let stage_curves = curves
            .get(&point.speed.value.to_bits())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let result = propagate(&chain, stage_curves, point);
        if let Some(progress) = &options.progress {
            // Reporting inside the lock keeps `completed` strictly increasing
            if let Ok(mut done) = completed.lock() {
                *done += 1;
                progress(MapProgress {
                    completed: *done,
                    total,
                });
            }
        }
        result
    };

    let results: Vec<_> = if options.parallel {
        points.par_iter().map(run).collect()
    } else {
        points.iter().map(run).collect()
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(points = total, failed, "map run finished");
    results
}
