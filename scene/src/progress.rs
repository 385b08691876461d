//! Load progress reporting
//!
//! The caller owns a [`ProgressCell`] and passes it to the load call. Workers
//! update it under a lock; a UI thread polls [`ProgressCell::get`].

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStage {
    #[default]
    Node,
    Mesh,
    Material,
    Postprocess,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadProgress {
    pub stage: LoadStage,
    /// Fraction of the stage done, in `[0, 1]`. `None` when not measurable.
    pub progress: Option<f32>,
}

#[derive(Debug, Default)]
pub struct ProgressCell {
    state: Mutex<LoadProgress>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| {
        tracing::warn!("Load progress mutex poisoned; continuing");
        e.into_inner()
    })
}

impl ProgressCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> LoadProgress {
        *lock(&self.state)
    }

    pub(crate) fn set(&self, stage: LoadStage, progress: Option<f32>) {
        *lock(&self.state) = LoadProgress { stage, progress };
    }
}

/// Counts completed work items for one stage and publishes the fraction.
pub(crate) struct StageCounter<'a> {
    cell: &'a ProgressCell,
    stage: LoadStage,
    total: usize,
    done: Mutex<usize>,
}

impl<'a> StageCounter<'a> {
    pub(crate) fn new(cell: &'a ProgressCell, stage: LoadStage, total: usize) -> Self {
        cell.set(stage, Some(if total == 0 { 1.0 } else { 0.0 }));
        Self {
            cell,
            stage,
            total,
            done: Mutex::new(0),
        }
    }

    pub(crate) fn complete_one(&self) {
        // held across the publish so the fraction never goes backwards
        let mut done = lock(&self.done);
        *done += 1;
        let fraction = (*done as f32 / self.total.max(1) as f32).min(1.0);
        self.cell.set(self.stage, Some(fraction));
    }
}
