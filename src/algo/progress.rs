//! Progress reporting for reconstruction.
//!
//! [`reconstruct_with_progress`](super::reconstruct_with_progress) reports
//! steps out of 4: flattening the adjacency (step 0),
//! snapping seeds (1), resolving collisions (2) and growing wavefronts (3),
//! then step 4 once the wavefront result is ready. Collision resolution on
//! its own, through
//! [`deduplicate_seeds_with_progress`](super::deduplicate_seeds_with_progress),
//! reports one step per colliding vertex instead.
//!
//! # Example
//!
//! ```
//! use endfoot::algo::{reconstruct_with_progress, FastMarching, Progress, ReconstructOptions};
//! use endfoot::mesh::shapes;
//! use nalgebra::Point3;
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//!
//! let mesh = shapes::grid(8, 1.0).unwrap();
//! let seeds = vec![Point3::new(4.0, 4.0, 0.0)];
//! let options = ReconstructOptions::new(2.0);
//! reconstruct_with_progress(&mesh, &seeds, &options, &FastMarching::default(), &progress)
//!     .unwrap();
//! ```

/// Callback invoked as a reconstruction moves between stages.
///
/// Arguments are the current step, the step total and a stage label.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
