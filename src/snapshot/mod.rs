// Step history for replaying an algorithm run

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Errors raised by the step history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Requested step does not exist
    #[error("step {index} out of range (total {len})")]
    OutOfRange { index: usize, len: usize },

    /// Recording another step would exceed the configured memory ceiling
    #[error("step history limit exceeded: {current} + {requested} > {limit}")]
    LimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },
}

/// Algorithm-specific terminal markers carried by a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markers {
    /// Searches never touch the dataset, only report where the target was found
    Search { found_index: Option<usize> },
    /// Sorts mutate the dataset, so every step carries its own copy
    Sort {
        data: Vec<i32>,
        sorted_indices: FxHashSet<usize>,
    },
}

/// One observable moment of an algorithm run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub highlighted_indices: FxHashSet<usize>,
    pub message: String,
    pub markers: Markers,
}

impl Step {
    /// Build a search step
    pub fn search(
        highlighted: impl IntoIterator<Item = usize>,
        message: impl Into<String>,
        found_index: Option<usize>,
    ) -> Self {
        Step {
            highlighted_indices: highlighted.into_iter().collect(),
            message: message.into(),
            markers: Markers::Search { found_index },
        }
    }

    /// Build a sort step, copying the current dataset and sorted set
    pub fn sort(
        data: &[i32],
        highlighted: impl IntoIterator<Item = usize>,
        sorted_indices: &FxHashSet<usize>,
        message: impl Into<String>,
    ) -> Self {
        Step {
            highlighted_indices: highlighted.into_iter().collect(),
            message: message.into(),
            markers: Markers::Sort {
                data: data.to_vec(),
                sorted_indices: sorted_indices.clone(),
            },
        }
    }

    pub fn found_index(&self) -> Option<usize> {
        match &self.markers {
            Markers::Search { found_index } => *found_index,
            Markers::Sort { .. } => None,
        }
    }

    /// Dataset as of this step (sort steps only)
    pub fn data(&self) -> Option<&[i32]> {
        match &self.markers {
            Markers::Sort { data, .. } => Some(data),
            Markers::Search { .. } => None,
        }
    }

    pub fn sorted_indices(&self) -> Option<&FxHashSet<usize>> {
        match &self.markers {
            Markers::Sort { sorted_indices, .. } => Some(sorted_indices),
            Markers::Search { .. } => None,
        }
    }

    /// Estimate the memory usage of this step in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough: hash set entries cost about two words each
        let word = std::mem::size_of::<usize>();
        let base = std::mem::size_of::<Step>()
            + self.message.len()
            + self.highlighted_indices.len() * word * 2;

        match &self.markers {
            Markers::Search { .. } => base,
            Markers::Sort {
                data,
                sorted_indices,
            } => base + data.len() * std::mem::size_of::<i32>() + sorted_indices.len() * word * 2,
        }
    }
}

/// Append-only step history for step mode.
///
/// The recorder is a passive store: cursor movement belongs to the controller.
/// While disabled (live mode) appends are silently dropped.
#[derive(Debug)]
pub struct StepRecorder {
    steps: Vec<Step>,
    enabled: bool,
    max_memory: usize,
    current_memory: usize,
}

impl StepRecorder {
    pub fn new(max_memory: usize) -> Self {
        StepRecorder {
            steps: Vec::new(),
            enabled: false,
            max_memory,
            current_memory: 0,
        }
    }

    /// Turn recording on or off. Existing history is left untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Add a step to the end of the history
    pub fn append(&mut self, step: Step) -> Result<(), HistoryError> {
        if !self.enabled {
            return Ok(());
        }

        let step_size = step.estimated_size();
        if self.current_memory.saturating_add(step_size) > self.max_memory {
            return Err(HistoryError::LimitExceeded {
                current: self.current_memory,
                requested: step_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += step_size;
        self.steps.push(step);
        Ok(())
    }

    /// Get a step by index
    pub fn at(&self, index: usize) -> Result<&Step, HistoryError> {
        self.steps.get(index).ok_or(HistoryError::OutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    /// Drop the whole history
    pub fn clear(&mut self) {
        self.steps.clear();
        self.current_memory = 0;
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }
}
