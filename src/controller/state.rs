//! The externally observable execution snapshot

use crate::algorithms::{Algorithm, Outcome};
use crate::snapshot::{Markers, Step};
use rustc_hash::FxHashSet;
use std::fmt;

/// Everything a display needs to draw the current moment.
///
/// Published as whole values through a watch channel; consumers never
/// mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionState {
    pub data: Vec<i32>,
    pub highlighted_indices: FxHashSet<usize>,
    /// Search terminal marker
    pub found_index: Option<usize>,
    /// Sort terminal marker
    pub sorted_indices: FxHashSet<usize>,
    pub selected_algorithm: Algorithm,
    /// Search only; a search cannot start without it
    pub target_value: Option<i32>,
    pub comparison_message: String,
    pub is_running: bool,
    pub elapsed_time_ms: u64,
    /// Live-mode speed divisor
    pub speed: u32,

    pub is_step_mode: bool,
    pub current_step_index: usize,
    pub total_steps: usize,
    pub can_step_forward: bool,
    pub can_step_backward: bool,
}

impl ExecutionState {
    pub fn new(data: Vec<i32>, selected_algorithm: Algorithm) -> Self {
        ExecutionState {
            data,
            highlighted_indices: FxHashSet::default(),
            found_index: None,
            sorted_indices: FxHashSet::default(),
            selected_algorithm,
            target_value: None,
            comparison_message: String::new(),
            is_running: false,
            elapsed_time_ms: 0,
            speed: 1,
            is_step_mode: false,
            current_step_index: 0,
            total_steps: 0,
            can_step_forward: false,
            can_step_backward: false,
        }
    }

    /// Highlighted indices in ascending order
    pub fn highlighted(&self) -> Vec<usize> {
        sorted_vec(&self.highlighted_indices)
    }

    /// Sorted-marker indices in ascending order
    pub fn sorted(&self) -> Vec<usize> {
        sorted_vec(&self.sorted_indices)
    }

    /// Copy the display fields of a recorded or live step
    pub(crate) fn apply_step(&mut self, step: &Step) {
        self.highlighted_indices = step.highlighted_indices.clone();
        self.comparison_message = step.message.clone();

        match &step.markers {
            Markers::Search { found_index } => self.found_index = *found_index,
            Markers::Sort {
                data,
                sorted_indices,
            } => {
                self.data = data.clone();
                self.sorted_indices = sorted_indices.clone();
            }
        }
    }

    /// Drop transient markers and step counters
    pub(crate) fn clear_progress(&mut self) {
        self.highlighted_indices.clear();
        self.found_index = None;
        self.sorted_indices.clear();
        self.comparison_message.clear();
        self.elapsed_time_ms = 0;
        self.clear_step_counters();
    }

    pub(crate) fn clear_step_counters(&mut self) {
        self.current_step_index = 0;
        self.total_steps = 0;
        self.can_step_forward = false;
        self.can_step_backward = false;
    }

    pub(crate) fn begin_run(&mut self) {
        self.clear_progress();
        self.is_running = true;
    }

    /// Point the step cursor at `index` of `total` recorded steps
    pub(crate) fn set_cursor(&mut self, index: usize, total: usize) {
        self.current_step_index = index;
        self.total_steps = total;
        self.can_step_forward = index + 1 < total;
        self.can_step_backward = index > 0;
    }

    /// Commit the terminal markers of a completed live run
    pub(crate) fn finish(&mut self, outcome: Outcome, elapsed_ms: u64) {
        self.is_running = false;
        self.elapsed_time_ms = elapsed_ms;

        match outcome {
            Outcome::Found(index) => self.found_index = Some(index),
            Outcome::Sorted => {
                self.highlighted_indices.clear();
                self.sorted_indices = (0..self.data.len()).collect();
            }
            Outcome::NotFound => self.found_index = None,
            Outcome::Cancelled => self.highlighted_indices.clear(),
        }
    }
}

fn sorted_vec(set: &FxHashSet<usize>) -> Vec<usize> {
    let mut indices: Vec<usize> = set.iter().copied().collect();
    indices.sort_unstable();
    indices
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.selected_algorithm)?;
        if self.is_step_mode {
            if self.total_steps > 0 {
                write!(f, " step {}/{}", self.current_step_index + 1, self.total_steps)?;
            } else {
                write!(f, " step mode")?;
            }
        }
        if self.is_running {
            write!(f, " running")?;
        }
        write!(f, " {}ms data={:?}", self.elapsed_time_ms, self.data)?;

        let highlighted = self.highlighted();
        if !highlighted.is_empty() {
            write!(f, " highlight={:?}", highlighted)?;
        }
        let sorted = self.sorted();
        if !sorted.is_empty() {
            write!(f, " sorted={:?}", sorted)?;
        }
        if let Some(target) = self.target_value {
            write!(f, " target={}", target)?;
        }
        if let Some(index) = self.found_index {
            write!(f, " found={}", index)?;
        }
        if !self.comparison_message.is_empty() {
            write!(f, " | {}", self.comparison_message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sort_step() {
        let mut state = ExecutionState::new(vec![2, 1], Algorithm::BubbleSort);
        let sorted: FxHashSet<usize> = [1].into_iter().collect();
        state.apply_step(&Step::sort(&[1, 2], [0, 1], &sorted, "Swapped 1 and 2"));

        assert_eq!(state.data, vec![1, 2]);
        assert_eq!(state.highlighted(), vec![0, 1]);
        assert_eq!(state.sorted(), vec![1]);
        assert_eq!(state.comparison_message, "Swapped 1 and 2");
    }

    #[test]
    fn test_apply_search_step_keeps_data() {
        let mut state = ExecutionState::new(vec![5, 6, 7], Algorithm::LinearSearch);
        state.apply_step(&Step::search([2], "Found 7 at index 2", Some(2)));

        assert_eq!(state.data, vec![5, 6, 7]);
        assert_eq!(state.found_index, Some(2));
    }

    #[test]
    fn test_cursor_flags() {
        let mut state = ExecutionState::new(vec![], Algorithm::BubbleSort);
        state.set_cursor(0, 3);
        assert!(state.can_step_forward && !state.can_step_backward);
        state.set_cursor(2, 3);
        assert!(!state.can_step_forward && state.can_step_backward);
        state.set_cursor(0, 1);
        assert!(!state.can_step_forward && !state.can_step_backward);
    }

    #[test]
    fn test_finish_sorted_marks_everything() {
        let mut state = ExecutionState::new(vec![1, 2, 3], Algorithm::InsertionSort);
        state.begin_run();
        state.highlighted_indices.insert(1);
        state.finish(Outcome::Sorted, 42);

        assert!(!state.is_running);
        assert_eq!(state.sorted(), vec![0, 1, 2]);
        assert!(state.highlighted_indices.is_empty());
        assert_eq!(state.elapsed_time_ms, 42);
    }

    #[test]
    fn test_display() {
        let mut state = ExecutionState::new(vec![1, 2], Algorithm::LinearSearch);
        state.target_value = Some(2);
        state.found_index = Some(1);
        let text = state.to_string();

        assert!(text.starts_with("[Linear Search]"));
        assert!(text.contains("target=2"));
        assert!(text.contains("found=1"));
    }
}
