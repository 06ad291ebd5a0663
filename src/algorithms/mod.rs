//! Step-emitting sorting and searching procedures
//!
//! Every algorithm reports its progress as a sequence of [`Step`]s pushed into
//! a [`StepSink`]. The sink decides what an observable moment means:
//! - in live mode it publishes the step and sleeps for the configured delay
//! - in step mode it appends the step to the recorder and returns immediately
//!
//! A sink answering [`ControlFlow::Break`] cancels the run. Algorithms check
//! the answer at every comparison boundary and return [`Outcome::Cancelled`]
//! without emitting any terminal moment. The terminal moment itself goes
//! through [`StepSink::conclude`], so a live sink can hold it back until the
//! run is committed.
//!
//! # Algorithms
//!
//! - [`search`]: Linear, Binary and Jump Search (read-only, target required)
//! - [`sort`]: Bubble, Selection and Insertion Sort (mutate the dataset in place)

/// Emit a step, bailing out of the enclosing algorithm with
/// [`Outcome::Cancelled`] when the sink asks to stop.
macro_rules! emit {
    ($sink:expr, $step:expr) => {
        if $sink.emit($step).await.is_break() {
            return $crate::algorithms::Outcome::Cancelled;
        }
    };
}

/// Hand over the terminal step of a run
macro_rules! conclude {
    ($sink:expr, $step:expr) => {
        if $sink.conclude($step).await.is_break() {
            return $crate::algorithms::Outcome::Cancelled;
        }
    };
}

pub mod errors;
pub mod search;
pub mod sort;

use crate::snapshot::Step;
use async_trait::async_trait;
use errors::EngineError;
use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;
use tracing::trace;

/// Receiver of observable moments
#[async_trait]
pub trait StepSink: Send {
    /// Deliver one step. `Break` asks the algorithm to stop immediately.
    async fn emit(&mut self, step: Step) -> ControlFlow<()>;

    /// Deliver the last step of a run, the one carrying its result
    async fn conclude(&mut self, step: Step) -> ControlFlow<()> {
        self.emit(step).await
    }
}

/// A sink that keeps every step in memory. Handy for tests and batch runs.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub steps: Vec<Step>,
}

#[async_trait]
impl StepSink for CollectSink {
    async fn emit(&mut self, step: Step) -> ControlFlow<()> {
        self.steps.push(step);
        ControlFlow::Continue(())
    }
}

/// How an algorithm run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Search located the target
    Found(usize),
    /// Search exhausted the dataset
    NotFound,
    /// Sort finished; the dataset is in non-decreasing order
    Sorted,
    /// The sink asked the run to stop
    Cancelled,
}

/// Algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Search,
    Sort,
}

/// Every algorithm the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    LinearSearch,
    BinarySearch,
    JumpSearch,
    BubbleSort,
    SelectionSort,
    InsertionSort,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::LinearSearch,
        Algorithm::BinarySearch,
        Algorithm::JumpSearch,
        Algorithm::BubbleSort,
        Algorithm::SelectionSort,
        Algorithm::InsertionSort,
    ];

    pub fn family(self) -> Family {
        match self {
            Algorithm::LinearSearch | Algorithm::BinarySearch | Algorithm::JumpSearch => {
                Family::Search
            }
            Algorithm::BubbleSort | Algorithm::SelectionSort | Algorithm::InsertionSort => {
                Family::Sort
            }
        }
    }

    /// All algorithms of one family, in menu order
    pub fn for_family(family: Family) -> impl Iterator<Item = Algorithm> {
        Self::ALL.into_iter().filter(move |a| a.family() == family)
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::LinearSearch => "Linear Search",
            Algorithm::BinarySearch => "Binary Search",
            Algorithm::JumpSearch => "Jump Search",
            Algorithm::BubbleSort => "Bubble Sort",
            Algorithm::SelectionSort => "Selection Sort",
            Algorithm::InsertionSort => "Insertion Sort",
        }
    }

    /// Reference sheet shown next to the visualization
    pub fn info(self) -> AlgorithmInfo {
        match self {
            Algorithm::LinearSearch => AlgorithmInfo {
                time_complexity: "O(n)",
                space_complexity: "O(1)",
                logic: "Checks every element in order until the target is found or the array ends.",
                best_use_cases: "Small or unsorted arrays, or a single lookup where sorting first is not worth it.",
            },
            Algorithm::BinarySearch => AlgorithmInfo {
                time_complexity: "O(log n)",
                space_complexity: "O(1)",
                logic: "Compares the target with the middle element and discards the half that cannot contain it.",
                best_use_cases: "Large sorted arrays with many lookups.",
            },
            Algorithm::JumpSearch => AlgorithmInfo {
                time_complexity: "O(√n)",
                space_complexity: "O(1)",
                logic: "Jumps ahead in blocks of √n until it passes the target, then scans the previous block linearly.",
                best_use_cases: "Sorted arrays where jumping back is expensive compared to scanning forward.",
            },
            Algorithm::BubbleSort => AlgorithmInfo {
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
                logic: "Repeatedly swaps adjacent elements that are out of order; each pass bubbles the largest remaining element to the end.",
                best_use_cases: "Teaching, or nearly sorted small arrays thanks to the early exit.",
            },
            Algorithm::SelectionSort => AlgorithmInfo {
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
                logic: "Finds the smallest remaining element and swaps it into the next position.",
                best_use_cases: "Small arrays where the number of swaps must stay minimal.",
            },
            Algorithm::InsertionSort => AlgorithmInfo {
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
                logic: "Takes each element in turn and shifts it left until it sits in order within the sorted prefix.",
                best_use_cases: "Small or nearly sorted arrays, and online sorting as elements arrive.",
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    /// Accepts display names ("Bubble Sort") and short forms ("bubble", "bubble-sort")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let algorithm = match key.as_str() {
            "linear" | "linearsearch" => Algorithm::LinearSearch,
            "binary" | "binarysearch" => Algorithm::BinarySearch,
            "jump" | "jumpsearch" => Algorithm::JumpSearch,
            "bubble" | "bubblesort" => Algorithm::BubbleSort,
            "selection" | "selectionsort" => Algorithm::SelectionSort,
            "insertion" | "insertionsort" => Algorithm::InsertionSort,
            _ => {
                return Err(EngineError::UnknownAlgorithm {
                    name: s.to_string(),
                })
            }
        };
        Ok(algorithm)
    }
}

/// Complexity and usage notes for one algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
    pub logic: &'static str,
    pub best_use_cases: &'static str,
}

/// Run `algorithm` over `data`, reporting every observable moment to `sink`.
///
/// Sorts reorder `data` in place. Searches leave it untouched and require a
/// target; without one the run is rejected before any step is emitted.
pub async fn execute(
    algorithm: Algorithm,
    data: &mut [i32],
    target: Option<i32>,
    sink: &mut dyn StepSink,
) -> Result<Outcome, EngineError> {
    trace!(%algorithm, len = data.len(), ?target, "executing algorithm");

    let outcome = match algorithm {
        Algorithm::LinearSearch => {
            search::linear_search(data, require_target(algorithm, target)?, sink).await
        }
        Algorithm::BinarySearch => {
            search::binary_search(data, require_target(algorithm, target)?, sink).await
        }
        Algorithm::JumpSearch => {
            search::jump_search(data, require_target(algorithm, target)?, sink).await
        }
        Algorithm::BubbleSort => sort::bubble_sort(data, sink).await,
        Algorithm::SelectionSort => sort::selection_sort(data, sink).await,
        Algorithm::InsertionSort => sort::insertion_sort(data, sink).await,
    };

    Ok(outcome)
}

fn require_target(algorithm: Algorithm, target: Option<i32>) -> Result<i32, EngineError> {
    target.ok_or(EngineError::MissingTarget { algorithm })
}
