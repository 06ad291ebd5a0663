//! Sorting algorithms
//!
//! Each sort reorders the dataset in place and copies it into every step, so
//! a recorded history can be replayed without re-running the algorithm.
//! Equal neighbours are never exchanged.

use super::{Outcome, StepSink};
use crate::snapshot::Step;
use rustc_hash::FxHashSet;

const NOTHING: [usize; 0] = [];
const COMPLETED: &str = "Sorting completed";

fn all_indices(n: usize) -> FxHashSet<usize> {
    (0..n).collect()
}

/// Adjacent compare-and-swap passes with early exit on a swap-free pass
pub async fn bubble_sort(data: &mut [i32], sink: &mut dyn StepSink) -> Outcome {
    let n = data.len();
    let mut sorted = FxHashSet::default();

    for i in 0..n {
        let mut swapped = false;

        for j in 0..n - i - 1 {
            let message = format!("Comparing {} and {}", data[j], data[j + 1]);
            emit!(sink, Step::sort(data, [j, j + 1], &sorted, message));

            if data[j] > data[j + 1] {
                data.swap(j, j + 1);
                swapped = true;

                let message = format!("Swapped {} and {}", data[j], data[j + 1]);
                emit!(sink, Step::sort(data, [j, j + 1], &sorted, message));
            }
        }

        sorted.insert(n - i - 1);

        if !swapped || i == n - 1 {
            break;
        }

        let message = format!("Pass {} completed", i + 1);
        emit!(sink, Step::sort(data, NOTHING, &sorted, message));
    }

    conclude!(sink, Step::sort(data, NOTHING, &all_indices(n), COMPLETED));
    Outcome::Sorted
}

/// Repeatedly select the minimum of the unsorted suffix
pub async fn selection_sort(data: &mut [i32], sink: &mut dyn StepSink) -> Outcome {
    let n = data.len();
    let mut sorted = FxHashSet::default();

    for i in 0..n.saturating_sub(1) {
        let mut min_idx = i;

        for j in i + 1..n {
            let message = format!("Comparing {} and {}", data[min_idx], data[j]);
            emit!(sink, Step::sort(data, [min_idx, j], &sorted, message));

            if data[j] < data[min_idx] {
                min_idx = j;
            }
        }

        data.swap(i, min_idx);
        sorted.insert(i);

        let message = format!("Moved smallest element {} to position {}", data[i], i);
        emit!(sink, Step::sort(data, [i, min_idx], &sorted, message));
    }

    // The last position holds the maximum without needing a pass of its own
    conclude!(sink, Step::sort(data, NOTHING, &all_indices(n), COMPLETED));
    Outcome::Sorted
}

/// Grow a sorted prefix by shifting each new key left into place
pub async fn insertion_sort(data: &mut [i32], sink: &mut dyn StepSink) -> Outcome {
    let n = data.len();
    let mut sorted = FxHashSet::default();
    if n > 0 {
        sorted.insert(0);
    }

    for i in 1..n {
        let key = data[i];
        emit!(
            sink,
            Step::sort(data, [i], &sorted, format!("Inserting element {}", key))
        );

        let mut j = i;
        while j > 0 && data[j - 1] > key {
            let message = format!("Comparing {} with {}", data[j - 1], key);
            emit!(sink, Step::sort(data, [j - 1, j], &sorted, message));

            data.swap(j - 1, j);

            let message = format!("Swapped {} and {}", data[j - 1], data[j]);
            emit!(sink, Step::sort(data, [j - 1, j], &sorted, message));

            j -= 1;
        }

        // 0..i were already marked by earlier iterations
        sorted.insert(i);

        emit!(
            sink,
            Step::sort(data, [j], &sorted, format!("Inserted element {}", key))
        );
    }

    conclude!(sink, Step::sort(data, NOTHING, &all_indices(n), COMPLETED));
    Outcome::Sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::CollectSink;

    fn is_sorted(data: &[i32]) -> bool {
        data.windows(2).all(|w| w[0] <= w[1])
    }

    fn assert_finished(data: &[i32], sink: &CollectSink) {
        assert!(is_sorted(data));
        let last = sink.steps.last().expect("at least one step");
        assert_eq!(last.data(), Some(data));
        assert_eq!(last.sorted_indices(), Some(&all_indices(data.len())));
        assert_eq!(last.message, COMPLETED);
        assert!(last.highlighted_indices.is_empty());
    }

    #[tokio::test]
    async fn test_bubble_sort() {
        let mut data = vec![8, 3, 5, 4, 7, 1, 6, 2];
        let mut sink = CollectSink::default();

        assert_eq!(bubble_sort(&mut data, &mut sink).await, Outcome::Sorted);
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_finished(&data, &sink);

        // First moment compares the first two elements of the original data
        let first = &sink.steps[0];
        assert_eq!(first.data(), Some(&[8, 3, 5, 4, 7, 1, 6, 2][..]));
        assert_eq!(first.message, "Comparing 8 and 3");
        assert_eq!(sink.steps[1].message, "Swapped 3 and 8");
    }

    #[tokio::test]
    async fn test_bubble_sort_early_exit() {
        let mut data = vec![1, 2, 3, 4];
        let mut sink = CollectSink::default();
        bubble_sort(&mut data, &mut sink).await;

        // one swap-free pass of three comparisons, then the terminal step
        assert_eq!(sink.steps.len(), 4);
        assert_finished(&data, &sink);
    }

    #[tokio::test]
    async fn test_bubble_sort_pass_marks_tail() {
        let mut data = vec![3, 2, 1];
        let mut sink = CollectSink::default();
        bubble_sort(&mut data, &mut sink).await;

        let pass = sink
            .steps
            .iter()
            .find(|s| s.message == "Pass 1 completed")
            .expect("pass step");
        assert_eq!(pass.sorted_indices(), Some(&[2].into_iter().collect()));
    }

    #[tokio::test]
    async fn test_selection_sort() {
        let mut data = vec![64, 25, 12, 22, 11];
        let mut sink = CollectSink::default();

        assert_eq!(selection_sort(&mut data, &mut sink).await, Outcome::Sorted);
        assert_eq!(data, vec![11, 12, 22, 25, 64]);
        assert_finished(&data, &sink);

        // 4 + 3 + 2 + 1 comparisons, 4 moves, 1 terminal
        assert_eq!(sink.steps.len(), 15);
        assert_eq!(sink.steps[4].message, "Moved smallest element 11 to position 0");
    }

    #[tokio::test]
    async fn test_insertion_sort() {
        let mut data = vec![5, 2, 4, 6, 1, 3];
        let mut sink = CollectSink::default();

        assert_eq!(insertion_sort(&mut data, &mut sink).await, Outcome::Sorted);
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);
        assert_finished(&data, &sink);

        assert_eq!(sink.steps[0].message, "Inserting element 2");
        assert_eq!(sink.steps[1].message, "Comparing 5 with 2");
        assert_eq!(sink.steps[2].message, "Swapped 2 and 5");
        assert_eq!(sink.steps[3].message, "Inserted element 2");
        assert_eq!(sink.steps[3].sorted_indices(), Some(&all_indices(2)));
    }

    #[tokio::test]
    async fn test_equal_elements_not_swapped() {
        let mut data = vec![2, 2, 1];
        let mut sink = CollectSink::default();
        bubble_sort(&mut data, &mut sink).await;

        assert_eq!(data, vec![1, 2, 2]);
        assert!(!sink.steps.iter().any(|s| s.message == "Swapped 2 and 2"));

        let mut data = vec![3, 3];
        let mut sink = CollectSink::default();
        insertion_sort(&mut data, &mut sink).await;
        assert!(!sink.steps.iter().any(|s| s.message.starts_with("Swapped")));
    }

    #[tokio::test]
    async fn test_trivial_inputs() {
        for input in [vec![], vec![42]] {
            let mut sink = CollectSink::default();
            let mut data = input.clone();
            bubble_sort(&mut data, &mut sink).await;
            selection_sort(&mut data, &mut sink).await;
            insertion_sort(&mut data, &mut sink).await;

            assert_eq!(data, input);
            // a single terminal step per algorithm
            assert_eq!(sink.steps.len(), 3);
            assert!(sink.steps.iter().all(|s| s.message == COMPLETED));
        }
    }
}
