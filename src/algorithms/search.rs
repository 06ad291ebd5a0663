//! Searching algorithms
//!
//! All three treat the dataset as read-only. Binary and Jump Search assume the
//! data is sorted in non-decreasing order; this is not checked, an unsorted
//! input simply produces a meaningless (but finite) run.

use super::{Outcome, StepSink};
use crate::snapshot::Step;

const NOTHING: [usize; 0] = [];

fn comparing(value: i32, target: i32) -> String {
    format!("Comparing {} with target {}", value, target)
}

fn found(target: i32, index: usize) -> String {
    format!("Found {} at index {}", target, index)
}

fn not_found(target: i32) -> String {
    format!("{} not found in the array", target)
}

/// Scan indices `0..n` in order
pub async fn linear_search(data: &[i32], target: i32, sink: &mut dyn StepSink) -> Outcome {
    for (i, &value) in data.iter().enumerate() {
        emit!(sink, Step::search([i], comparing(value, target), None));

        if value == target {
            conclude!(sink, Step::search([i], found(target, i), Some(i)));
            return Outcome::Found(i);
        }
    }

    conclude!(sink, Step::search(NOTHING, not_found(target), None));
    Outcome::NotFound
}

/// Halve the `[left, right]` interval around its midpoint until it is empty
pub async fn binary_search(data: &[i32], target: i32, sink: &mut dyn StepSink) -> Outcome {
    let mut left: isize = 0;
    let mut right: isize = data.len() as isize - 1;

    while left <= right {
        let mid = ((left + right) / 2) as usize;
        let value = data[mid];
        emit!(sink, Step::search([mid], comparing(value, target), None));

        if value == target {
            conclude!(sink, Step::search([mid], found(target, mid), Some(mid)));
            return Outcome::Found(mid);
        }

        if value < target {
            left = mid as isize + 1;
            emit!(sink, Step::search([mid], "Searching right half", None));
        } else {
            right = mid as isize - 1;
            emit!(sink, Step::search([mid], "Searching left half", None));
        }
    }

    conclude!(sink, Step::search(NOTHING, not_found(target), None));
    Outcome::NotFound
}

/// Jump ahead in blocks of `floor(sqrt(n))`, then scan the block that may
/// hold the target.
pub async fn jump_search(data: &[i32], target: i32, sink: &mut dyn StepSink) -> Outcome {
    let n = data.len();

    // The block-end index below is `min(step, n) - 1`, which underflows on empty input
    if n == 0 {
        conclude!(sink, Step::search(NOTHING, not_found(target), None));
        return Outcome::NotFound;
    }

    let block = (n as f64).sqrt() as usize;
    let mut step = block;
    let mut prev = 0;

    while data[step.min(n) - 1] < target {
        prev = step;
        step += block;

        if prev >= n {
            conclude!(sink, Step::search(NOTHING, not_found(target), None));
            return Outcome::NotFound;
        }

        emit!(
            sink,
            Step::search([prev], format!("Jumping to block starting at index {}", prev), None)
        );
    }

    while data[prev] < target {
        prev += 1;

        if prev == step.min(n) {
            conclude!(sink, Step::search(NOTHING, not_found(target), None));
            return Outcome::NotFound;
        }

        emit!(
            sink,
            Step::search([prev], format!("Linear scanning at index {}", prev), None)
        );
    }

    if data[prev] == target {
        conclude!(sink, Step::search([prev], found(target, prev), Some(prev)));
        return Outcome::Found(prev);
    }

    conclude!(sink, Step::search(NOTHING, not_found(target), None));
    Outcome::NotFound
}
