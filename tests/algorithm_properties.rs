// Property tests for the algorithm engine

use algoviz::algorithms::{execute, Algorithm, CollectSink, Family, Outcome};
use algoviz::snapshot::{Step, StepRecorder};
use proptest::prelude::*;

fn run(algorithm: Algorithm, data: &[i32], target: Option<i32>) -> (Vec<i32>, Outcome, Vec<Step>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let mut data = data.to_vec();
    let mut sink = CollectSink::default();
    let outcome = runtime
        .block_on(execute(algorithm, &mut data, target, &mut sink))
        .expect("run should be accepted");
    (data, outcome, sink.steps)
}

fn sorted_copy(data: &[i32]) -> Vec<i32> {
    let mut copy = data.to_vec();
    copy.sort_unstable();
    copy
}

proptest! {
    #[test]
    fn sorts_produce_sorted_permutation(data in prop::collection::vec(-50i32..50, 0..24)) {
        for algorithm in Algorithm::for_family(Family::Sort) {
            let (sorted, outcome, steps) = run(algorithm, &data, None);
            prop_assert_eq!(outcome, Outcome::Sorted);
            prop_assert_eq!(&sorted, &sorted_copy(&data));

            let last = steps.last().expect("at least the completion step");
            prop_assert_eq!(last.message.as_str(), "Sorting completed");
            prop_assert_eq!(last.data(), Some(sorted.as_slice()));
            prop_assert_eq!(last.sorted_indices().map(|s| s.len()), Some(data.len()));
        }
    }

    #[test]
    fn sort_steps_stay_in_bounds(data in prop::collection::vec(0i32..20, 0..16)) {
        let expected = sorted_copy(&data);
        for algorithm in Algorithm::for_family(Family::Sort) {
            let (_, _, steps) = run(algorithm, &data, None);
            for step in &steps {
                prop_assert!(step.highlighted_indices.iter().all(|&i| i < data.len()));
                let snapshot = step.data().expect("sort steps carry data");
                // Every intermediate dataset is a permutation of the input
                prop_assert_eq!(sorted_copy(snapshot), expected.clone());
                let marked = step.sorted_indices().expect("sort steps carry markers");
                prop_assert!(marked.iter().all(|&i| i < data.len()));
            }
        }
    }

    #[test]
    fn linear_search_finds_first_occurrence(
        data in prop::collection::vec(0i32..10, 0..20),
        target in 0i32..12,
    ) {
        let (_, outcome, steps) = run(Algorithm::LinearSearch, &data, Some(target));
        match data.iter().position(|&v| v == target) {
            Some(index) => {
                prop_assert_eq!(outcome, Outcome::Found(index));
                prop_assert_eq!(steps.last().and_then(Step::found_index), Some(index));
            }
            None => {
                prop_assert_eq!(outcome, Outcome::NotFound);
                prop_assert_eq!(steps.last().map(Step::found_index), Some(None));
                prop_assert!(steps.iter().all(|s| s.found_index().is_none()));
            }
        }
    }

    #[test]
    fn sorted_searches_agree_with_contains(
        data in prop::collection::vec(-30i32..30, 0..40),
        target in -35i32..35,
    ) {
        let data = sorted_copy(&data);
        for algorithm in [Algorithm::BinarySearch, Algorithm::JumpSearch] {
            let (_, outcome, steps) = run(algorithm, &data, Some(target));
            let last = steps.last().expect("every search ends with a terminal step");
            match outcome {
                Outcome::Found(index) => {
                    prop_assert_eq!(data[index], target);
                    prop_assert_eq!(last.found_index(), Some(index));
                }
                Outcome::NotFound => {
                    prop_assert!(!data.contains(&target));
                    prop_assert_eq!(last.found_index(), None);
                }
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
            // Only the terminal step may carry the found marker
            let marked = steps.iter().filter(|s| s.found_index().is_some()).count();
            prop_assert!(marked <= 1);
            for step in &steps {
                prop_assert!(step.highlighted_indices.iter().all(|&i| i < data.len()));
            }
        }
    }

    #[test]
    fn recorder_keeps_every_step(data in prop::collection::vec(0i32..100, 1..12)) {
        let (_, _, steps) = run(Algorithm::InsertionSort, &data, None);
        let mut recorder = StepRecorder::new(usize::MAX);
        recorder.set_enabled(true);
        for step in &steps {
            recorder.append(step.clone()).expect("unbounded recorder");
        }

        prop_assert_eq!(recorder.len(), steps.len());
        for (index, step) in steps.iter().enumerate() {
            prop_assert_eq!(recorder.at(index).expect("in range"), step);
        }
        prop_assert!(recorder.at(steps.len()).is_err());
    }
}
