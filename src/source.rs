//! Array sources used to seed and reset the dataset
//!
//! The controller only talks to the [`ArraySource`] trait. Any failure is
//! answered by falling back to the configured default dataset.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The store holds no arrays yet
    #[error("no arrays found")]
    Empty,

    /// The array is unusable (for example empty)
    #[error("invalid array data: {0}")]
    Invalid(String),

    /// Backend could not be reached
    #[error("array source unavailable: {0}")]
    Unavailable(String),
}

/// Provider of example arrays
#[async_trait]
pub trait ArraySource: Send + Sync {
    async fn fetch_random_array(&self) -> Result<Vec<i32>, SourceError>;

    async fn submit_array(&self, numbers: Vec<i32>) -> Result<(), SourceError>;
}

/// Generates a fresh random array on every fetch. Submissions are accepted
/// and discarded.
#[derive(Debug, Clone)]
pub struct RandomArraySource {
    size: usize,
    min_value: i32,
    max_value: i32,
}

impl RandomArraySource {
    pub fn new(size: usize, min_value: i32, max_value: i32) -> Self {
        RandomArraySource {
            size,
            min_value: min_value.min(max_value),
            max_value: max_value.max(min_value),
        }
    }

    pub fn generate(&self) -> Vec<i32> {
        let mut rng = rand::rng();
        (0..self.size)
            .map(|_| rng.random_range(self.min_value..=self.max_value))
            .collect()
    }
}

#[async_trait]
impl ArraySource for RandomArraySource {
    async fn fetch_random_array(&self) -> Result<Vec<i32>, SourceError> {
        Ok(self.generate())
    }

    async fn submit_array(&self, numbers: Vec<i32>) -> Result<(), SourceError> {
        if numbers.is_empty() {
            return Err(SourceError::Invalid("array is empty".into()));
        }
        Ok(())
    }
}

/// In-process store of submitted arrays; fetch picks one at random
#[derive(Debug, Default)]
pub struct MemoryArraySource {
    arrays: Mutex<Vec<Vec<i32>>>,
}

impl MemoryArraySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arrays(arrays: Vec<Vec<i32>>) -> Self {
        MemoryArraySource {
            arrays: Mutex::new(arrays),
        }
    }

    pub fn len(&self) -> usize {
        self.arrays.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArraySource for MemoryArraySource {
    async fn fetch_random_array(&self) -> Result<Vec<i32>, SourceError> {
        let arrays = self
            .arrays
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if arrays.is_empty() {
            return Err(SourceError::Empty);
        }

        let index = rand::rng().random_range(0..arrays.len());
        Ok(arrays[index].clone())
    }

    async fn submit_array(&self, numbers: Vec<i32>) -> Result<(), SourceError> {
        if numbers.is_empty() {
            return Err(SourceError::Invalid("array is empty".into()));
        }

        self.arrays
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?
            .push(numbers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_random_source_respects_bounds() {
        let source = RandomArraySource::new(50, 1, 99);
        let data = source.fetch_random_array().await.unwrap();

        assert_eq!(data.len(), 50);
        assert!(data.iter().all(|v| (1..=99).contains(v)));
    }

    #[tokio::test]
    async fn test_memory_source_round_trip() {
        let source = MemoryArraySource::new();
        assert_eq!(source.fetch_random_array().await, Err(SourceError::Empty));

        source.submit_array(vec![3, 1, 2]).await.unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(source.fetch_random_array().await.unwrap(), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_submission_rejected() {
        let source = MemoryArraySource::new();
        assert!(matches!(
            source.submit_array(Vec::new()).await,
            Err(SourceError::Invalid(_))
        ));
        assert!(source.is_empty());
    }
}
