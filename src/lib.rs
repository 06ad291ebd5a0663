//! # Introduction
//!
//! algoviz runs classic searching and sorting algorithms one step at a time,
//! publishing a display snapshot after every comparison, swap or move. A run
//! is either paced live against a wall-clock delay or recorded in full and
//! then navigated forward and backward.
//!
//! ## Execution pipeline
//!
//! ```text
//! ArraySource → Controller → Algorithm → StepSink → ExecutionState
//!                                            ↓
//!                                       StepRecorder
//! ```
//!
//! 1. [`algorithms`]: Linear, Binary and Jump Search; Bubble, Selection and
//!    Insertion Sort. Each reports its progress as [`snapshot::Step`]s.
//! 2. [`snapshot`]: the step type and the memory-bounded [`snapshot::StepRecorder`].
//! 3. [`controller`]: start/stop/reset, live and step mode, the elapsed
//!    timer and cancellation. State is published through a watch channel.
//! 4. [`source`]: where datasets come from.
//! 5. [`config`] and [`logging`]: ambient setup for the binary.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use algoviz::{config::Config, controller::{Command, Controller}, source::RandomArraySource};
//!
//! # async fn demo() {
//! let config = Config::default();
//! let source = Arc::new(RandomArraySource::new(config.array_size, config.min_value, config.max_value));
//! let mut controller = Controller::new(config, source);
//! controller.handle(Command::ToggleStepMode).await;
//! controller.handle(Command::Start).await;
//! while controller.state().can_step_forward {
//!     controller.handle(Command::StepForward).await;
//! }
//! # }
//! ```

pub mod algorithms;
pub mod config;
pub mod controller;
pub mod logging;
pub mod snapshot;
pub mod source;
