// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline engine: stage worker pools, routing and terminal collection.

mod callbacks;
pub mod packet;
mod pipeline;
pub mod signal;
mod stage;
mod stats;


pub use callbacks::{FailHandler, FinishHandler};
pub use packet::Packet;
pub use pipeline::{Pipeline, PipelineState};
pub use signal::ControlSignal;
pub use stats::StatsSnapshot;
