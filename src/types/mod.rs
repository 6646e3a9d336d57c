// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod enums;
pub mod sample;

pub use enums::{Connectivity, Origin};
pub use id::{NodeId, TreeSlot};
pub use sample::{parse_timestamp, Sample};
