// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The aggregation and reporting engine. Pure functions over an immutable
//! [`crate::models::Snapshot`]; nothing in here touches the store or any
//! other external state, and no function raises on partial data.

pub mod aggregate;
pub mod export;
pub mod formulas;
pub mod normalize;
pub mod report;
pub mod trend;
pub mod windows;
