// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: image files, config, and removal backends.

pub mod media;
pub mod model_info;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod removal;
pub mod serialization;
