// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: viewport, image pair, settings and model catalogue.

pub mod catalog;
pub mod config;
pub mod pair;
pub mod viewport;
