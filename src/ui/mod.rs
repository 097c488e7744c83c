// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the cutout application.

pub mod controls;
pub mod preview_panel;
