// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Segmentation models offered in the model picker.

/// Model shipped with the default install.
pub const DEFAULT_MODEL: &str = "u2net";

/// Selectable models, default first.
pub const AVAILABLE_MODELS: &[&str] = &[
    "u2net",
    "birefnet-general",
    "birefnet-general-lite",
    "birefnet-portrait",
    "birefnet-dis",
    "birefnet-hrsod",
    "birefnet-cod",
    "birefnet-massive",
    "isnet-anime",
    "isnet-general-use",
    "sam",
    "silueta",
    "u2net_cloth_seg",
    "u2net_custom",
    "u2net_human_seg",
    "u2netp",
    "bria-rmbg",
];

pub fn is_known_model(name: &str) -> bool {
    AVAILABLE_MODELS.contains(&name)
}
