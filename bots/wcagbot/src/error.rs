// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for wcagbot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WcagError>;

#[derive(Error, Debug)]
pub enum WcagError {
    #[error("Success criterion not found: {0}")]
    NotFound(String),

    #[error("Invalid conformance level: {0} (expected A, AA or AAA)")]
    InvalidLevel(String),

    #[error("Invalid principle: {0} (expected perceivable, operable, understandable or robust)")]
    InvalidPrinciple(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Criteria catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
