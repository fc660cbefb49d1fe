// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for SecureChat tests.
//!
//! Provides mock collaborators for fast, deterministic, CI-runnable tests
//! without a real engagement backend.
//!
//! # Components
//!
//! - [`MockBackend`] - queues, session, transcript, and live signals
//! - [`MockFileTransport`] - scripted uploads and downloads with an optional gate
//! - [`fixtures`] - small builders for queues, messages, and files

pub mod fixtures;
pub mod mock_backend;
pub mod mock_transport;

pub use mock_backend::{MockBackend, Reply};
pub use mock_transport::MockFileTransport;
