// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared helpers, fixtures, and utilities used across test modules.
//! This module provides reusable test infrastructure to reduce duplication.

pub mod helpers;
pub mod strategies;
