// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration Tests for Peerlink Core
//!
//! These tests drive the connection manager, sessions, registry and message
//! router together from simulated transport callbacks.
//!
//! Run with: cargo test --test integration

mod connection_lifecycle_test;
