// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.
//! Import these in property test files to avoid duplication.

#![allow(dead_code)]

use proptest::prelude::*;

// ============================================================
// Registry Strategies
// ============================================================

/// One mutation against a registry.
#[derive(Debug, Clone, Copy)]
pub enum RegistryOp {
    Register(u64),
    Unregister(u64),
}

/// Strategy for a handle from a small space, so operations collide often.
pub fn handle_strategy() -> impl Strategy<Value = u64> {
    0u64..16
}

pub fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        handle_strategy().prop_map(RegistryOp::Register),
        handle_strategy().prop_map(RegistryOp::Unregister),
    ]
}

pub fn registry_ops_strategy() -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(registry_op_strategy(), 0..64)
}

// ============================================================
// Identity Strategies
// ============================================================

/// Strategy for network addresses (`ip:port`).
pub fn address_strategy() -> impl Strategy<Value = String> {
    (any::<[u8; 4]>(), 1u16..)
        .prop_map(|(ip, port)| format!("{}.{}.{}.{}:{}", ip[0], ip[1], ip[2], ip[3], port))
}

/// Strategy for verified account ids (never zero).
pub fn account_id_strategy() -> impl Strategy<Value = u64> {
    1u64..
}

// ============================================================
// Payload Strategies
// ============================================================

/// Strategy for payloads, empty ones included.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}
