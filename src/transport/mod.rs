// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower layers composed into alloy RPC transports.

mod rate_limit;

pub use rate_limit::RateLimitLayer;
