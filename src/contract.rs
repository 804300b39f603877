// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Contract handles
//!
//! A contract handle is a stateless view over a deployed contract, built
//! fresh on every request from a client plus the contract's address and ABI.
//! Handles are never cached — only the client underneath them is — so there
//! is no handle invalidation to coordinate when an environment shuts down.

use alloy_contract::{ContractInstance, Interface};
use alloy_network::AnyNetwork;

use crate::client::{AnyProvider, Client};
use crate::config::ContractDeployment;

/// A dynamically-typed handle over one deployed contract.
pub type ContractHandle = ContractInstance<AnyProvider, AnyNetwork>;

/// Build a fresh handle from a client and deployment metadata.
pub(crate) fn build_contract(client: &Client, deployment: &ContractDeployment) -> ContractHandle {
    let interface = Interface::new(deployment.abi.clone());
    ContractInstance::new(deployment.address, client.provider().clone(), interface)
}
