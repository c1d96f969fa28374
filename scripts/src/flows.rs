//! Creation, update and deletion of flows towards the super app
//!
//! A flow mutation is a single transaction, sent either straight to the host
//! with an encoded constant flow agreement call, or through the CFAv1
//! forwarder, the higher level entry point the Superfluid SDK operations use.

use std::fmt::{self, Display};

use alloy::{
    network::TransactionBuilder,
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use alloy_primitives::{aliases::I96, Address, Bytes};
use alloy_sol_types::SolCall;
use clap::ValueEnum;
use superapp_abi::superfluid::{
    ICFAv1Forwarder,
    IConstantFlowAgreementV1::{createFlowCall, deleteFlowCall, updateFlowCall},
    ISuperfluid::callAgreementCall,
};

use crate::{errors::ScriptError, networks::NetworkDescriptor, utils::wait_for_receipt};

/// The kind of flow mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowAction {
    /// Open a new flow
    Create,
    /// Change the rate of an existing flow
    Update,
    /// Close an existing flow
    Delete,
}

impl Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowAction::Create => write!(f, "create"),
            FlowAction::Update => write!(f, "update"),
            FlowAction::Delete => write!(f, "delete"),
        }
    }
}

/// The contract through which a flow mutation is sent
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowRoute {
    /// `ISuperfluid.callAgreement` with an encoded agreement call
    Host,
    /// The CFAv1 forwarder
    Forwarder,
}

impl Display for FlowRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowRoute::Host => write!(f, "host"),
            FlowRoute::Forwarder => write!(f, "forwarder"),
        }
    }
}

/// The parameters of a flow mutation
#[derive(Clone, Debug)]
pub struct FlowParams {
    /// The account streaming the tokens
    pub sender: Address,
    /// The account receiving the stream
    pub receiver: Address,
    /// The super token being streamed
    pub token: Address,
    /// The rate of the flow in wei per second, ignored on deletion
    pub flow_rate: I96,
    /// The opaque payload handed to the receiving super app
    pub user_data: Bytes,
}

/// Encode the constant flow agreement call for the given mutation, with an
/// empty context for the host to fill in
pub fn agreement_calldata(action: FlowAction, params: &FlowParams) -> Bytes {
    let calldata = match action {
        FlowAction::Create => createFlowCall {
            token: params.token,
            receiver: params.receiver,
            flowRate: params.flow_rate,
            ctx: Bytes::new(),
        }
        .abi_encode(),
        FlowAction::Update => updateFlowCall {
            token: params.token,
            receiver: params.receiver,
            flowRate: params.flow_rate,
            ctx: Bytes::new(),
        }
        .abi_encode(),
        FlowAction::Delete => deleteFlowCall {
            token: params.token,
            sender: params.sender,
            receiver: params.receiver,
            ctx: Bytes::new(),
        }
        .abi_encode(),
    };

    calldata.into()
}

/// Encode the forwarder call for the given mutation
pub fn forwarder_calldata(action: FlowAction, params: &FlowParams) -> Bytes {
    let FlowParams {
        sender,
        receiver,
        token,
        flow_rate,
        user_data,
    } = params.clone();

    let calldata = match action {
        FlowAction::Create => ICFAv1Forwarder::createFlowCall {
            token,
            sender,
            receiver,
            flowrate: flow_rate,
            userData: user_data,
        }
        .abi_encode(),
        FlowAction::Update => ICFAv1Forwarder::updateFlowCall {
            token,
            sender,
            receiver,
            flowrate: flow_rate,
            userData: user_data,
        }
        .abi_encode(),
        FlowAction::Delete => ICFAv1Forwarder::deleteFlowCall {
            token,
            sender,
            receiver,
            userData: user_data,
        }
        .abi_encode(),
    };

    calldata.into()
}

/// Build the transaction performing the flow mutation through `route`
pub fn flow_transaction(
    network: &NetworkDescriptor,
    route: FlowRoute,
    action: FlowAction,
    params: &FlowParams,
) -> TransactionRequest {
    let (to, calldata): (Address, Bytes) = match route {
        FlowRoute::Host => {
            let call = callAgreementCall {
                agreementClass: network.cfa_v1,
                callData: agreement_calldata(action, params),
                userData: params.user_data.clone(),
            };
            (network.host, call.abi_encode().into())
        }
        FlowRoute::Forwarder => (network.cfa_v1_forwarder, forwarder_calldata(action, params)),
    };

    TransactionRequest::default()
        .with_from(params.sender)
        .with_to(to)
        .with_input(calldata)
}

/// Send the flow mutation in a single transaction
pub async fn mutate_flow<P: Provider>(
    provider: &P,
    network: &NetworkDescriptor,
    route: FlowRoute,
    action: FlowAction,
    params: &FlowParams,
) -> Result<TransactionReceipt, ScriptError> {
    let tx = flow_transaction(network, route, action, params);
    let pending = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    wait_for_receipt(provider, *pending.tx_hash(), ScriptError::ContractInteraction).await
}
