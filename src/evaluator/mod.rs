// src/evaluator/mod.rs
use crate::cache::BalanceCache;
use crate::error::{GateError, GateResult};
use crate::types::{Balance, BalanceSource, ContractType, EvaluationResult, Requirement};
use alloy_primitives::U256;

/// Decides whether an address satisfies a weighted set of on-chain
/// threshold requirements.
pub struct RequirementsEvaluator;

impl RequirementsEvaluator {
    /// Evaluate every requirement and count how many the address satisfies.
    ///
    /// A requirement is met only when the fetched balance is strictly
    /// greater than its threshold. When `num_required` is omitted, all
    /// requirements must be met. A failed balance fetch counts as "not met"
    /// for that one requirement; evaluation never aborts on a bad RPC
    /// endpoint, it degrades to a verdict over what it could resolve.
    pub async fn evaluate(
        address: &str,
        requirements: &[Requirement],
        cache: &BalanceCache,
        num_required: Option<usize>,
    ) -> EvaluationResult {
        let mut num_requirements_met = 0;

        for requirement in requirements {
            match Self::requirement_met(address, requirement, cache).await {
                Ok(true) => num_requirements_met += 1,
                Ok(false) => {}
                Err(cause) => {
                    let e = GateError::RequirementUnresolved(Box::new(cause));
                    tracing::warn!(
                        address,
                        error = %e,
                        retryable = e.is_retryable(),
                        "counting requirement as not met"
                    );
                }
            }
        }

        let required = num_required.unwrap_or(requirements.len());

        EvaluationResult {
            is_valid: num_requirements_met >= required,
            num_requirements_met,
        }
    }

    async fn requirement_met(
        address: &str,
        requirement: &Requirement,
        cache: &BalanceCache,
    ) -> GateResult<bool> {
        let Requirement::Threshold { data } = requirement;

        let threshold = parse_threshold(&data.threshold)?;
        let balance = fetch_source_balance(address, &data.source, cache).await?;

        // Strict inequality throughout: equal-to-threshold does not qualify.
        Ok(balance > threshold)
    }
}

fn parse_threshold(threshold: &str) -> GateResult<Balance> {
    U256::from_str_radix(threshold, 10)
        .map_err(|e| GateError::InvalidArguments(format!("bad threshold {threshold:?}: {e}")))
}

async fn fetch_source_balance(
    address: &str,
    source: &BalanceSource,
    cache: &BalanceCache,
) -> GateResult<Balance> {
    match source {
        BalanceSource::Erc20 {
            evm_chain_id,
            contract_address,
        } => {
            let node_id = cache.node_id_for_eth_chain(*evm_chain_id).await?;
            cache
                .get_balance(
                    node_id,
                    address,
                    Some(contract_address),
                    Some(ContractType::Erc20),
                )
                .await
        }
        BalanceSource::Erc721 {
            evm_chain_id,
            contract_address,
        } => {
            let node_id = cache.node_id_for_eth_chain(*evm_chain_id).await?;
            cache
                .get_balance(
                    node_id,
                    address,
                    Some(contract_address),
                    Some(ContractType::Erc721),
                )
                .await
        }
        BalanceSource::EthNative { evm_chain_id } => {
            let node_id = cache.node_id_for_eth_chain(*evm_chain_id).await?;
            cache.get_balance(node_id, address, None, None).await
        }
        BalanceSource::CosmosNative { cosmos_chain_id } => {
            let node_id = cache.node_id_for_name(cosmos_chain_id).await?;
            cache.get_balance(node_id, address, None, None).await
        }
    }
}
