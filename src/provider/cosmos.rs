// src/provider/cosmos.rs
use crate::error::{GateError, GateResult};
use crate::provider::{BalanceProvider, FetchParams};
use crate::types::Balance;
use alloy_primitives::U256;
use async_trait::async_trait;
use serde::Deserialize;

/// Native Cosmos-SDK balance via the LCD bank module.
///
/// Queries `/cosmos/bank/v1beta1/balances/{address}` and returns the amount
/// of the first (primary staking) denom, or zero for an empty account.
pub struct CosmosNativeProvider {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct BankBalancesResponse {
    #[serde(default)]
    balances: Vec<DenomAmount>,
}

#[derive(Debug, Deserialize)]
struct DenomAmount {
    #[allow(dead_code)]
    denom: String,
    amount: String,
}

impl CosmosNativeProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for CosmosNativeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BalanceProvider for CosmosNativeProvider {
    async fn fetch(&self, params: FetchParams<'_>) -> GateResult<Balance> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}",
            params.rpc_url.trim_end_matches('/'),
            params.address
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GateError::ProviderFetchFailed(format!("bank balances request: {e}")))?
            .error_for_status()
            .map_err(|e| GateError::ProviderFetchFailed(format!("bank balances status: {e}")))?
            .json::<BankBalancesResponse>()
            .await
            .map_err(|e| GateError::ProviderFetchFailed(format!("bank balances decode: {e}")))?;

        match response.balances.first() {
            Some(entry) => U256::from_str_radix(&entry.amount, 10).map_err(|e| {
                GateError::ProviderFetchFailed(format!(
                    "malformed amount {:?}: {e}",
                    entry.amount
                ))
            }),
            None => Ok(U256::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_decoding() {
        let body = r#"{
            "balances": [
                { "denom": "uosmo", "amount": "123456789012345678901234567890" }
            ],
            "pagination": { "next_key": null, "total": "1" }
        }"#;

        let parsed: BankBalancesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.balances.len(), 1);
        assert_eq!(
            U256::from_str_radix(&parsed.balances[0].amount, 10).unwrap(),
            U256::from_str_radix("123456789012345678901234567890", 10).unwrap()
        );
    }

    #[test]
    fn test_empty_account_decodes_to_no_balances() {
        let body = r#"{ "balances": [], "pagination": { "next_key": null, "total": "0" } }"#;
        let parsed: BankBalancesResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.balances.is_empty());
    }
}
