// src/provider/evm.rs
use crate::error::{GateError, GateResult};
use crate::provider::{BalanceProvider, FetchParams};
use crate::types::Balance;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::sol;
use alloy_primitives::Address;
use async_trait::async_trait;
use std::str::FromStr;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

fn parse_evm_address(address: &str) -> GateResult<Address> {
    Address::from_str(address).map_err(|_| GateError::InvalidAddress(address.to_string()))
}

fn http_provider(rpc_url: &str) -> GateResult<impl Provider> {
    let url: reqwest::Url = rpc_url
        .parse()
        .map_err(|e| GateError::ProviderFetchFailed(format!("invalid rpc url {rpc_url}: {e}")))?;
    Ok(ProviderBuilder::new().connect_http(url))
}

/// Native coin balance via `eth_getBalance`.
pub struct EthNativeProvider;

#[async_trait]
impl BalanceProvider for EthNativeProvider {
    async fn fetch(&self, params: FetchParams<'_>) -> GateResult<Balance> {
        let owner = parse_evm_address(params.address)?;
        let provider = http_provider(params.rpc_url)?;

        provider
            .get_balance(owner)
            .await
            .map_err(|e| GateError::ProviderFetchFailed(format!("eth_getBalance: {e}")))
    }
}

/// ERC20 token balance via `balanceOf(address)`.
pub struct Erc20Provider;

#[async_trait]
impl BalanceProvider for Erc20Provider {
    async fn fetch(&self, params: FetchParams<'_>) -> GateResult<Balance> {
        let owner = parse_evm_address(params.address)?;
        let contract = params.contract_address.ok_or_else(|| {
            GateError::InvalidArguments("erc20 fetch requires a contract address".to_string())
        })?;
        let contract = parse_evm_address(contract)?;
        let provider = http_provider(params.rpc_url)?;

        IERC20::new(contract, provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| GateError::ProviderFetchFailed(format!("erc20 balanceOf: {e}")))
    }
}

/// ERC721 holdings count via `balanceOf(address)`. The standard returns the
/// number of tokens owned, which is what threshold rules compare against.
pub struct Erc721Provider;

#[async_trait]
impl BalanceProvider for Erc721Provider {
    async fn fetch(&self, params: FetchParams<'_>) -> GateResult<Balance> {
        let owner = parse_evm_address(params.address)?;
        let contract = params.contract_address.ok_or_else(|| {
            GateError::InvalidArguments("erc721 fetch requires a contract address".to_string())
        })?;
        let contract = parse_evm_address(contract)?;
        let provider = http_provider(params.rpc_url)?;

        IERC721::new(contract, provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| GateError::ProviderFetchFailed(format!("erc721 balanceOf: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        assert!(parse_evm_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").is_ok());
        assert!(matches!(
            parse_evm_address("not-an-address"),
            Err(GateError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_erc20_requires_contract_address() {
        let params = FetchParams {
            address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            rpc_url: "https://rpc.example",
            contract_address: None,
        };

        match Erc20Provider.fetch(params).await {
            Err(GateError::InvalidArguments(_)) => {}
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_rpc_url_is_a_provider_error() {
        let params = FetchParams {
            address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            rpc_url: "not a url",
            contract_address: None,
        };

        match EthNativeProvider.fetch(params).await {
            Err(GateError::ProviderFetchFailed(_)) => {}
            other => panic!("expected ProviderFetchFailed, got {other:?}"),
        }
    }
}
