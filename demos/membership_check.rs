// demos/membership_check.rs
use sqlx::postgres::PgPoolOptions;
use token_gate::{BalanceSource, CacheConfig, Requirement, ThresholdData, TokenGate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/commonwealth".to_string());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Load the chain node registry and start the pruner.
    let gate = TokenGate::connect(pool, CacheConfig::default()).await?;

    // "Holds more than 1000 wei of DAI on mainnet."
    let requirements = vec![Requirement::Threshold {
        data: ThresholdData {
            threshold: "1000".to_string(),
            source: BalanceSource::Erc20 {
                evm_chain_id: 1,
                contract_address: "0x6B175474E89094C44Da98b954EedeAC495271d0F".to_string(),
            },
        },
    }];

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string());

    let result = gate.check_membership(&address, &requirements, None).await;
    println!(
        "{address}: valid={} met={}",
        result.is_valid, result.num_requirements_met
    );

    gate.close().await;
    Ok(())
}
