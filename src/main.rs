use anyhow::bail;
use log::error;
use ups_address_validation::{UpsClient, UpsConfig};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (city, state, zip_code, address1) = match (args.next(), args.next(), args.next(), args.next()) {
        (Some(city), Some(state), Some(zip_code), Some(address1)) => {
            (city, state, zip_code, address1)
        }
        _ => bail!("usage: ups-address-validation <city> <state> <zip> <address1>"),
    };

    let client = UpsClient::new(UpsConfig::from_env()?)?;
    let result = client.validate(&city, &state, &zip_code, &address1).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
