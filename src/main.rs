use anyhow::{bail, Context};
use tracing::{error, info};
use whois_api_client::{Config, WhoisApiError, WhoisClient};

const USAGE: &str = "usage: whois-api <domain> [--raw]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "whois_api_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut domain = None;
    let mut raw = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--raw" => raw = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ if domain.is_none() => domain = Some(arg),
            _ => bail!(USAGE),
        }
    }
    let Some(domain) = domain else {
        bail!(USAGE);
    };

    let config = Config::load().context("failed to load configuration")?;
    let client = WhoisClient::new(&config).context("failed to create client")?;
    info!("Looking up {} via {}", domain, config.url);

    if raw {
        let body = client.raw_data(&domain, None).await?;
        println!("{}", body);
        return Ok(());
    }

    match client.data(&domain, None).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(WhoisApiError::Response { parsed, .. }) => {
            error!("Service error {}: {}", parsed.error_code, parsed.msg);
            bail!("lookup of {} failed: {}", domain, parsed.error_code)
        }
        Err(e) => Err(e).with_context(|| format!("lookup of {} failed", domain)),
    }
}
