//! Query device identification and status

use tracing_subscriber::EnvFilter;
use zfprint::Printer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("ZFP_HOST").unwrap_or_else(|_| "192.168.1.50".to_string());
    let port = std::env::var("ZFP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4999);

    let mut printer = Printer::tcp(host, port);
    printer.connect().await?;

    let info = printer.device_info().await?;
    println!("{}", info);

    let status = printer.status().await?;
    println!("Status: {}", status);
    println!("Fiscalized: {}", status.is_fiscalized());

    println!("Clock: {}", printer.date_time().await?);
    println!("Tax number: {}", printer.tax_number().await?);

    let rates = printer.tax_percents().await?;
    for (group, rate) in rates.iter().enumerate() {
        println!("  group {}: {:.2}%", group + 1, rate);
    }

    println!("Free fiscal blocks: {}", printer.free_fiscal_space().await?);

    printer.disconnect().await?;
    Ok(())
}
