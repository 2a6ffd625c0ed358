//! Print a fiscal receipt with two items

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use zfprint::{Align, Printer, TaxGroup};

#[tokio::main]
async fn main() -> zfprint::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("ZFP_HOST").unwrap_or_else(|_| "192.168.1.50".to_string());
    let port = std::env::var("ZFP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4999);

    let mut printer = Printer::tcp(host, port).with_response_timeout(Duration::from_secs(5));
    printer.connect().await?;

    let group = TaxGroup::new('B')?;

    printer.open_fiscal_receipt(1, "0000", false, false).await?;
    printer.sell_free("Bread", group, 1.20, 2.0, 0.0).await?;
    printer.sell_free("Milk", group, 2.35, 1.0, -10.0).await?;
    printer.print_text("Thank you!", Align::Center).await?;

    let total = printer.subtotal(true, false, None).await?;
    println!("Total: {:.2}", total);

    printer.payment(0, total, false).await?;
    printer.close_fiscal_receipt().await?;

    println!("Receipt {} printed", printer.last_receipt_number().await?);

    printer.disconnect().await?;
    Ok(())
}
