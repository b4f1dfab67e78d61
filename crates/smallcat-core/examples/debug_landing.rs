//! Debug script to inspect the small.cat landing page and token markup

use smallcat_core::{ClientConfig, ReqwestTransport, Transport, parse_authenticity_token};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::default();
    let transport = ReqwestTransport::with_config(&config)?;

    println!("Fetching {}...\n", config.landing_url());

    let response = transport.get(&config.landing_url()).await?;
    let html = response.text().ok_or("landing page is not valid UTF-8")?;

    // Save HTML to file for inspection
    std::fs::write("debug_landing.html", html)?;
    println!("HTTP {} - HTML saved to debug_landing.html", response.status);

    // Print a snippet around the form
    if let Some(start) = html.find("<form") {
        let end = std::cmp::min(start + 2000, html.len());
        let end = (end..=html.len()).find(|&i| html.is_char_boundary(i)).unwrap_or(html.len());
        println!("\n=== HTML snippet (from <form>) ===\n");
        println!("{}", &html[start..end]);
    }

    match parse_authenticity_token(html) {
        Some(token) => println!("\nauthenticity_token = {}", token),
        None => println!("\nauthenticity_token not found"),
    }

    Ok(())
}
