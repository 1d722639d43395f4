use crate::cli::client::ApiClient;
use crate::cli::OutputFormat;

/// Show the server's `/health` report
pub async fn health(api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let report = api.health().await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let status = report["status"].as_str().unwrap_or("unknown");
            println!("{} is {}", api.base_url(), status);
        }
    }
    Ok(())
}
