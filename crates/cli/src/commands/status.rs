//! Service status command

use anyhow::Result;

use crate::client::ApiClient;
use crate::output::{color_status, print_json, render_table, FieldRow, OutputFormat};

/// Show the service status record
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => {
            let rows = vec![
                FieldRow::new("Message", status.message.clone()),
                FieldRow::new("Status", color_status(&status.status)),
                FieldRow::new("Currency", status.currency.clone()),
            ];
            println!("{}", render_table(rows));
        }
    }

    Ok(())
}
