//! Service health and model information commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_status, print_heading, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Show service health
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let report = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_heading("Service Health");
            println!("Status:        {}", color_status(&report.status));
            println!("Model loaded:  {}", report.model_loaded);
            println!("Checked at:    {}", report.timestamp);
            println!(
                "Predictions:   {} ({} failed)",
                report.predictions_total, report.prediction_errors_total
            );
            println!();

            let rows: Vec<ComponentRow> = report
                .components
                .iter()
                .map(|(name, c)| ComponentRow {
                    name: name.clone(),
                    status: color_status(&c.status),
                    message: c.message.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            print_table(&rows);
        }
    }

    Ok(())
}

/// Show the loaded model's metadata
pub async fn show_model_info(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info = client.model_info().await?;

    match format {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Table => {
            print_heading("Model Information");
            println!("Type:          {}", info.model_type.cyan());
            println!("Version:       {}", info.model_version);
            println!("Trained:       {}", info.training_date);
            if !info.artifact_file.is_empty() {
                println!("Artifact:      {}", info.artifact_file);
                println!("Checksum:      {}", info.artifact_checksum.dimmed());
            }
            println!();

            println!("{} ({})", "Features".bold(), info.feature_names.len());
            println!("{}", "-".repeat(50));
            println!("{}", info.feature_names.join(", "));
            println!();

            if let Some(serde_json::Value::Object(metrics)) = &info.performance_metrics {
                let rows: Vec<MetricRow> = metrics
                    .iter()
                    .map(|(name, value)| MetricRow {
                        name: name.clone(),
                        value: match value.as_f64() {
                            Some(v) => format!("{:.4}", v),
                            None => value.to_string(),
                        },
                    })
                    .collect();
                println!("{}", "Performance".bold());
                print_table(&rows);
            }
        }
    }

    Ok(())
}
