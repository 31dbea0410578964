//! Operator queue commands.

use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use kiosk_core::error::AppError;
use kiosk_core::types::id::RegistrationId;
use kiosk_engine::{AdminEntry, WaitDetail};
use kiosk_entity::QueueSummary;

use crate::output::{self, OutputFormat};

/// Arguments for the next command
#[derive(Debug, Args)]
pub struct NextArgs {
    /// Zero-based line to serve
    pub line: u32,
}

/// Arguments for the remove command
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Registration id
    pub id: RegistrationId,
}

/// Arguments for the estimate command
#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Only show the wait a party of this size would see
    #[arg(long)]
    pub party_size: Option<u32>,
}

/// Queue row for table output
#[derive(Debug, Serialize, Tabled)]
struct QueueRow {
    /// Registration ID
    id: String,
    /// Display name
    name: String,
    /// Lines spanned, zero-based and inclusive
    lines: String,
    /// Depth
    depth: u32,
    /// Phone
    phone: String,
    /// Email
    email: String,
}

impl From<&AdminEntry> for QueueRow {
    fn from(entry: &AdminEntry) -> Self {
        let last = entry.line + entry.party_size.saturating_sub(1);
        Self {
            id: entry.id.to_string(),
            name: entry.name.clone(),
            lines: if last == entry.line {
                entry.line.to_string()
            } else {
                format!("{}-{}", entry.line, last)
            },
            depth: entry.depth,
            phone: entry.phone_number.clone().unwrap_or_default(),
            email: entry.email.clone().unwrap_or_default(),
        }
    }
}

/// Wait estimate row for table output
#[derive(Debug, Serialize, Tabled)]
struct EstimateRow {
    /// What the estimate is for
    target: String,
    /// Minutes
    minutes: u32,
}

/// List every registration
pub async fn list(config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let service = super::open_service(&config).await?;
    let update = service.admin_listing().await?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<QueueRow> = update.queue.iter().map(QueueRow::from).collect();
            output::print_list(&rows, format);
            output::print_kv("Wait time", &format!("{} min", update.wait_time));
        }
        OutputFormat::Json => output::print_json(&update),
    }
    Ok(())
}

/// Serve the next party on a line
pub async fn next(args: &NextArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let service = super::open_service(&config).await?;
    let served = service.serve_next(args.line).await?;

    match (format, served) {
        (OutputFormat::Json, served) => output::print_json(&served),
        (OutputFormat::Table, Some(registration)) => output::print_success(&format!(
            "Served {} ({}) from line {}",
            registration.name, registration.id, args.line
        )),
        (OutputFormat::Table, None) => output::print_warning(&format!("Line {} is empty", args.line)),
    }
    Ok(())
}

/// Remove a registration by id
pub async fn remove(args: &RemoveArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let service = super::open_service(&config).await?;

    if service.remove(args.id).await? {
        output::print_success(&format!("Removed {}", args.id));
    } else {
        output::print_warning(&format!("No registration {}", args.id));
    }
    Ok(())
}

/// Estimates alongside the summary persisted at the last mutation
#[derive(Debug, Serialize)]
struct EstimateReport {
    published: QueueSummary,
    detail: WaitDetail,
}

/// Show per-line and per-span wait estimates
pub async fn estimate(
    args: &EstimateArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let service = super::open_service(&config).await?;
    let detail = service.wait_estimates(Utc::now()).await?;

    if let Some(party_size) = args.party_size {
        let minutes = detail.for_party(party_size).ok_or_else(|| {
            AppError::validation(format!(
                "Party size {party_size} does not fit {} lines",
                service.context().line_count
            ))
        })?;
        match format {
            OutputFormat::Table => {
                output::print_kv(&format!("Party of {party_size}"), &format!("{minutes} min"))
            }
            OutputFormat::Json => output::print_json(&serde_json::json!({
                "party_size": party_size,
                "wait_time": minutes,
            })),
        }
        return Ok(());
    }

    let published = service.published_summary().await?;
    match format {
        OutputFormat::Table => {
            let mut rows: Vec<EstimateRow> = detail
                .per_line_single
                .iter()
                .enumerate()
                .map(|(line, minutes)| EstimateRow {
                    target: format!("line {line}, party of 1"),
                    minutes: *minutes,
                })
                .collect();
            rows.extend(detail.per_span.iter().map(|(width, minutes)| EstimateRow {
                target: format!("party of {width}"),
                minutes: *minutes,
            }));
            output::print_list(&rows, format);
            output::print_kv(
                "Published wait",
                &format!(
                    "{} min (updated {})",
                    published.wait_time,
                    published.updated_at.to_rfc3339()
                ),
            );
        }
        OutputFormat::Json => output::print_json(&EstimateReport { published, detail }),
    }
    Ok(())
}
