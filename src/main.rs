use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use printshop_jobs::api::{self, JobsClient};
use printshop_jobs::cli::{Cli, Command};
use printshop_jobs::config::PrintshopConfig;
use printshop_jobs::{logging, ui, validate, Job, JobProgressStatus, PrintshopError};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Transitions { status } => {
            match status {
                Some(status) => {
                    let status: JobProgressStatus = status.parse()?;
                    ui::print_successors(status, printshop_jobs::allowed_successors(Some(status)));
                }
                None => ui::print_transition_table(),
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Validate {
            change,
            current,
            json,
        } => {
            let result = validate(&change.to_request(), current.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                ui::print_validation(&result);
            }
            Ok(if result.is_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::New { title, kind, file } => {
            let job = Job::new(title, kind.into());
            job.save(&file)
                .with_context(|| format!("writing {}", file.display()))?;
            ui::print_job(&job);
            Ok(ExitCode::SUCCESS)
        }

        Command::Show { file } => {
            let job = Job::load(&file).with_context(|| format!("reading {}", file.display()))?;
            ui::print_job(&job);
            Ok(ExitCode::SUCCESS)
        }

        Command::Apply { file, change } => {
            let mut job =
                Job::load(&file).with_context(|| format!("reading {}", file.display()))?;
            match job.apply(&change.to_request()) {
                Ok(_) => {
                    job.save(&file)
                        .with_context(|| format!("writing {}", file.display()))?;
                    ui::print_job(&job);
                    Ok(ExitCode::SUCCESS)
                }
                Err(errors) => {
                    ui::print_field_errors(&errors);
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Command::Submit {
            job_id,
            change,
            current,
        } => {
            let config = PrintshopConfig::load(cli.config.as_deref())?;
            let client = JobsClient::new(&config.api).map_err(PrintshopError::from)?;
            let request = change.to_request();

            let progress = ui::SubmitProgress::start(&job_id, &change.target);
            match api::submit_transition(&client, &job_id, current, &request).await {
                Ok(job) => {
                    progress.success(&job.id, job.progress_status.as_deref());
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    progress.failure(&err.to_string());
                    if let Some(errors) = err.field_errors() {
                        ui::print_field_errors(errors);
                        return Ok(ExitCode::FAILURE);
                    }
                    Err(PrintshopError::from(err).into())
                }
            }
        }
    }
}
