//! Terminal output: coloured results and a spinner while talking to the API.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::job::Job;
use crate::status::JobProgressStatus;
use crate::transition::TRANSITIONS;
use crate::validation::{ValidationErrors, ValidationResult};

/// Renders a list of statuses, or `(terminal)` when empty.
pub fn format_successors(successors: &[JobProgressStatus]) -> String {
    if successors.is_empty() {
        return "(terminal)".to_string();
    }
    successors
        .iter()
        .map(JobProgressStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_transition_table() {
    let bold = Style::new().bold();
    println!("{:<12} {}", bold.apply_to("FROM"), bold.apply_to("ALLOWED TO"));
    for (from, to) in TRANSITIONS.iter() {
        println!("{:<12} {}", from.as_str(), format_successors(to));
    }
}

pub fn print_successors(status: JobProgressStatus, successors: &[JobProgressStatus]) {
    println!("{status} → {}", format_successors(successors));
}

pub fn print_field_errors(errors: &ValidationErrors) {
    let red = Style::new().red();
    for (field, message) in errors {
        println!("  {} {field}: {message}", red.apply_to("•"));
    }
}

pub fn print_validation(result: &ValidationResult) {
    if result.is_valid {
        println!("  {} Transition is valid", Style::new().green().bold().apply_to("✓"));
    } else {
        println!("  {} Transition is invalid", Style::new().red().bold().apply_to("✗"));
        print_field_errors(&result.errors);
    }
}

pub fn print_job(job: &Job) {
    let dim = Style::new().dim();
    let status = job.status.map_or("(none)", |s| s.as_str());
    println!("{} {}", Style::new().bold().apply_to(&job.title), dim.apply_to(&job.id));
    println!("  kind:   {}", job.kind);
    println!("  status: {}", Style::new().cyan().apply_to(status));
    println!("  next:   {}", format_successors(job.allowed_next()));
    for change in &job.history {
        let from = change.from.map_or("(none)", |s| s.as_str());
        println!(
            "  {} {from} → {}",
            dim.apply_to(change.changed_at.format("%Y-%m-%d %H:%M")),
            change.to
        );
    }
}

/// Spinner shown while a status change is being submitted.
pub struct SubmitProgress {
    pb: ProgressBar,
}

impl SubmitProgress {
    pub fn start(job_id: &str, target: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Job {job_id}: submitting {target}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn success(&self, job_id: &str, status: Option<&str>) {
        self.pb.finish_and_clear();
        println!(
            "  {} Job {job_id} is now {}",
            Style::new().green().bold().apply_to("✓"),
            status.unwrap_or("(unknown)")
        );
    }

    pub fn failure(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", Style::new().red().bold().apply_to("✗"));
    }
}
