use clap::{Parser, Subcommand};
use intake_core::{
    classify,
    config::data_dir_from_env_value,
    labels::{
        condition_label, contact_label, join_labels, risk_label, status_label, symptom_label,
        yes_no,
    },
    CoreConfig, IntakeAnswers, IntakeError, IntakeForm, IntakeFormData, ReviewFilter,
    ReviewStatus, ReviewStore, Submission,
};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Public health intake and review CLI")]
struct Cli {
    /// Directory holding intake data (default: $INTAKE_DATA_DIR or ./intake_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the risk level of an answers file without storing anything
    Classify {
        /// JSON file with `symptoms` and `riskFactors` sections ("-" for stdin)
        file: PathBuf,
    },
    /// Validate, classify and store a completed intake form
    Submit {
        /// JSON file with the full intake form ("-" for stdin)
        file: PathBuf,
    },
    /// List stored submissions, newest first
    List {
        /// Risk level to show: low, medium, high or all
        #[arg(long, default_value = "all")]
        risk: String,
        /// Review status to show: new, in_review, closed or all
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Show one submission in full
    Show {
        /// Submission id
        id: Uuid,
    },
    /// Move a submission to a new review status
    SetStatus {
        /// Submission id
        id: Uuid,
        /// New status: new, in_review or closed
        status: ReviewStatus,
    },
    /// Count submissions by risk level and status
    Summary,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("intake_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("INTAKE_DATA_DIR").ok()));

    match cli.command {
        Some(Commands::Classify { file }) => {
            let answers: IntakeAnswers = read_json(&file)?;
            println!("{}", classify(&answers));
        }
        Some(Commands::Submit { file }) => {
            let store = open_store(data_dir)?;
            let data: IntakeFormData = read_json(&file)?;
            let mut form = IntakeForm::at_review(data);
            match form.submit(&store) {
                Ok(submission) => println!(
                    "Stored submission {} (risk level: {})",
                    submission.id,
                    risk_label(submission.risk_level())
                ),
                Err(IntakeError::Validation(errors)) => {
                    eprintln!("Please fix the following:");
                    for (field, message) in errors.iter() {
                        eprintln!("  {field}: {message}");
                    }
                    return Err(IntakeError::Validation(errors).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::List { risk, status }) => {
            let store = open_store(data_dir)?;
            let filter = ReviewFilter::from_selection(Some(&risk), Some(&status))?;
            let submissions = store.list(&filter);
            if submissions.is_empty() {
                println!("No submissions found.");
            } else {
                for submission in submissions {
                    println!(
                        "ID: {}, Name: {}, Risk: {}, Status: {}, Created: {}",
                        submission.id,
                        display_or(&submission.display_name(), "(no name)"),
                        risk_label(submission.risk_level()),
                        status_label(submission.status()),
                        submission.created_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
            }
        }
        Some(Commands::Show { id }) => {
            let store = open_store(data_dir)?;
            let submission = store.get(id)?;
            print_submission(&submission);
        }
        Some(Commands::SetStatus { id, status }) => {
            let store = open_store(data_dir)?;
            let updated = store.update_status(id, status)?;
            println!(
                "Submission {} is now {}",
                updated.id,
                status_label(updated.status())
            );
        }
        Some(Commands::Summary) => {
            let store = open_store(data_dir)?;
            let summary = store.summary();
            println!("Total: {}", summary.total);
            for (level, count) in &summary.by_risk_level {
                println!("  {} risk: {}", risk_label(*level), count);
            }
            for (status, count) in &summary.by_status {
                println!("  {}: {}", status_label(*status), count);
            }
        }
        None => {
            println!("Use 'intake --help' for commands");
        }
    }

    Ok(())
}

fn open_store(data_dir: PathBuf) -> Result<ReviewStore, IntakeError> {
    let cfg = CoreConfig::new(data_dir)?;
    ReviewStore::new(Arc::new(cfg))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut contents)?;
    } else {
        contents = std::fs::read_to_string(path)?;
    }
    Ok(serde_json::from_str(&contents)?)
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn print_submission(submission: &Submission) {
    let form = &submission.form;
    let demographics = &form.demographics;
    let symptoms = &form.symptoms;
    let risk = &form.risk_factors;
    let consent = &form.consent;

    println!("Submission {}", submission.id);
    println!(
        "  Created:        {}",
        submission.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("  Risk level:     {}", risk_label(submission.risk_level()));
    println!("  Status:         {}", status_label(submission.status()));

    println!("Demographics");
    println!(
        "  Name:           {}",
        display_or(&submission.display_name(), "Not provided")
    );
    println!(
        "  Age group:      {}",
        demographics
            .age_group
            .map_or_else(|| "Not provided".to_owned(), |g| g.to_string())
    );
    println!(
        "  ZIP code:       {}",
        display_or(&demographics.zip_code, "Not provided")
    );
    println!(
        "  Email:          {}",
        display_or(&demographics.email, "Not provided")
    );

    println!("Symptoms");
    println!(
        "  Reported:       {}",
        join_labels(&symptoms.answers.symptom_list, symptom_label, "None selected")
    );
    println!(
        "  Onset date:     {}",
        symptoms
            .onset_date
            .map_or_else(|| "Not provided".to_owned(), |d| d.to_string())
    );
    println!(
        "  Severity:       {}",
        symptoms
            .answers
            .severity
            .map_or("Not provided", |s| s.as_str())
    );
    println!(
        "  Breathing:      {}",
        yes_no(symptoms.answers.has_difficulty_breathing)
    );

    println!("Risk factors");
    println!(
        "  Conditions:     {}",
        join_labels(&risk.answers.conditions, condition_label, "None reported")
    );
    println!(
        "  Immunocomp.:    {}",
        yes_no(risk.answers.is_immunocompromised)
    );
    println!("  Pregnant:       {}", yes_no(risk.answers.is_pregnant));
    println!("  Recent travel:  {}", yes_no(risk.answers.recent_travel));
    if !risk.recent_travel_details.trim().is_empty() {
        println!("  Travel details: {}", risk.recent_travel_details.trim());
    }
    println!(
        "  Sick contact:   {}",
        contact_label(risk.answers.recent_contact_with_sick)
    );

    println!("Consent");
    println!("  Data use:       {}", yes_no(consent.agrees_to_data_use));
    println!("  Follow-up:      {}", yes_no(consent.agrees_to_follow_up));
    println!(
        "  Language:       {}",
        consent
            .language_display()
            .unwrap_or_else(|| "Not provided".to_owned())
    );
}
