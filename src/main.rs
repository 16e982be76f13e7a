//! Career lens: resume skill-gap analysis against role keyword catalogs

use career_lens::cli::{self, Cli, Commands, ConfigAction, RESUME_EXTENSIONS};
use career_lens::config::{Config, OutputFormat};
use career_lens::error::{CareerLensError, Result};
use career_lens::input::InputManager;
use career_lens::output::formatter::{report_destination, save_report_to_file, ReportGenerator};
use career_lens::output::AnalysisReport;
use career_lens::processing::role_predictor::{predict, ranked_roles};
use career_lens::processing::{analyze, AnalysisInput, RoleCatalog, RoleSelection};
use career_lens::storage::{AnalysisStore, JsonlHistoryStore};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(cli: Cli, config: Config) -> Result<()> {
    let catalog_override = cli.catalog.as_deref();

    match cli.command {
        Commands::Analyze {
            resume,
            role,
            output,
            save,
            detailed,
            no_history,
        } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(CareerLensError::InvalidInput)?,
                None => config.output.format,
            };
            let catalog = config.load_catalog(catalog_override)?;
            let selection: RoleSelection = role.parse().unwrap_or_default();

            info!("Analyzing {} (role: {})", resume.display(), selection);
            let started = Instant::now();
            let spinner = spinner(format == OutputFormat::Console, "Parsing resume and matching skills...");

            let outcome = async {
                let text = read_resume(&resume).await?;
                analyze(&AnalysisInput::new(text, selection), &catalog)
            }
            .await;
            spinner.finish_and_clear();
            let analysis = outcome?;

            let resume_name = file_name(&resume);
            if config.history.enabled && !no_history {
                let store = JsonlHistoryStore::new(&config.history.path);
                match store.save(&analysis.record, Some(&resume_name)) {
                    Ok(entry) => info!("Saved analysis #{} to history", entry.id),
                    Err(e) => warn!("Could not save analysis to history: {}", e),
                }
            }

            let report = AnalysisReport::new(analysis, resume_name, started.elapsed().as_millis() as u64);
            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                config.output.pretty_json,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &format)?;

            match save {
                Some(target) => {
                    let path = report_destination(&target, &format, &report.metadata.resume_file);
                    save_report_to_file(&rendered, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Predict { resume, top } => {
            let catalog = config.load_catalog(catalog_override)?;
            let text = read_resume(&resume).await?;

            let prediction = predict(&text, &catalog);
            let mut scores = ranked_roles(&text, &catalog);
            scores.truncate(top);

            let generator = ReportGenerator::with_options(config.output.color_output, false, true, true, true);
            print!(
                "{}",
                generator.console().format_role_scores(&scores, prediction.role.as_deref())
            );
        }

        Commands::Roles { role } => {
            let catalog = config.load_catalog(catalog_override)?;
            print_roles(&catalog, role.as_deref())?;
        }

        Commands::History { limit } => {
            let store = JsonlHistoryStore::new(&config.history.path);
            let entries = store.recent(limit)?;
            if entries.is_empty() {
                println!("No analyses recorded yet ({})", store.path().display());
            }
            for entry in entries {
                println!(
                    "#{} {} | {} | score {} | resume: {}",
                    entry.id,
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.record.role,
                    entry.record.score,
                    entry.resume.as_deref().unwrap_or("-")
                );
                if !entry.record.missing_skills.is_empty() {
                    println!("    missing: {}", entry.record.missing_skills.join(", "));
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Current Configuration\n");
                match &config.catalog.path {
                    Some(path) => println!("Role Catalog: {}", path.display()),
                    None => println!("Role Catalog: built-in"),
                }
                println!(
                    "History: {} ({})",
                    if config.history.enabled { "enabled" } else { "disabled" },
                    config.history.path.display()
                );
                println!("Output Format: {:?}", config.output.format);
                println!("Detailed Output: {}", config.output.detailed);
                println!("Colored Output: {}", config.output.color_output);
            }

            Some(ConfigAction::Reset) => {
                let default_config = Config::default();
                match &cli.config {
                    Some(path) => default_config.save_to(path)?,
                    None => default_config.save()?,
                }
                println!("Configuration reset to defaults");
            }

            Some(ConfigAction::Path) => {
                let path = cli.config.clone().unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

async fn read_resume(path: &Path) -> Result<String> {
    cli::validate_file_extension(path, RESUME_EXTENSIONS)
        .map_err(|e| CareerLensError::InvalidInput(format!("Resume file: {}", e)))?;

    let mut input_manager = InputManager::new().with_cache(false);
    input_manager.extract_text(path).await
}

fn print_roles(catalog: &RoleCatalog, role: Option<&str>) -> Result<()> {
    match role {
        Some(name) => {
            let role = catalog.require(name)?;
            println!("{} ({} skills)", role.name, role.skills.len());
            for skill in &role.skills {
                println!("  • {}", skill);
            }
        }
        None => {
            if catalog.is_empty() {
                println!("The role catalog is empty");
            }
            for role in catalog.roles() {
                println!("{} ({} skills)", role.name, role.skills.len());
            }
        }
    }
    Ok(())
}

fn spinner(enabled: bool, message: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
