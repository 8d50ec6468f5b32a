//! modelbench - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use modelbench::asset::BundledAsset;
use modelbench::cli::{Args, Commands};
use modelbench::config::Config;
use modelbench::console::ConsoleSession;
use modelbench::doctor::Doctor;
use modelbench::installer::ModelInstaller;
use modelbench::sdk::types::format_size;
use modelbench::sdk::EngineClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(message) = args.validate() {
        eprintln!("{}", message.red());
        std::process::exit(1);
    }

    let config = Config::load()?.with_overrides(
        args.host.as_deref(),
        args.port,
        args.model.as_deref(),
    );

    let client = EngineClient::new(&config)?;
    let installer = ModelInstaller::new(config.storage_root()?, BundledAsset::starter_model())?;

    match &args.command {
        None if args.prompt.is_some() => {
            let prompt = args.prompt.clone().unwrap_or_default();
            run_ask(&client, &prompt, &args).await;
        }
        Some(Commands::Start) | None => {
            let mut session = ConsoleSession::new(client, installer, args.verbosity())?;
            session.run().await?;
        }
        Some(Commands::Doctor) => {
            run_doctor(&client, &installer).await;
        }
        Some(Commands::Install) => {
            run_install(installer).await?;
        }
        Some(Commands::Download) => {
            run_download(&client, &args).await;
        }
        Some(Commands::Status) => {
            show_status(&client, &installer).await;
        }
        Some(Commands::Config) => {
            show_config(&config)?;
        }
        Some(Commands::Clean { models }) => {
            clean_state(&config, *models).await?;
        }
    }

    Ok(())
}

/// Run diagnostics and exit with a health-based status code
async fn run_doctor(client: &EngineClient, installer: &ModelInstaller) {
    let doctor = Doctor::new(client, installer);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

/// Copy the bundled starter model into local storage
async fn run_install(installer: ModelInstaller) -> Result<()> {
    let already = installer.is_available();
    let worker = installer.clone();

    match tokio::task::spawn_blocking(move || worker.install()).await? {
        Ok(path) => {
            if already {
                println!("Starter model already installed: {}", path.display());
            } else {
                println!("{} Starter model installed: {}", "✓".green(), path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Install failed: {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

/// Download the engine model with a progress bar
async fn run_download(client: &EngineClient, args: &Args) {
    if client.is_ready().await {
        println!("Model '{}' already downloaded. Engine ready.", client.model());
        return;
    }

    if !client.health_check().await {
        eprintln!("{} Engine not reachable at {}", "✗".red(), client.base_url());
        eprintln!("\nStart the engine first, then retry.");
        std::process::exit(2);
    }

    println!("Downloading model '{}'...", client.model());

    let mut task = client.initialize();
    let display = modelbench::console::display::Display::new(args.verbosity().show_progress());
    let pb = display.start_download(client.model());

    while let Some(update) = task.next_progress().await {
        display.update_download(&pb, &update);
    }
    pb.finish_and_clear();

    match task.join().await {
        Ok(()) => println!("{} Model loaded successfully. Engine ready.", "✓".green()),
        Err(e) => {
            eprintln!("{} Model download failed: {}", "✗".red(), e);
            eprintln!("\nCheck your network connection and try again.");
            std::process::exit(1);
        }
    }
}

/// One-shot prompt: validate, check readiness, generate
async fn run_ask(client: &EngineClient, prompt: &str, args: &Args) {
    if prompt.trim().is_empty() {
        eprintln!("{}", "Please enter a prompt first.".red());
        std::process::exit(1);
    }

    if !client.is_ready().await {
        eprintln!(
            "{} Model '{}' is not ready.",
            "✗".red(),
            client.model()
        );
        eprintln!("\nDownload it first with: modelbench download");
        std::process::exit(2);
    }

    let display = modelbench::console::display::Display::new(args.verbosity().show_progress());
    let spinner = display.start_generation();

    match client.ask(prompt).await {
        Ok(response) => {
            spinner.finish_and_clear();
            println!("{}", response);
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} Generation failed: {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

/// Print engine and storage status
async fn show_status(client: &EngineClient, installer: &ModelInstaller) {
    println!("\nmodelbench status\n");

    println!("SDK version:    {}", client.sdk_version());
    println!("Engine URL:     {}", client.base_url());

    match client.engine_version().await {
        Ok(version) => println!("Engine:         Connected (v{})", version),
        Err(_) => println!("Engine:         {}", "Not Connected".red()),
    }

    let ready = client.is_ready().await;
    println!(
        "Model:          {} ({})",
        client.model(),
        if ready { "ready" } else { "not downloaded" }
    );

    match installer.installed_size() {
        Some(size) => println!(
            "Starter model:  {} ({})",
            installer.model_path().display(),
            format_size(size)
        ),
        None => println!("Starter model:  not installed"),
    }

    println!();
}

/// Display current configuration
fn show_config(config: &Config) -> Result<()> {
    println!("\nmodelbench configuration\n");

    println!("Engine:");
    println!("  Host:  {}", config.engine.host);
    println!("  Port:  {}", config.engine.port);
    println!("  Model: {}", config.engine.model);
    println!();

    println!("Storage:");
    println!("  Root:  {}", config.storage_root()?.display());
    println!("  File:  {}", Config::config_path()?.display());
    println!();

    Ok(())
}

/// Clear harness state
async fn clean_state(config: &Config, models: bool) -> Result<()> {
    use tokio::fs;

    let config_path = Config::config_path()?;
    if config_path.exists() {
        fs::remove_file(&config_path).await?;
        println!("✓ Removed config: {}", config_path.display());
    }

    let history = dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".modelbench_history");
    if history.exists() {
        fs::remove_file(&history).await?;
        println!("✓ Removed prompt history: {}", history.display());
    }

    if models {
        let models_dir = config.storage_root()?.join("models");
        if models_dir.exists() {
            fs::remove_dir_all(&models_dir).await?;
            println!("✓ Removed models: {}", models_dir.display());
        }
    }

    Ok(())
}
