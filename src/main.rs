use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use odoo_contact_form::config::Config;
use odoo_contact_form::form::{FormController, FormEvent, Phase};
use odoo_contact_form::odoo::{self, Gateway};
use odoo_contact_form::web;

#[derive(Parser, Debug)]
#[command(name = "odoo-contact-form")]
#[command(version)]
#[command(about = "Submit contacts to Odoo, directly or through a relay")]
struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Generate example config and exit
    #[arg(long)]
    generate_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the relay server in front of Odoo
    Serve,
    /// Submit a single contact
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// List the first contacts stored in Odoo
    List,
    /// Interactive contact form on the terminal
    Form,
}

const EXAMPLE_CONFIG: &str = include_str!("../example-config.yaml");

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = if path.exists() {
        let path = path.to_string_lossy();
        Config::load(&path).with_context(|| format!("failed to load config from {}", path))?
    } else {
        Config::default()
    };
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", EXAMPLE_CONFIG);
        return Ok(());
    }

    let config = load_config(&args.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.min_level));
    FmtSubscriber::builder().with_env_filter(filter).init();

    info!("Starting {} v{}", odoo_contact_form::NAME, odoo_contact_form::VERSION);
    info!(
        "Gateway mode {:?} at {}, database {}",
        config.gateway.mode,
        config.gateway_url(),
        config.odoo.database
    );

    match args.command.unwrap_or(Command::Form) {
        Command::Serve => serve(&config).await,
        Command::Submit { name, phone } => submit(&config, name, phone).await,
        Command::List => list(&config).await,
        Command::Form => interactive_form(&config).await,
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    use salvo::conn::TcpListener;
    use salvo::prelude::*;

    let service = Arc::new(odoo::upstream_service_from_config(config)?);
    let relay = web::create_relay_service(service);
    let addr = config.relay.listen_addr();
    info!("Relay server will listen on {}", addr);

    let web_handle = tokio::spawn(async move {
        let listener = TcpListener::new(addr).bind().await;
        Server::new(listener).serve(relay).await;
    });

    tokio::select! {
        _ = web_handle => {
            info!("Relay server task ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}

async fn submit(config: &Config, name: String, phone: String) -> anyhow::Result<()> {
    let service = Arc::new(odoo::service_from_config(config)?);
    let mut controller = FormController::new(service, config.form.success_display());
    controller.edit_name(name);
    controller.edit_phone(phone);

    match controller.submit().await {
        Phase::Succeeded => {
            println!("{}", controller.state().message().unwrap_or_default());
            Ok(())
        }
        _ => {
            let message = controller.state().message().unwrap_or_default().to_string();
            error!("Submission failed: {}", message);
            anyhow::bail!(message)
        }
    }
}

async fn list(config: &Config) -> anyhow::Result<()> {
    let service = odoo::service_from_config(config)?;
    let contacts = service.fetch_contacts().await;

    if contacts.is_empty() {
        println!("No contacts found.");
        return Ok(());
    }

    for contact in contacts {
        println!(
            "{:>6}  {:<30}  {:<30}  {}",
            contact.id,
            contact.name,
            contact.email.as_deref().unwrap_or("-"),
            contact.phone.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn interactive_form(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(odoo::service_from_config(config)?);
    let mut controller = FormController::new(service, config.form.success_display());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Add a contact to Odoo (Ctrl-D to quit)");

    loop {
        let current = controller.state().draft.name.clone();
        let Some(name) = prompt(&mut lines, &mut controller, "Name", current).await? else {
            break;
        };
        controller.edit_name(name);

        let current = controller.state().draft.phone.clone();
        let Some(phone) = prompt(&mut lines, &mut controller, "Phone", current).await? else {
            break;
        };
        controller.edit_phone(phone);

        println!("Submitting...");
        controller.submit().await;
        if let Some(message) = controller.state().message() {
            println!("{}", message);
        }
    }

    Ok(())
}

/// Reads one field value while still applying deferred form events.
async fn prompt<G: Gateway>(
    lines: &mut Lines<BufReader<Stdin>>,
    controller: &mut FormController<G>,
    label: &str,
    current: String,
) -> anyhow::Result<Option<String>> {
    print_prompt(label, &current)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(None);
                };
                // Empty input keeps what the failed attempt left in the field.
                return Ok(Some(if line.is_empty() { current } else { line }));
            }
            Some(FormEvent::SuccessExpired { .. }) = controller.next_deferred() => {
                if controller.phase() == Phase::Idle {
                    println!();
                    print_prompt(label, &current)?;
                }
            }
        }
    }
}

fn print_prompt(label: &str, current: &str) -> anyhow::Result<()> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    std::io::stdout().flush()?;
    Ok(())
}
