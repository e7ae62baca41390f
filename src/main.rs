mod ai;
mod app;
mod config;
mod constants;
mod credentials;
mod input;
mod mail;
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{AzureOpenAiClient, CompletionParams, DraftGenerator};
use crate::app::App;
use crate::app::session::Session;
use crate::config::{AiConfig, Config, MailConfig, UiConfig};
use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_SMTP_PORT, DEFAULT_TEMPERATURE};
use crate::credentials::{CredentialStore, Secret};
use crate::mail::SmtpClient;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mailscribe=debug"));

    // stdout belongs to the TUI, so log to a file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("mailscribe.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"mailscribe - Draft emails with AI, review, and send them

Usage: mailscribe [command]

Commands:
    (none)        Start the assistant
    setup         Configure the model endpoint, mail account and secrets
    credentials   Show where secrets are looked up
    help          Show this help message

Configuration file: ~/.config/mailscribe/config.toml
Secrets can also be supplied via MAILSCRIBE_PASSWORD and MAILSCRIBE_API_KEY.
"#
    );
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt until the answer is non-empty
fn prompt_required(label: &str) -> Result<String> {
    loop {
        let value = prompt(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("{} is required.", label);
    }
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let value = read_hidden()?;
    println!();
    Ok(value)
}

fn run_setup() -> Result<()> {
    println!("Mailscribe Setup");
    println!("================\n");

    let config_path = Config::config_path()?;
    if config_path.exists() {
        let answer = prompt("Configuration already exists. Overwrite? [y/N]")?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    println!("Azure OpenAI");
    let endpoint = prompt_required("Endpoint (https://<resource>.openai.azure.com)")?;
    let api_version = prompt_required("API version")?;
    let deployment = prompt_required("Deployment name")?;
    let api_key = prompt_secret("API key")?;

    println!("\nMail account");
    let address = loop {
        let value = prompt_required("Sender address")?;
        if mail::extract_address(&value) == Some(value.as_str()) {
            break value;
        }
        println!("Invalid email format. Please enter an address like user@example.com");
    };
    let smtp_server = prompt_required("SMTP server")?;
    let smtp_port = loop {
        let value = prompt(&format!("SMTP port (implicit TLS) [{}]", DEFAULT_SMTP_PORT))?;
        if value.is_empty() {
            break DEFAULT_SMTP_PORT;
        }
        match value.parse::<u16>() {
            Ok(port) if port > 0 => break port,
            _ => println!("Please enter a port number between 1 and 65535"),
        }
    };
    let password = prompt_secret("SMTP password")?;

    let config = Config {
        ai: AiConfig {
            endpoint,
            api_version,
            deployment,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        },
        mail: MailConfig {
            address: address.clone(),
            username: None,
            smtp_server,
            smtp_port,
        },
        ui: UiConfig::default(),
    };
    config.validate()?;

    config.ensure_dirs()?;
    config.save()?;
    println!("\nConfiguration saved to {}", config_path.display());

    let creds = CredentialStore::new(&address);
    for (secret, value) in [(Secret::ApiKey, &api_key), (Secret::MailPassword, &password)] {
        if value.is_empty() {
            continue;
        }
        creds.set(secret, value)?;
        if !creds.has(secret) {
            anyhow::bail!("Credential storage failed");
        }
    }
    println!("Secrets stored.");

    println!("\nSetup complete! Run 'mailscribe' to start.");
    Ok(())
}

fn show_credentials() -> Result<()> {
    let config = Config::load()?;
    let creds = CredentialStore::new(&config.mail.address);
    println!("{}", creds.debug_info());
    Ok(())
}

fn read_hidden() -> Result<String> {
    let _guard = DisableEcho::new()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

async fn run_assistant() -> Result<()> {
    setup_logging();

    let config = Config::load()?;
    config.ensure_dirs()?;

    crate::ui::theme::init_theme(config.ui.theme);

    let creds = CredentialStore::new(&config.mail.address);
    let api_key = match &config.ai.api_key {
        Some(key) if !key.is_empty() => key.clone(),
        _ => creds.get(Secret::ApiKey)?,
    };
    let password = creds.get(Secret::MailPassword)?;

    let backend = AzureOpenAiClient::new(&config.ai, api_key);
    let params = CompletionParams {
        max_tokens: config.ai.max_tokens,
        temperature: config.ai.temperature,
    };
    let transport = SmtpClient::new(&config.mail, &password)
        .with_context(|| format!("Failed to configure SMTP relay {}", config.mail.smtp_server))?;

    tracing::info!(
        "Starting mailscribe as {} via {}:{}",
        config.mail.address,
        config.mail.smtp_server,
        config.mail.smtp_port
    );

    let session = Session::new(DraftGenerator::new(backend, params), transport);
    let mut app = App::new(session, &config.mail.address);
    app.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some("credentials") => show_credentials(),
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => run_assistant().await,
    }
}
