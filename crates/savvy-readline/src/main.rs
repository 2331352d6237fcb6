mod command;
mod helper;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use savvy_application::{ChatController, ChatOptions, TurnOutcome};
use savvy_core::auth::{SessionFlagStore, SignedInUser, check_credentials};
use savvy_core::config::{SavvyConfig, SecretConfig};
use savvy_core::content::{Catalog, SeededShuffler, Shuffler, ThreadRngShuffler};
use savvy_core::preference::PreferenceSet;
use savvy_core::secret::SecretService;
use savvy_infrastructure::settings::GEMINI_API_KEY_ENV;
use savvy_infrastructure::{
    FileSessionFlagStore, SavvyPaths, SecretServiceImpl, load_catalog, load_config,
};
use savvy_interaction::ResponseResolver;

use command::Command;
use helper::CliHelper;
use render::{Renderer, print_help, print_notice};

#[derive(Parser)]
#[command(
    name = "savvy",
    about = "Style Savvy Scribe - a fashion chat assistant for the terminal"
)]
struct Cli {
    /// Directory holding config.toml, secret.json and session.json
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Answer from the local catalog only, ignoring endpoint and API key
    #[arg(long)]
    offline: bool,
    /// Seed for article shuffling, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Everything the REPL needs between lines.
struct App {
    offline: bool,
    config: SavvyConfig,
    secret_service: SecretServiceImpl,
    session_store: FileSessionFlagStore,
    catalog: Arc<Catalog>,
    shuffler: Arc<dyn Shuffler>,
    client: reqwest::Client,
    controller: ChatController,
    renderer: Renderer,
    user: Option<SignedInUser>,
}

impl App {
    async fn resolver(&self) -> Arc<ResponseResolver> {
        build_resolver(
            self.offline,
            &self.config,
            &self.secret_service,
            self.catalog.clone(),
            self.shuffler.clone(),
            self.client.clone(),
        )
        .await
    }

    fn new_controller(&self, resolver: Arc<ResponseResolver>) -> ChatController {
        ChatController::new(
            self.catalog.clone(),
            resolver,
            self.shuffler.clone(),
            controller_options(&self.config),
        )
    }

    fn begin_chat(&mut self) {
        self.controller.start();
        self.renderer.update(&self.controller.snapshot());
    }

    /// Returns false when the REPL should exit.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Help => print_help(),
            Command::SignIn { email, password } => self.sign_in(&email, &password),
            Command::Key(value) => self.api_key(value).await,
            _ if self.user.is_none() => {
                print_notice("Please sign in first: /signin <email> <password>");
            }
            Command::SignOut => self.sign_out().await,
            Command::OpenPreferences => {
                self.controller.open_preferences();
                let view = self.controller.snapshot();
                self.renderer.reprint_editor(&view);
                self.renderer.update(&view);
            }
            Command::ClosePreferences => {
                self.controller.close_preferences();
                self.renderer.update(&self.controller.snapshot());
            }
            Command::ClearPreferences => {
                self.controller.set_preferences(PreferenceSet::default());
                println!("{}", "Preferences cleared.".bright_black());
                self.renderer.update(&self.controller.snapshot());
            }
            Command::SetPreferences(assignments) => {
                match PreferenceSet::parse_assignments(&assignments) {
                    Ok(preferences) => {
                        self.controller.set_preferences(preferences);
                        self.renderer.update(&self.controller.snapshot());
                    }
                    Err(e) => print_notice(&e.to_string()),
                }
            }
            Command::Guided => {
                self.controller.begin_guided_preferences();
                self.renderer.update(&self.controller.snapshot());
            }
            Command::Back => {
                if self.controller.back_to_chat() {
                    self.renderer.update(&self.controller.snapshot());
                } else {
                    print_notice("No results are showing.");
                }
            }
            Command::Toggle => {
                let mode = self.controller.toggle_article_display_mode();
                println!("{}", format!("Article view: {mode}").bright_black());
                self.renderer.reprint_articles(&self.controller.snapshot());
            }
            Command::Reset => {
                self.controller.reset();
                self.renderer.rewind();
                self.renderer.update(&self.controller.snapshot());
            }
            Command::Pick(n) => {
                let options = self.controller.snapshot().options;
                match n.checked_sub(1).and_then(|i| options.get(i)) {
                    Some(option) => {
                        println!("{}", format!("> {option}").green());
                        self.chat(option, true).await;
                    }
                    None => print_notice(&format!("There is no option {n}.")),
                }
            }
            Command::Chat(text) => self.chat(&text, false).await,
            Command::Unknown(line) => {
                print_notice(&format!("Unknown command: {line} (try /help)"));
            }
        }
        true
    }

    async fn chat(&mut self, text: &str, is_option: bool) {
        if self.controller.resolver().has_remote_tiers() {
            println!("{}", "...".bright_black());
        }
        let outcome = if is_option {
            self.controller.submit_option(text).await
        } else {
            self.controller.submit_user_text(text).await
        };

        match outcome {
            TurnOutcome::Rejected { notice } => print_notice(&notice),
            TurnOutcome::Replied { notices } => notices.iter().for_each(|n| print_notice(n)),
            TurnOutcome::Greeted
            | TurnOutcome::PreferencesRequested
            | TurnOutcome::Superseded
            | TurnOutcome::Ignored => {}
        }
        self.renderer.update(&self.controller.snapshot());
    }

    fn sign_in(&mut self, email: &str, password: &str) {
        if let Some(user) = &self.user {
            print_notice(&format!("Already signed in as {}.", user.email));
            return;
        }
        let user = match check_credentials(email, password) {
            Ok(user) => user,
            Err(e) => {
                print_notice(&e.to_string());
                return;
            }
        };
        if let Err(e) = self.session_store.save(&user) {
            warn!("Failed to persist session flag: {}", e);
        }
        println!("{}", format!("Signed in as {}.", user.email).bright_green());
        self.user = Some(user);
        self.begin_chat();
    }

    async fn sign_out(&mut self) {
        if let Err(e) = self.session_store.clear() {
            warn!("Failed to clear session flag: {}", e);
        }
        self.user = None;
        self.controller = self.new_controller(self.resolver().await);
        self.renderer.rewind();
        println!("{}", "Signed out.".bright_green());
    }

    async fn api_key(&mut self, value: Option<String>) {
        let Some(value) = value else {
            let configured = self
                .secret_service
                .load_secrets()
                .await
                .map(|s| s.gemini_api_key().is_some())
                .unwrap_or(false);
            let tiers: Vec<String> = self
                .controller
                .resolver()
                .tiers()
                .iter()
                .map(|t| t.to_string())
                .collect();
            println!(
                "{}",
                format!(
                    "Gemini key: {}. Active tiers: {}.",
                    if configured { "configured" } else { "not set" },
                    tiers.join(", ")
                )
                .bright_black()
            );
            return;
        };

        let secrets = SecretConfig::with_gemini_api_key(value);
        match self.secret_service.save_secrets(&secrets).await {
            Ok(()) => {
                println!("{}", "Gemini API key saved.".bright_green());
                if std::env::var(GEMINI_API_KEY_ENV).is_ok() {
                    print_notice(&format!("{GEMINI_API_KEY_ENV} is set and takes precedence."));
                }
                self.controller.set_resolver(self.resolver().await);
            }
            Err(e) => print_notice(&e),
        }
    }
}

/// Builds the fallback chain from settings and the stored key.
///
/// Offline mode drops both remote tiers.
async fn build_resolver(
    offline: bool,
    config: &SavvyConfig,
    secret_service: &SecretServiceImpl,
    catalog: Arc<Catalog>,
    shuffler: Arc<dyn Shuffler>,
    client: reqwest::Client,
) -> Arc<ResponseResolver> {
    let mut config = config.clone();
    let secrets = if offline {
        config.resolver.remote_endpoint = None;
        SecretConfig::default()
    } else {
        secret_service.load_secrets().await.unwrap_or_else(|e| {
            warn!("{}", e);
            SecretConfig::default()
        })
    };
    Arc::new(ResponseResolver::from_settings(
        &config, &secrets, catalog, shuffler, client,
    ))
}

fn controller_options(config: &SavvyConfig) -> ChatOptions {
    ChatOptions {
        greet_on_options: config.chat.greet_on_options,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let paths = SavvyPaths::new(cli.config_dir.as_deref())?;
    let config = load_config(&paths, |key| std::env::var(key).ok())?;
    let catalog = Arc::new(load_catalog(&config.catalog)?);
    let shuffler: Arc<dyn Shuffler> = match cli.seed {
        Some(seed) => Arc::new(SeededShuffler::new(seed)),
        None => Arc::new(ThreadRngShuffler),
    };
    let secret_service = SecretServiceImpl::new(&paths)
        .with_api_key_override(std::env::var(GEMINI_API_KEY_ENV).ok());
    let session_store = FileSessionFlagStore::with_path(paths.session_file());
    let user = session_store.load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable session flag: {}", e);
        None
    });

    let client = reqwest::Client::builder()
        .user_agent(concat!("savvy/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let resolver = build_resolver(
        cli.offline,
        &config,
        &secret_service,
        catalog.clone(),
        shuffler.clone(),
        client.clone(),
    )
    .await;
    tracing::info!("Resolver tiers: {:?}", resolver.tiers());

    let mut app = App {
        offline: cli.offline,
        controller: ChatController::new(
            catalog.clone(),
            resolver,
            shuffler.clone(),
            controller_options(&config),
        ),
        config,
        secret_service,
        session_store,
        catalog,
        shuffler,
        client,
        renderer: Renderer::default(),
        user,
    };

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Style Savvy Scribe ===".bright_magenta().bold());
    println!("{}", "Type /help for commands, or 'quit' to exit.".bright_black());
    println!();

    match &app.user {
        Some(user) => {
            println!("{}", format!("Welcome back, {}.", user.email).bright_black());
            app.begin_chat();
        }
        None => print_notice("Sign in to start chatting: /signin <email> <password>"),
    }

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let command = command::parse(trimmed);
                // Keep credentials out of the history.
                if !matches!(command, Command::Key(Some(_)) | Command::SignIn { .. }) {
                    let _ = rl.add_history_entry(trimmed);
                }

                if !app.handle(command).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
