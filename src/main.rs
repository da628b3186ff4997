use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookstore_admin::auth::AdminSession;
use bookstore_admin::config::Config;
use bookstore_admin::domain::BookStore;
use bookstore_admin::infrastructure::HttpBookStore;
use bookstore_admin::models::BookId;
use bookstore_admin::services::{
    BookEditForm, DraftState, FieldKey, FormError, StoreManager, SubmitOutcome,
};

const USAGE: &str = "usage:
  bookstore-admin list
  bookstore-admin show <id>
  bookstore-admin edit <id> [field=value ...]";

enum Command {
    List,
    Show(BookId),
    Edit(BookId, Vec<(FieldKey, String)>),
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [cmd] if cmd == "list" => Ok(Command::List),
        [cmd, id] if cmd == "show" => Ok(Command::Show(BookId::from(id.as_str()))),
        [cmd, id, assignments @ ..] if cmd == "edit" => {
            let mut edits = Vec::with_capacity(assignments.len());
            for assignment in assignments {
                let (name, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| format!("expected field=value, got '{}'", assignment))?;
                let field =
                    FieldKey::parse(name).ok_or_else(|| format!("unknown field '{}'", name))?;
                edits.push((field, value.to_string()));
            }
            Ok(Command::Edit(BookId::from(id.as_str()), edits))
        }
        _ => Err(USAGE.to_string()),
    }
}

fn print_draft(draft: &DraftState) {
    println!("id: {}", draft.id);
    for field in FieldKey::ALL {
        match draft.text(field) {
            Some(text) => println!("{}: {}", field.as_str(), text),
            None => println!("{}: {}", field.as_str(), draft.is_new),
        }
    }
}

async fn run_list(session: AdminSession, store: Arc<dyn BookStore>) -> ExitCode {
    let manager = match StoreManager::load(session, store).await {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(banner) = manager.banner() {
        eprintln!("Error: {}", banner);
        return ExitCode::FAILURE;
    }
    if manager.is_empty() {
        println!("No books found");
        return ExitCode::SUCCESS;
    }

    for row in manager.rows() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.id, row.title, row.author, row.category, row.price
        );
    }
    ExitCode::SUCCESS
}

async fn run_edit(
    session: AdminSession,
    store: Arc<dyn BookStore>,
    id: BookId,
    edits: Vec<(FieldKey, String)>,
    save: bool,
) -> ExitCode {
    let mut form = match BookEditForm::open(session, store, id).await {
        Ok(form) => form,
        Err(FormError::Unauthorized(denied)) => {
            eprintln!("{}", denied);
            return ExitCode::FAILURE;
        }
        Err(FormError::Transport(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !save {
        print_draft(form.draft());
        return ExitCode::SUCCESS;
    }

    for (field, value) in edits {
        form.set_field(field, value);
    }

    match form.submit().await {
        SubmitOutcome::Saved { record, redirect } => {
            println!("Saved '{}' ({}), next: {}", record.title, record.price, redirect);
            ExitCode::SUCCESS
        }
        SubmitOutcome::Blocked(result) => {
            for (field, error) in &result.errors {
                eprintln!("{}: {}", field.as_str(), error);
            }
            ExitCode::FAILURE
        }
        SubmitOutcome::Failed(_) => {
            eprintln!("Error: {}", form.banner().unwrap_or("save failed"));
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore_admin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    let store: Arc<dyn BookStore> = match HttpBookStore::from_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to create record store client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let session = AdminSession::with_flag(config.admin_authenticated);

    tracing::info!("Using record store at {}", config.api_base_url);

    match command {
        Command::List => run_list(session, store).await,
        Command::Show(id) => run_edit(session, store, id, Vec::new(), false).await,
        Command::Edit(id, edits) => run_edit(session, store, id, edits, true).await,
    }
}
