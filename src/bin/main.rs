use business_health_chat::{
    chat::{load_message, ChatSession},
    config::ChatConfig,
    nlp::Annotator,
    store::{check_location, CompanyStore},
};
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing; the conversation owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ChatConfig::from_env();
    info!(data = %config.data_path.display(), "Business health chat starting");

    if let Err(e) = check_location(&config.data_path) {
        error!("Cannot use data location: {}", e);
        eprintln!("No se puede usar la ubicación de datos: {}", e);
        std::process::exit(1);
    }

    let (store, status) = CompanyStore::load(&config.data_path);
    println!("{}", load_message(&status));

    let annotator = Annotator::probe(&config);
    info!(capabilities = %annotator.capabilities(), "Annotator ready");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = ChatSession::new(store, annotator, stdin.lock(), stdout.lock());

    session.run()?;

    info!("Session finished");
    Ok(())
}
