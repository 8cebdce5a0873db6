use biztrack::{
    config::{database, session as session_config, settings},
    core::{
        category,
        filter::TransactionFilter,
        profile, report,
        state::{LoadOutcome, TransactionStateManager},
        store::SeaOrmStore,
    },
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;
    let label = app_config.display.currency_label.clone();

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Sign in and prepare per-user data
    let session = session_config::session_from_env()
        .inspect_err(|e| error!("No user to sign in as: {e}"))?;
    let business_name = session_config::business_name_from_env();
    let business = profile::ensure_business_profile(
        &db,
        &session.user_id,
        business_name.as_deref(),
        &label,
    )
    .await?;
    category::seed_default_categories(&db, &session.user_id, &app_config.categories).await?;

    // 6. Load state and print the dashboard
    let manager =
        TransactionStateManager::new(SeaOrmStore::new(db), session, &app_config.state);
    if manager.load(TransactionFilter::new()).await != LoadOutcome::Applied {
        if let Some(message) = manager.snapshot().await.error {
            warn!("Showing empty dashboard: {message}");
        }
    }

    let state = manager.snapshot().await;
    let dashboard = report::dashboard_report(&state.transactions);
    let analytics = report::analytics_report(&state.transactions);
    println!(
        "{}",
        report::render_dashboard(&business.business_name, &dashboard, &business.currency)
    );
    println!("{}", report::render_analytics(&analytics, &business.currency));

    manager.sign_out().await;
    Ok(())
}
