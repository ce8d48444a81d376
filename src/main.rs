use std::sync::Arc;

use tower_http::cors::CorsLayer;

use kyc_wizard::config::WizardConfig;
use kyc_wizard::holder::{AccountHolder, CompanyHolder, CompanyType, IndividualHolder};
use kyc_wizard::remote::{InMemoryRemote, RemoteClient};
use kyc_wizard::status::OnboardingStatus;
use kyc_wizard::wizard::{OnboardingSnapshot, WizardRouteState, WizardSession, wizard_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WizardConfig::from_env()?;

    // Flow selection for the dev server: company (default) or individual.
    let flow = std::env::var("KYC_WIZARD_FLOW").unwrap_or_else(|_| "company".to_string());
    let holder = match flow.as_str() {
        "individual" => AccountHolder::Individual(IndividualHolder::default()),
        _ => AccountHolder::Company(CompanyHolder::new(CompanyType::Company)),
    };

    let onboarding_id = std::env::var("KYC_WIZARD_ONBOARDING_ID")
        .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());

    eprintln!("KYC Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Flow: {}", flow);
    eprintln!("   Onboarding: {}", onboarding_id);
    eprintln!(
        "   API: http://{}:{}/api/wizard/steps\n",
        config.bind_addr, config.port
    );

    // The dev server runs against the in-process backend double; a real
    // deployment plugs a transport-backed RemoteClient in here.
    let remote = Arc::new(InMemoryRemote::new());
    remote.seed(&onboarding_id, holder.clone()).await;

    let session = Arc::new(WizardSession::new(
        remote as Arc<dyn RemoteClient>,
        OnboardingSnapshot {
            onboarding_id,
            holder,
            status: OnboardingStatus::Invalid { errors: vec![] },
        },
    ));

    let mut app = wizard_routes(WizardRouteState {
        session: Arc::clone(&session),
    });
    if config.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    // Log navigation events so a collaborator (analytics) can hook them.
    let mut events = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::debug!(?event, "wizard event");
        }
    });

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.bind_addr, config.port)).await?;
    tracing::info!(port = config.port, "wizard REST server started");
    axum::serve(listener, app).await?;

    Ok(())
}
