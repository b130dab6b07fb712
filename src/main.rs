use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minimart::cli::{Cli, Commands, Service};
use minimart::config::{self, Config};
use minimart::gateway::{GatewayState, RouteTable};
use minimart::notify::StockNotifier;
use minimart::services::{inventory, product, profile};
use minimart::verify::RemoteVerifier;
use minimart::{auth, gateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "minimart=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = Cli::parse();

    let (service, port) = match args.command {
        Some(Commands::Serve { service, port }) => (service, port),
        None => (Service::All, None),
    };

    match service {
        Service::Auth => serve(auth_app(&cfg), port.unwrap_or(cfg.auth_port)).await,
        Service::Profile => serve(profile_app(&cfg), port.unwrap_or(cfg.profile_port)).await,
        Service::Products => serve(product_app(&cfg), port.unwrap_or(cfg.product_port)).await,
        Service::Inventory => serve(inventory_app(&cfg), port.unwrap_or(cfg.inventory_port)).await,
        Service::Gateway => serve(gateway_app(&cfg), port.unwrap_or(cfg.gateway_port)).await,
        Service::All => {
            tracing::info!("starting all services");
            tokio::try_join!(
                serve(auth_app(&cfg), cfg.auth_port),
                serve(profile_app(&cfg), cfg.profile_port),
                serve(product_app(&cfg), cfg.product_port),
                serve(inventory_app(&cfg), cfg.inventory_port),
                serve(gateway_app(&cfg), cfg.gateway_port),
            )?;
            Ok(())
        }
    }
}

fn auth_app(cfg: &Config) -> Router {
    let state = Arc::new(auth::AuthState::new(&cfg.jwt_secret, cfg.token_ttl_secs));
    layered(auth::router(state))
}

fn profile_app(cfg: &Config) -> Router {
    let verifier = Arc::new(RemoteVerifier::new(cfg.auth_service_url.clone()));
    let state = Arc::new(profile::ProfileState::new(verifier));
    layered(profile::router(state))
}

fn product_app(cfg: &Config) -> Router {
    let verifier = Arc::new(RemoteVerifier::new(cfg.auth_service_url.clone()));
    let state = Arc::new(product::ProductState::new(verifier));
    layered(product::router(state))
}

fn inventory_app(cfg: &Config) -> Router {
    let verifier = Arc::new(RemoteVerifier::new(cfg.auth_service_url.clone()));
    let notifier = StockNotifier::new(cfg.product_service_url.clone());
    let state = Arc::new(inventory::InventoryState::new(verifier, notifier));
    layered(inventory::router(state))
}

fn gateway_app(cfg: &Config) -> Router {
    let state = Arc::new(GatewayState::new(RouteTable {
        auth: cfg.auth_service_url.clone(),
        profile: cfg.profile_service_url.clone(),
        products: cfg.product_service_url.clone(),
        inventory: cfg.inventory_service_url.clone(),
    }));
    layered(gateway::router(state))
}

/// Ambient layers every service carries: request tracing and open CORS.
fn layered(router: Router) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
