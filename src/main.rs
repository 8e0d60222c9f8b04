use clap::Parser;
use paramform::adapters::form_handler::FormState;
use paramform::cli::Cli;
use paramform::config::Settings;
use paramform::widgets::WidgetRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let registry = Arc::new(WidgetRegistry::with_defaults());
    let settings = Settings::new_with_cli(&cli, &registry)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!(
        "Starting paramform on {}:{} with {} form(s), {} testcase(s)",
        host,
        port,
        settings.forms.len(),
        settings.form.testcases
    );

    let state = FormState::new(Arc::new(settings), registry)?;
    let app = paramform::create_app(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
