use texinfo_lsp::TexinfoLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log to stderr; stdout carries the protocol. Filtered by `RUST_LOG`, `warn` by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let config = match texinfo_config::load_defaults() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load default configuration");
            std::process::exit(1);
        }
    };

    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) =
        LspService::new(move |client| TexinfoLanguageServer::new(client, config));
    Server::new(stdin, stdout, socket).serve(service).await;
}
