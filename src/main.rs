// --- Horarios escolares - servidor de la API ---

use horarios::config::Config;
use horarios::gateway::GatewayClient;
use horarios::run_server;
use horarios::server::cargar_segun_config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let filtro = EnvFilter::try_from_env("HORARIOS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filtro).init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuración inválida");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!("=== Horarios escolares (API) ===");
    let remoto = config
        .url_efectiva()
        .map(|url| GatewayClient::new(url, config.formato_post));
    let catalogo = cargar_segun_config(&config, remoto.as_ref()).await;
    info!(
        cursos = catalogo.cursos.len(),
        bloques = catalogo.bloques.len(),
        "Iniciando servidor en http://{}",
        config.bind
    );
    run_server(config, catalogo).await
}
