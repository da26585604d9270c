use much_todo_config::{Config, config::Key};
use std::{env, process::ExitCode};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_DIR: &str = ".";

fn parse_config_dir() -> String {
    for arg in env::args().skip(1) {
        if let Some(dir) = arg.strip_prefix("--config-dir=") {
            return dir.to_string();
        }
    }
    DEFAULT_CONFIG_DIR.to_string()
}

fn parse_level(log_level: &str) -> Level {
    match log_level.trim().to_ascii_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

fn is_json_format(log_format: &str) -> bool {
    log_format.trim().eq_ignore_ascii_case("json")
}

fn init_tracing(config: &Config) {
    let level = parse_level(config.log_level());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if is_json_format(config.log_format()) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let config_dir = parse_config_dir();

    let config = match Config::load(&config_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    info!(
        config_dir = %config_dir,
        port = %config.server_port(),
        db_name = %config.db_name(),
        mongo_uri_set = !config.mongo_uri().is_empty(),
        jwt_secret_set = !config.jwt_secret_key().is_empty(),
        jwt_expiration_hours = config.jwt_expiration_hours(),
        enable_cache = config.enable_cache(),
        redis_addr = %config.redis_addr(),
        redis_password_set = !config.redis_password().is_empty(),
        "Configuration loaded"
    );

    for key in Key::ALL {
        let source = config
            .sources()
            .get(key)
            .map_or("unset".to_string(), |s| s.to_string());
        debug!(key = %key, source = %source, secret = key.is_secret(), "Config value source");
    }

    if config.jwt_secret_key().is_empty() {
        warn!("JWT_SECRET_KEY is not set; auth tokens cannot be signed");
    }
    if config.enable_cache() && config.redis_addr().is_empty() {
        warn!("ENABLE_CACHE is true but REDIS_ADDR is not set");
    }

    ExitCode::SUCCESS
}
