pub mod encoding;
pub mod serialization;

use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::common::{Config, InputFormat};

const CONFIG_PATH_ENV: &str = "FIREAELF_CONFIG";
const CONFIG_ENV_PREFIX: &str = "FIREAELF";

pub fn load_config<P: AsRef<Path>>(file_name: P) -> Result<Config> {
    // Build the path to the config file, unless one is given explicitly
    let config_path = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => PathBuf::from(path),
        Err(_) => Path::new(env!("CARGO_MANIFEST_DIR")).join(file_name),
    };
    info!("Config path: {}", config_path.to_string_lossy());

    // YAML file first, then FIREAELF__SECTION__KEY environment overrides
    let config: Config = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read config")?
        .try_deserialize()
        .context("failed to parse config")?;

    Ok(config)
}

// Decodes one line of host input into the raw protobuf block bytes
pub fn decode_payload(line: &str, format: InputFormat) -> Result<Vec<u8>> {
    let line = line.trim();
    match format {
        InputFormat::Base64 => STANDARD
            .decode(line)
            .context("block payload is not valid base64"),
        InputFormat::Hex => {
            hex::decode(line.trim_start_matches("0x")).context("block payload is not valid hex")
        }
    }
}
