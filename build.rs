use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Cargar variables de entorno desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // KEY=VALUE, las comillas se eliminan (API_BASE_URL="http://...")
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    // Las variables del entorno real tienen prioridad sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. Dashboard will use same-origin API and default map settings.");
    }

    for key in [
        "API_BASE_URL",
        "WS_PATH",
        "RECONNECT_DELAY_MS",
        "MAP_CENTER_LAT",
        "MAP_CENTER_LNG",
        "MAP_ZOOM",
        "ENABLE_LOGGING",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
