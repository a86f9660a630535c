use std::path::PathBuf;

use tracing::{Level, level_filters::LevelFilter};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub fn setup_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(LevelFilter::from_level(Level::WARN)))
        .try_init();
}

/// Writes `content` to a fresh file of the temporary directory and returns its path.
#[allow(dead_code)]
pub fn write_share_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("secret_reconstruction_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Builds a share file for the points `(x, y)`, encoding each y in the paired base.
#[allow(dead_code)]
pub fn share_file_json(k: usize, shares: &[(u64, u32, &str)]) -> String {
    let mut root = serde_json::Map::new();
    root.insert(
        "keys".to_string(),
        serde_json::json!({ "n": shares.len(), "k": k }),
    );
    for (index, base, value) in shares {
        root.insert(
            index.to_string(),
            serde_json::json!({ "base": base.to_string(), "value": value }),
        );
    }
    serde_json::Value::Object(root).to_string()
}
