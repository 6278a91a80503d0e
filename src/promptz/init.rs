use crate::api::PromptzApp;
use crate::config::PromptzConfig;
use crate::store::FsBackend;
use crate::timer::SystemClock;
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct PromptzContext {
    pub app: PromptzApp<FsBackend>,
    pub data_dir: PathBuf,
}

/// Resolve the data directory. `PROMPTZ_DATA_DIR` wins when set so tests
/// and scripts can point the whole stack at a sandbox; otherwise the
/// platform-native data dir is used.
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var("PROMPTZ_DATA_DIR").ok().as_deref())
}

fn resolve_data_dir(override_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    let proj_dirs =
        ProjectDirs::from("com", "adebert", "promptz").expect("Could not determine the data dir");
    proj_dirs.data_dir().to_path_buf()
}

pub fn initialize() -> PromptzContext {
    let data_dir = data_dir();
    let config = PromptzConfig::load(&data_dir).unwrap_or_default();
    let backend = FsBackend::new(&data_dir);
    let app = PromptzApp::new(backend, config, Box::new(SystemClock));
    PromptzContext { app, data_dir }
}
