use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{info, trace, warn};

#[derive(Debug, Clone)]
pub struct Config {
    map: HashMap<String, String>,
    pub loaded_file: Option<PathBuf>,
}

impl Config {
    #[tracing::instrument(skip(rcfile_override))]
    pub fn load(rcfile_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config {
            map: HashMap::new(),
            loaded_file: None,
        };

        cfg.map
            .insert("data.location".to_string(), "~/.docket".to_string());
        cfg.map.insert("color".to_string(), "on".to_string());
        cfg.map
            .insert("default.sort".to_string(), "date".to_string());

        let rcfile = resolve_rcfile_path(rcfile_override)?;
        if let Some(path) = rcfile {
            info!(rcfile = %path.display(), "loading rc file");
            cfg.load_file(&path)?;
        } else {
            warn!("no rc file found; using defaults");
        }

        Ok(cfg)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).map(|v| parse_bool(v))
    }

    #[tracing::instrument(skip(self))]
    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = expand_tilde(path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        self.loaded_file = Some(path.clone());

        for (line_num, raw_line) in text.lines().enumerate() {
            let mut line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((before, _)) = line.split_once('#') {
                line = before.trim();
            }
            if line.is_empty() {
                continue;
            }

            let (k, v) = line.split_once('=').ok_or_else(|| {
                anyhow!(
                    "invalid config line {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    raw_line
                )
            })?;

            let key = k.trim().to_string();
            let value = v.trim().to_string();
            trace!(key = %key, value = %value, "loaded config key");
            self.map.insert(key, value);
        }

        Ok(())
    }
}

#[tracing::instrument(skip(cfg, override_dir))]
pub fn resolve_data_dir(cfg: &Config, override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let dir = if let Some(path) = override_dir {
        path.to_path_buf()
    } else if let Some(cfg_value) = cfg.get("data.location") {
        expand_tilde(Path::new(&cfg_value))
    } else {
        default_data_dir()?
    };

    if !dir.exists() {
        info!(dir = %dir.display(), "creating data directory");
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    Ok(dir)
}

fn resolve_rcfile_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(rc_env) = std::env::var("DOCKETRC") {
        if rc_env == "/dev/null" {
            return Ok(None);
        }
        return Ok(Some(PathBuf::from(rc_env)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    let candidate = home.join(".docketrc");
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(".docket"))
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "on" | "true"
    )
}
