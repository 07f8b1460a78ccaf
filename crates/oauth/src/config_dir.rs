use std::path::PathBuf;

/// `~/.config/sayvai/`, or `.sayvai` in the working directory when no home
/// directory can be resolved.
pub(crate) fn sayvai_config_dir() -> PathBuf {
    sayvai_config::config_dir().unwrap_or_else(|| PathBuf::from(".sayvai"))
}
