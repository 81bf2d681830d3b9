//! System prompt
//!
//! The default prompt is compiled in from `prompts/system.pmt`. A file named by
//! `agent.system-prompt-path` replaces it.

use std::path::Path;

use eyre::{Context, Result};
use tracing::debug;

/// Instructions sent as the first message of every conversation
pub const SYSTEM_PROMPT: &str = include_str!("../../prompts/system.pmt");

/// Load the system prompt, preferring `override_path` when given
pub fn load_system_prompt(override_path: Option<&Path>) -> Result<String> {
    debug!(?override_path, "load_system_prompt: called");
    match override_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to read system prompt: {}", path.display()))?;
            debug!(len = content.len(), "load_system_prompt: loaded override");
            Ok(content)
        }
        None => {
            debug!("load_system_prompt: using embedded prompt");
            Ok(SYSTEM_PROMPT.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_prompt_covers_contract() {
        let prompt = load_system_prompt(None).unwrap();
        assert!(prompt.contains("neighborhood_context_enabled"));
        assert!(prompt.contains("getNeighborhoodContext"));
        assert!(prompt.contains("answer_markdown"));
        assert!(prompt.contains("JSON ONLY"));
    }

    #[test]
    fn test_override_replaces_embedded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Answer in haiku.").unwrap();

        let prompt = load_system_prompt(Some(file.path())).unwrap();
        assert_eq!(prompt, "Answer in haiku.");
    }

    #[test]
    fn test_missing_override_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_system_prompt(Some(&dir.path().join("nope.pmt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read system prompt"));
    }
}
