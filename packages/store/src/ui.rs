//! Interactive passphrase prompting
//!
//! The store never asks for secrets itself. Callers hand in a
//! [`PassphrasePrompt`] when opening a context and it is passed through to
//! every loader call that might need one. Any state the prompt needs (a
//! terminal, a cached passphrase, a GUI handle) lives in the implementor.

use std::sync::Arc;
use zeroize::Zeroizing;

/// What a loader wants a passphrase for
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    /// Short description of the secret, e.g. `pass phrase`
    pub info: String,
    /// Object or resource the passphrase unlocks
    pub object: String,
    /// Whether the caller should be asked to type it twice
    pub verify: bool,
}

impl PromptRequest {
    /// Request a passphrase for `object`
    pub fn passphrase_for(object: impl Into<String>) -> Self {
        Self {
            info: "pass phrase".to_string(),
            object: object.into(),
            verify: false,
        }
    }

    /// Prompt text suitable for a terminal
    #[must_use]
    pub fn render(&self) -> String {
        if self.object.is_empty() {
            format!("Enter {}:", self.info)
        } else {
            format!("Enter {} for {}:", self.info, self.object)
        }
    }
}

/// Source of passphrases for loaders
pub trait PassphrasePrompt: Send + Sync {
    /// Ask for a passphrase; `None` means the user cancelled
    fn passphrase(&self, request: &PromptRequest) -> Option<Zeroizing<String>>;
}

/// Shared prompt handle carried by a context
pub type UiHandle = Arc<dyn PassphrasePrompt>;

/// Prompt that always answers with the same passphrase
pub struct FixedPassphrase {
    passphrase: Zeroizing<String>,
}

impl FixedPassphrase {
    /// Answer every request with `passphrase`
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }

    /// Wrap into a shareable handle
    #[must_use]
    pub fn into_handle(self) -> UiHandle {
        Arc::new(self)
    }
}

impl PassphrasePrompt for FixedPassphrase {
    fn passphrase(&self, _request: &PromptRequest) -> Option<Zeroizing<String>> {
        Some(self.passphrase.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_object() {
        let req = PromptRequest::passphrase_for("file:/tmp/key.pem");
        assert_eq!(req.render(), "Enter pass phrase for file:/tmp/key.pem:");
    }

    #[test]
    fn renders_without_object() {
        let req = PromptRequest {
            info: "PIN".to_string(),
            ..PromptRequest::default()
        };
        assert_eq!(req.render(), "Enter PIN:");
    }

    #[test]
    fn fixed_passphrase_answers() {
        let ui = FixedPassphrase::new("hunter2").into_handle();
        let answer = ui.passphrase(&PromptRequest::default());
        assert_eq!(answer.as_deref().map(String::as_str), Some("hunter2"));
    }
}
