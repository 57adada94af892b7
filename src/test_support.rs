//! Scripted collaborators for unit tests.

use crate::api::SummaryModel;
use crate::error::{DetectError, FetchError, ModelError, TranslateError};
use crate::fetch::PageFetcher;
use crate::language::LanguageDetector;
use crate::translate::Translator;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves canned pages by URL; unknown URLs answer 404.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFetcher {
    pages: Arc<Mutex<HashMap<String, Result<String, u16>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, html: &str) {
        self.pages.lock().unwrap().insert(url.to_string(), Ok(html.to_string()));
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.pages.lock().unwrap().insert(url.to_string(), Err(status));
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.lock().unwrap().get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(404)),
        }
    }
}

/// Always answers with the same language, or always fails.
#[derive(Debug, Clone)]
pub struct FixedDetector(pub Option<&'static str>);

impl LanguageDetector for FixedDetector {
    fn detect(&self, text: &str) -> Result<String, DetectError> {
        self.0.map(str::to_string).ok_or(DetectError {
            chars: text.chars().count(),
        })
    }
}

/// Returns its input, optionally failing chunks that contain a marker.
#[derive(Debug, Clone, Default)]
pub struct EchoTranslator {
    pub fail_marker: Option<&'static str>,
    pub prefix: &'static str,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl EchoTranslator {
    pub fn prefixed(prefix: &'static str) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    pub fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
            ..Self::default()
        }
    }

    /// `(source_language, chunk)` for every call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, source: &str, _target: &str) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push((source.to_string(), text.to_string()));
        if self.fail_marker.is_some_and(|m| text.contains(m)) {
            return Err(TranslateError::Status(500));
        }
        Ok(format!("{}{}", self.prefix, text))
    }
}

/// Summary model with a fixed answer; `None` means not configured.
#[derive(Debug, Clone, Default)]
pub struct ScriptedModel {
    pub reply: Option<Result<String, u16>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedModel {
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(Ok(reply.to_string())),
            ..Self::default()
        }
    }

    pub fn erroring(status: u16) -> Self {
        Self {
            reply: Some(Err(status)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl SummaryModel for ScriptedModel {
    fn is_available(&self) -> bool {
        self.reply.is_some()
    }

    async fn generate_summary(
        &self,
        _system_instruction: &str,
        _prompt: &str,
        _max_output_tokens: u32,
        _temperature: f32,
    ) -> Result<String, ModelError> {
        *self.calls.lock().unwrap() += 1;
        match &self.reply {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(status)) => Err(ModelError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            None => Err(ModelError::MissingApiKey),
        }
    }
}
