// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI coaching client.
//!
//! Handles:
//! - Prompt construction from the last week of records
//! - Gemini `generateContent` calls
//! - Bounded retry with exponential backoff (1s, 2s by default)
//!
//! Coaching is fully isolated from step tracking: it works on a snapshot of
//! the history and never touches tracker state.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{DailyRecord, UserProfile};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Additional attempts after the first failure.
pub const MAX_RETRIES: u32 = 2;

/// Number of trailing records summarized in the prompt.
pub const COACHING_WINDOW_DAYS: usize = 7;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str = "You are ZenBot, a kind and energetic personal walking coach. \
Analyze the user's walking data and give one short, motivating and specific piece of advice. \
Always include a small interesting health fact. Keep it under 120 words.";

/// Text generation backend used by the coach.
pub trait CoachingBackend: Send + Sync {
    fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

// ─── Gemini ──────────────────────────────────────────────────

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model,
        }
    }

    /// Point the client at another endpoint (proxies, local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request<'a>(system: &'a str, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.9,
            },
        }
    }

    fn extract_text(response: GenerateResponse) -> Option<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl CoachingBackend for GeminiBackend {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(system, prompt))
            .send()
            .await
            .map_err(|e| AppError::Coaching(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Coaching(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Coaching(format!("Invalid response: {}", e)))?;

        Self::extract_text(parsed)
            .ok_or_else(|| AppError::Coaching("Empty response from model".to_string()))
    }
}

// ─── Coach service ───────────────────────────────────────────

/// Produces motivational advice with bounded retries.
pub struct CoachService<B = GeminiBackend> {
    backend: Option<B>,
    retry_base: Duration,
}

impl CoachService<GeminiBackend> {
    /// Build from config; coaching is disabled without an API key.
    pub fn from_config(config: &Config) -> Self {
        let backend = config
            .gemini_api_key
            .clone()
            .map(|key| GeminiBackend::new(key, config.gemini_model.clone()));
        if backend.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, coaching disabled");
        }
        Self {
            backend,
            retry_base: config.coach_retry_base,
        }
    }
}

impl<B: CoachingBackend> CoachService<B> {
    pub fn new(backend: B, retry_base: Duration) -> Self {
        Self {
            backend: Some(backend),
            retry_base,
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: None,
            retry_base: Duration::ZERO,
        }
    }

    /// Ask for advice on the recent records, retrying transient failures.
    pub async fn advice(
        &self,
        recent: &[DailyRecord],
        profile: &UserProfile,
    ) -> Result<String, AppError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| AppError::Coaching("Coaching is not configured".to_string()))?;

        let prompt = build_prompt(recent, profile);
        let mut attempt = 0;
        loop {
            match backend.generate(SYSTEM_INSTRUCTION, &prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < MAX_RETRIES => {
                    let wait = self.retry_base * 2u32.pow(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        wait_ms = wait.as_millis() as u64,
                        "Coaching attempt failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(attempts = attempt + 1, error = %e, "Coaching failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Summarize the trailing week of records for the model.
pub fn build_prompt(records: &[DailyRecord], profile: &UserProfile) -> String {
    let start = records.len().saturating_sub(COACHING_WINDOW_DAYS);
    let window = &records[start..];

    let total_steps: u64 = window.iter().map(|r| u64::from(r.steps)).sum();
    let average = (total_steps as f64 / window.len().max(1) as f64).round() as u64;
    let total_km: f64 = window.iter().map(|r| r.distance).sum();

    format!(
        "My name is {}. Analyze my last {} days:\n\
         - Average steps: {}/day\n\
         - Total distance: {:.2} km\n\
         - Daily goal: {} steps.",
        profile.name,
        window.len(),
        average,
        total_km,
        profile.goal
    )
}
