//! Doctor command for environment diagnostics
//!
//! Checks that the Ollama server answers and that both configured models
//! are pulled.

use colored::Colorize;

use crate::streaming::OllamaClient;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    client: OllamaClient,
}

impl Doctor {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    /// Run all health checks
    ///
    /// Model checks are skipped when the server is unreachable.
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let api = self.check_ollama_api().await;
        let reachable = api.status == HealthStatus::Pass;
        let mut checks = vec![api];

        if reachable {
            match self.client.list_models().await {
                Ok(models) => {
                    checks.push(model_check("Completion model", self.client.model(), &models));
                    checks.push(model_check(
                        "Embedding model",
                        self.client.embedding_model(),
                        &models,
                    ));
                }
                Err(e) => checks.push(HealthCheck::new(
                    "Models",
                    HealthStatus::Fail(format!("Could not list models: {}", e)),
                )),
            }
        }

        checks
    }

    async fn check_ollama_api(&self) -> HealthCheck {
        match self.client.health_check().await {
            Ok(true) => HealthCheck::new("Ollama API", HealthStatus::Pass),
            Ok(false) => HealthCheck::new(
                "Ollama API",
                HealthStatus::Fail(format!(
                    "Not reachable at {}. Start it with: ollama serve",
                    self.client.base_url()
                )),
            ),
            Err(e) => HealthCheck::new(
                "Ollama API",
                HealthStatus::Fail(format!("Error checking Ollama: {}", e)),
            ),
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "RAG Workshop Diagnostics".bold().cyan());
        println!("{:<20} {}", "Check", "Status");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red(),
            };
            println!("{:<20} {}", check.name, message);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

/// `nomic-embed-text` matches an installed `nomic-embed-text:latest`
fn model_check(name: &str, model: &str, installed: &[String]) -> HealthCheck {
    let tagged = format!("{}:", model);
    if installed.iter().any(|m| m == model || m.starts_with(&tagged)) {
        HealthCheck::new(name, HealthStatus::Pass)
    } else if installed.is_empty() {
        HealthCheck::new(
            name,
            HealthStatus::Warn(format!("No models installed. Pull one with: ollama pull {}", model)),
        )
    } else {
        HealthCheck::new(
            name,
            HealthStatus::Fail(format!("'{}' not installed. Run: ollama pull {}", model, model)),
        )
    }
}
