//! Doctor command for system diagnostics
//!
//! Health checks covering everything the harness depends on: the engine
//! daemon, the downloaded model, local storage, and the network.

use crate::installer::ModelInstaller;
use crate::sdk::EngineClient;
use colored::Colorize;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

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

/// Doctor diagnostics system
pub struct Doctor<'a> {
    client: &'a EngineClient,
    installer: &'a ModelInstaller,
}

impl<'a> Doctor<'a> {
    /// Create a new doctor instance
    pub fn new(client: &'a EngineClient, installer: &'a ModelInstaller) -> Self {
        Self { client, installer }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = Vec::new();

        checks.push(self.check_engine_api().await);
        checks.push(self.check_engine_model().await);
        checks.push(self.check_starter_model());
        checks.push(self.check_storage());
        checks.push(self.check_disk_space());
        checks.push(self.check_network().await);

        checks
    }

    /// Check 1: engine API reachable
    async fn check_engine_api(&self) -> HealthCheck {
        let status = if self.client.health_check().await {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail(format!(
                "Engine not reachable at {}",
                self.client.base_url()
            ))
        };
        HealthCheck {
            name: "Engine API".to_string(),
            status,
        }
    }

    /// Check 2: configured model downloaded
    async fn check_engine_model(&self) -> HealthCheck {
        let status = if self.client.is_ready().await {
            HealthStatus::Pass
        } else {
            HealthStatus::Warn(format!(
                "Model '{}' not downloaded (run: modelbench download)",
                self.client.model()
            ))
        };
        HealthCheck {
            name: "Engine Model".to_string(),
            status,
        }
    }

    /// Check 3: starter model installed locally
    fn check_starter_model(&self) -> HealthCheck {
        let status = if self.installer.is_available() {
            HealthStatus::Pass
        } else {
            HealthStatus::Warn(
                "Starter model not installed (run: modelbench install)".to_string(),
            )
        };
        HealthCheck {
            name: "Starter Model".to_string(),
            status,
        }
    }

    /// Check 4: models directory writable
    fn check_storage(&self) -> HealthCheck {
        let dir = self.installer.models_dir();

        if !dir.exists() {
            return HealthCheck {
                name: "Storage".to_string(),
                status: HealthStatus::Fail(format!("{} does not exist", dir.display())),
            };
        }

        // Probe write permission with a throwaway file
        let probe = dir.join(".modelbench_probe");
        let status = match std::fs::write(&probe, b"probe") {
            Ok(_) => {
                let _ = std::fs::remove_file(&probe);
                HealthStatus::Pass
            }
            Err(e) => HealthStatus::Fail(format!("No write permission: {}", e)),
        };

        HealthCheck {
            name: "Storage".to_string(),
            status,
        }
    }

    /// Check 5: disk space under the models directory
    fn check_disk_space(&self) -> HealthCheck {
        use sysinfo::Disks;
        let disks = Disks::new_with_refreshed_list();

        let models_dir: &Path = self.installer.models_dir();

        let mut best_match: Option<(usize, u64)> = None;
        for disk in &disks {
            if models_dir.starts_with(disk.mount_point()) {
                let depth = disk.mount_point().components().count();
                if best_match.map(|(d, _)| depth > d).unwrap_or(true) {
                    best_match = Some((depth, disk.available_space()));
                }
            }
        }

        match best_match {
            Some((_, available)) => {
                let available_gb = available / (1024 * 1024 * 1024);
                let status = if available_gb < 1 {
                    HealthStatus::Fail(format!(
                        "Less than 1GB available ({} GB)",
                        available_gb
                    ))
                } else if available_gb < 5 {
                    HealthStatus::Warn(format!("Low disk space ({} GB available)", available_gb))
                } else {
                    HealthStatus::Pass
                };
                HealthCheck {
                    name: "Disk Space".to_string(),
                    status,
                }
            }
            None => HealthCheck {
                name: "Disk Space".to_string(),
                status: HealthStatus::Warn("Could not determine disk space".to_string()),
            },
        }
    }

    /// Check 6: external network reachability (best effort)
    async fn check_network(&self) -> HealthCheck {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        let test_urls = ["https://ollama.com", "https://www.cloudflare.com"];

        for url in test_urls {
            if let Ok(response) = client.get(url).send().await {
                if response.status().is_success() {
                    return HealthCheck {
                        name: "Network".to_string(),
                        status: HealthStatus::Pass,
                    };
                }
            }
        }

        // Offline use still works once models are downloaded
        HealthCheck {
            name: "Network".to_string(),
            status: HealthStatus::Warn("Cannot reach external networks".to_string()),
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}", "modelbench diagnostics".bold());
        println!("{}", "=".repeat(50));

        for check in checks {
            let line = match &check.status {
                HealthStatus::Pass => format!("{} PASS", "✓".green()),
                HealthStatus::Warn(msg) => format!("{} WARN: {}", "!".yellow(), msg),
                HealthStatus::Fail(msg) => format!("{} FAIL: {}", "✗".red(), msg),
            };
            println!("{:<16} {}", check.name, line);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}
