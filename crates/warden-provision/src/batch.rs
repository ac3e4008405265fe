//! Sequential batch provisioning.
//!
//! Requests run strictly in input order, one at a time, with a short pause
//! between consecutive items to stay clear of API rate limits. A failed
//! request never aborts the rest of the batch.

use std::time::Duration;

use tracing::info;

use crate::orchestrator::Provisioner;
use crate::result::ProvisioningResult;
use warden_core::UserRequest;

/// Pacing for batch runs.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Pause inserted between consecutive requests, not after the last.
    pub pause: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(100),
        }
    }
}

/// Runs a list of requests through one [`Provisioner`].
pub struct BatchRunner {
    provisioner: Provisioner,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(provisioner: Provisioner) -> Self {
        Self {
            provisioner,
            options: BatchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Provision every request, collecting one result per request in the
    /// same order.
    pub async fn run(&self, requests: &[UserRequest]) -> Vec<ProvisioningResult> {
        let mut results = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.options.pause).await;
            }
            info!(
                username = %request.username,
                position = index + 1,
                total = requests.len(),
                "processing batch request"
            );
            results.push(self.provisioner.provision(request).await);
        }

        let successful = results.iter().filter(|r| r.success).count();
        info!(
            total = results.len(),
            successful,
            failed = results.len() - successful,
            "batch complete"
        );
        results
    }
}
