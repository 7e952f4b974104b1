// File: probe.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::errors::FetchError;
use crate::finding::{Failure, Finding, Mismatch};
use crate::http::Http;
use crate::outcome::{FetchOutcome, ProbeMethod};
use crate::variants::{generate_variants, Variant, ORIGINAL_LABEL};
use log::{debug, info};
use tokio::sync::mpsc::{error::SendError, Sender};

/// A variant is reported when its size differs from the baseline and its
/// status is not a 4xx.
pub fn is_mismatch(baseline: &FetchOutcome, variant: &FetchOutcome) -> bool {
    variant.size() != baseline.size() && (variant.status() < 400 || variant.status() >= 500)
}

/// Probes one base URL with GET then POST and sends every finding to
/// `results`. Stops early only if the receiver is gone.
pub async fn probe_url(http: &Http, base_url: &str, results: &Sender<Finding>) {
    let variants = generate_variants(base_url);
    for method in ProbeMethod::ALL {
        if probe_method(http, base_url, &variants, method, results)
            .await
            .is_err()
        {
            debug!("result receiver closed, abandoning {}", base_url);
            return;
        }
    }
}

async fn probe_method(
    http: &Http,
    base_url: &str,
    variants: &[Variant],
    method: ProbeMethod,
    results: &Sender<Finding>,
) -> Result<(), SendError<Finding>> {
    let baseline = match http.fetch(base_url, method).await {
        Ok(outcome) => outcome,
        Err(e) => return report_failure(http, base_url, ORIGINAL_LABEL, method, e, results).await,
    };
    debug!(
        "baseline {} {}: {} bytes, status {}",
        method,
        base_url,
        baseline.size(),
        baseline.status()
    );

    for variant in variants {
        match http.fetch(&variant.url, method).await {
            Ok(outcome) if is_mismatch(&baseline, &outcome) => {
                info!(
                    "mismatch at [{}] [{}] {}: {} vs {} bytes",
                    variant.label(),
                    method,
                    base_url,
                    outcome.size(),
                    baseline.size()
                );
                http.state().add_mismatch();
                results
                    .send(Finding::Mismatch(Mismatch {
                        base_url: base_url.to_string(),
                        label: variant.label(),
                        method,
                        variant_url: variant.url.clone(),
                        variant: outcome,
                        baseline: baseline.clone(),
                    }))
                    .await?;
            }
            Ok(_) => {}
            Err(e) => {
                report_failure(http, &variant.url, variant.label(), method, e, results).await?
            }
        }
    }
    Ok(())
}

async fn report_failure(
    http: &Http,
    url: &str,
    label: &'static str,
    method: ProbeMethod,
    error: FetchError,
    results: &Sender<Finding>,
) -> Result<(), SendError<Finding>> {
    if error.is_no_host() {
        http.state().add_suppressed();
        debug!("skipping [{}] [{}]: {}", label, method, error);
        return Ok(());
    }
    http.state().add_failure();
    results
        .send(Finding::Failure(Failure {
            url: url.to_string(),
            label,
            method,
            error: error.to_string(),
        }))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn outcome(size: usize, status: u16) -> FetchOutcome {
        FetchOutcome::new(size, status, "http://example.com/admin".to_string())
    }

    #[rstest]
    #[case(512, 403, 2048, 200, true)]
    #[case(512, 403, 512, 403, false)]
    #[case(512, 200, 512, 200, false)]
    #[case(512, 200, 100, 404, false)]
    #[case(512, 200, 100, 400, false)]
    #[case(512, 200, 100, 499, false)]
    #[case(512, 200, 100, 500, true)]
    #[case(512, 200, 100, 503, true)]
    #[case(512, 200, 100, 399, true)]
    #[case(512, 200, 100, 301, true)]
    #[case(512, 500, 512, 200, false)]
    fn test_mismatch_rule(
        #[case] base_size: usize,
        #[case] base_status: u16,
        #[case] variant_size: usize,
        #[case] variant_status: u16,
        #[case] expected: bool,
    ) {
        assert_eq!(
            is_mismatch(
                &outcome(base_size, base_status),
                &outcome(variant_size, variant_status)
            ),
            expected
        );
    }

    #[test]
    fn test_client_errors_never_reported() {
        let baseline = outcome(10, 200);
        for status in 400..500 {
            assert!(!is_mismatch(&baseline, &outcome(999, status)));
        }
    }
}
