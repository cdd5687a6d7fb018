//! HTTP-mode evaluation.

use std::path::Path;

use crate::ports::http::{HttpClient, HttpRequest, HttpResponse};
use crate::spec::TestCase;

use super::json::{check_golden, JsonSubject};
use super::outcome::{SkipReason, TestOutcome};
use super::first_missing;

/// Issues the request described by `test` against `base_url` and checks the response.
///
/// Optional tests are skipped without touching the network.
pub async fn evaluate_http(
    client: &dyn HttpClient,
    base_url: &str,
    test: &TestCase,
    challenge_dir: &Path,
) -> TestOutcome {
    if test.optional {
        return TestOutcome::skipped(&test.name, SkipReason::Optional);
    }

    let request = HttpRequest {
        method: test.method.clone(),
        url: format!("{base_url}{}", test.path),
        timeout: test.http_timeout(),
    };
    let response = match client.send(&request).await {
        Ok(response) => response,
        Err(e) => return TestOutcome::failed(&test.name, e.to_string()),
    };

    match check_response(test, &response, challenge_dir) {
        Ok(()) => TestOutcome::passed(&test.name),
        Err(reason) => TestOutcome::failed(&test.name, reason),
    }
}

fn check_response(test: &TestCase, response: &HttpResponse, challenge_dir: &Path) -> Result<(), String> {
    if response.status != test.expect_status {
        return Err(format!("Status {}, expected {}", response.status, test.expect_status));
    }
    if let Some(missing) = first_missing(&response.body, &test.expect_body_contains) {
        return Err(format!("Body missing: '{missing}'"));
    }
    if let Some(golden) = &test.expect_json_file {
        check_golden(challenge_dir, golden, &response.body, JsonSubject::ResponseBody)?;
    }
    Ok(())
}
