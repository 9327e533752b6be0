//! Blocking client for the project's `rpc/exec` endpoint.
//!
//! The deploy run does not call this: Supabase exposes no arbitrary-SQL RPC by
//! default, so migrations are applied by hand in the SQL editor. It is kept for
//! projects that install an `exec` function themselves.

use std::error::Error;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;

use crate::config::request_timeout;
use crate::credential::Credential;

#[derive(Serialize)]
struct ExecRequest<'a> {
  sql: &'a str,
}

/// POSTs `{"sql": sql}` to `endpoint`, authenticating with `credential` as both
/// the `apikey` header and the bearer token. Any transport failure or non-2xx
/// status comes back as `Err` with the error text.
pub fn execute_sql(endpoint: &str, credential: &Credential, sql: &str) -> Result<Value, String> {
  let mut builder = reqwest::blocking::Client::builder().connect_timeout(Duration::from_secs(10));
  if let Some(timeout) = request_timeout() {
    builder = builder.timeout(timeout);
  }
  let client = builder.build().map_err(|e| e.to_string())?;

  let request = client
    .post(endpoint)
    .header("apikey", credential.expose())
    .bearer_auth(credential.expose())
    .json(&ExecRequest { sql })
    .build()
    .map_err(|e| map_request_error(endpoint, e))?;
  log_request_details(&request, sql.len());

  let response = client
    .execute(request)
    .map_err(|e| map_request_error(endpoint, e))?;
  let status = response.status();
  tracing::debug!(%status, "rpc response");

  let body_bytes = response
    .bytes()
    .map_err(|e| map_request_error(endpoint, e))?;
  let body_text = String::from_utf8_lossy(&body_bytes).to_string();

  if !status.is_success() {
    if body_text.is_empty() {
      return Err(format!("API returned {status} for {endpoint}"));
    }
    return Err(format!("API returned {status} for {endpoint}: {body_text}"));
  }

  serde_json::from_slice::<Value>(&body_bytes).map_err(|err| {
    tracing::debug!(error = %err, body = %body_text, "rpc response was not JSON");
    format!("Invalid JSON response: {err}")
  })
}

fn map_request_error(endpoint: &str, err: reqwest::Error) -> String {
  let mut chain = Vec::new();
  let mut source = Error::source(&err);
  while let Some(src) = source {
    chain.push(src.to_string());
    source = src.source();
  }
  tracing::debug!(
    endpoint,
    connect = err.is_connect(),
    timeout = err.is_timeout(),
    caused_by = ?chain,
    "rpc request failed"
  );
  if err.is_connect() {
    return format!("Could not connect to {endpoint}: {err}");
  }
  if err.is_timeout() {
    return format!("Request to {endpoint} timed out: {err}");
  }
  format!("Request failed: {err}")
}

fn log_request_details(request: &reqwest::blocking::Request, sql_len: usize) {
  let token_len = request
    .headers()
    .get(AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.split_once(' '))
    .map(|(_, token)| token.len());
  tracing::debug!(
    method = %request.method(),
    url = %request.url(),
    token_len = ?token_len,
    sql_bytes = sql_len,
    "rpc request"
  );
}
