//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use std::sync::Mutex;

use crate::cassette::format::Call;
use crate::cassette::replayer::CassetteReplayer;

/// Retrieve the next recorded output for `call`.
///
/// # Errors
///
/// Returns an error if the cassette has no more interactions for the call.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    call: &Call,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer
        .lock()
        .map_err(|e| format!("Replayer lock poisoned: {e}"))?;
    guard.next_interaction(call).map(|i| i.output)
}

/// Deserialize a replayed output as `Result<T, Error>`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err_val.as_str().unwrap_or("replayed error").to_string();
        return Err(msg.into());
    }
    if let Some(ok_val) = output.get("Ok").or_else(|| output.get("ok")) {
        return serde_json::from_value(ok_val.clone())
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>);
    }
    serde_json::from_value(output)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ports::image_generator::GenerateResponse;

    #[test]
    fn replays_ok_payload() {
        let output = json!({"Ok": {"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
        ]}}]}});
        let response = replay_result::<GenerateResponse>(output).unwrap();
        assert_eq!(response.first_image(), Some("AAAA"));
    }

    #[test]
    fn replays_recorded_error() {
        let output = json!({"Err": "API error (429): quota"});
        let err = replay_result::<GenerateResponse>(output).unwrap_err();
        assert_eq!(err.to_string(), "API error (429): quota");
    }
}
