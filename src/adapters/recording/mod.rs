//! Recording adapters that capture interactions to cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::format::Call;
use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Inline image payloads in the input are kept so that a cassette shows
/// exactly which references were sent.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    call: &Call,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let serialized = serde_json::to_value(input).and_then(|input_json| {
        let output_json = match result {
            Ok(v) => serde_json::json!({ "Ok": serde_json::to_value(v)? }),
            Err(e) => serde_json::json!({ "Err": e.to_string() }),
        };
        Ok((input_json, output_json))
    });
    let (input_json, output_json) = match serialized {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(%call, error = %e, "interaction not recorded");
            return;
        }
    };

    let Ok(mut guard) = recorder.lock() else {
        tracing::warn!(%call, "recorder lock poisoned; interaction not recorded");
        return;
    };
    guard.record(call, input_json, output_json);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ok_and_err_outputs() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            std::env::temp_dir().join("unused.cassette.yaml"),
            "t",
            "c",
        )));
        let ok: Result<u32, String> = Ok(7);
        let err: Result<u32, String> = Err("quota exceeded".into());
        record_result(&recorder, &Call::generate(), &"first", &ok);
        record_result(&recorder, &Call::generate(), &"second", &err);

        let guard = recorder.lock().unwrap();
        let interactions = guard.interactions();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].output, serde_json::json!({"Ok": 7}));
        let failure = serde_json::json!({"Err": "quota exceeded"});
        assert_eq!(interactions[1].output, failure);
        assert!(interactions[1].is_failure());
        assert_eq!(interactions[1].seq, 1);
    }
}
