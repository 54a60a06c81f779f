use little_chat_model::{ExchangeResponse, Turn};
use serde::Deserialize;
use serde_json::Value;

use crate::Error;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    success: bool,
    response: Option<String>,
    history: Option<Value>,
    error: Option<String>,
}

// -----------
// Conversions
// -----------

/// Decodes the body of a `POST /api/chat` response.
///
/// `body` is `None` when the body could not be read at all.
pub fn decode_chat_response(
    status: u16,
    body: Option<&[u8]>,
) -> Result<ExchangeResponse, Error> {
    if !(200..300).contains(&status) {
        let error_body = body
            .and_then(|body| serde_json::from_slice::<ErrorBody>(body).ok())
            .unwrap_or_default();
        let message = non_empty(error_body.error)
            .unwrap_or_else(|| format!("Request failed: {status}"));
        return Err(Error::request_failed(message));
    }

    let Some(body) = body else {
        return Err(Error::failed_to_send());
    };
    let body: ChatResponseBody = match serde_json::from_slice(body) {
        Ok(body) => body,
        Err(err) => {
            error!("malformed chat response: {err}");
            return Err(Error::failed_to_send());
        }
    };

    if !body.success {
        let message = non_empty(body.error)
            .unwrap_or_else(|| "Request failed".to_owned());
        return Err(Error::request_failed(message));
    }

    let Some(response) = body.response else {
        error!("chat response has no `response` field");
        return Err(Error::failed_to_send());
    };
    Ok(ExchangeResponse {
        response,
        history: decode_history(body.history),
    })
}

/// The returned history is informational, so a shape we don't understand
/// is dropped instead of failing the whole exchange.
fn decode_history(history: Option<Value>) -> Vec<Turn> {
    let Some(history) = history else {
        return vec![];
    };
    match serde_json::from_value(history) {
        Ok(history) => history,
        Err(err) => {
            warn!("ignoring unrecognized history in chat response: {err}");
            vec![]
        }
    }
}

#[inline]
fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use little_chat_model::{ChatServiceError, ErrorKind};
    use serde_json::json;

    use super::*;

    fn decode(status: u16, body: Value) -> Result<ExchangeResponse, Error> {
        let body = serde_json::to_vec(&body).unwrap();
        decode_chat_response(status, Some(&body))
    }

    #[test]
    fn test_success() {
        let resp = decode(
            200,
            json!({
                "success": true,
                "response": "Hi!",
                "history": [
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Hi!" }
                ]
            }),
        )
        .unwrap();
        assert_eq!(resp.response, "Hi!");
        assert_eq!(
            resp.history,
            vec![Turn::user("Hello"), Turn::assistant("Hi!")]
        );
    }

    #[test]
    fn test_success_without_history() {
        let resp =
            decode(200, json!({ "success": true, "response": "Hi!" })).unwrap();
        assert_eq!(resp.response, "Hi!");
        assert!(resp.history.is_empty());

        let resp = decode(
            200,
            json!({
                "success": true,
                "response": "Hi!",
                "history": [{ "role": "system", "content": "?" }]
            }),
        )
        .unwrap();
        assert!(resp.history.is_empty());
    }

    #[test]
    fn test_error_status_with_body() {
        let err = decode(
            500,
            json!({
                "error": "An error occurred processing your request",
                "success": false
            }),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.message(), "An error occurred processing your request");
    }

    #[test]
    fn test_error_status_without_body() {
        let err = decode_chat_response(502, Some(b"<html>Bad Gateway</html>"))
            .unwrap_err();
        assert_eq!(err.message(), "Request failed: 502");

        let err = decode_chat_response(404, None).unwrap_err();
        assert_eq!(err.message(), "Request failed: 404");

        let err = decode(400, json!({ "error": "" })).unwrap_err();
        assert_eq!(err.message(), "Request failed: 400");
    }

    #[test]
    fn test_unsuccessful_body() {
        let err =
            decode(200, json!({ "success": false, "error": "Rate limited" }))
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.message(), "Rate limited");

        let err = decode(200, json!({ "response": "Hi!" })).unwrap_err();
        assert_eq!(err.message(), "Request failed");
    }

    #[test]
    fn test_malformed_body() {
        let err = decode_chat_response(200, Some(b"not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.message(), "Failed to send message");

        let err = decode(200, json!({ "success": true })).unwrap_err();
        assert_eq!(err.message(), "Failed to send message");
    }
}
