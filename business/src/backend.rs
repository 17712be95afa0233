//! Backend endpoints used by the account dialog and the flag controls.

use log::{error, info};
use serde::Serialize;
use serde_json::Value;
use ustr::Ustr;

use crate::http::Client;
use crate::{BusinessConfig, FlagKind, RemoteError};

/// Body of `PUT /userActions/updateEmail`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateEmailRequest {
    pub uid: String,
    #[serde(rename = "newEmail")]
    pub new_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendApi {
    api_url: Ustr,
}

impl BackendApi {
    pub fn new(config: &BusinessConfig) -> Self {
        Self {
            api_url: config.api_url(),
        }
    }

    pub fn api_url(&self) -> Ustr {
        self.api_url
    }

    /// Any 2xx counts as success; the body is ignored.
    pub async fn update_email(&self, uid: &str, new_email: &str) -> Result<(), RemoteError> {
        let url = format!("{}/userActions/updateEmail", self.api_url);
        let body = UpdateEmailRequest {
            uid: uid.to_owned(),
            new_email: new_email.to_owned(),
        };

        let response = Client::put(&url, &body)
            .map_err(|e| RemoteError::Decode(format!("failed to serialize request: {e}")))?
            .send()
            .await?;

        if !response.is_success() {
            error!("update_email: {url} returned status {}", response.status);
            return Err(RemoteError::Status(response.status));
        }

        info!("update_email: email updated for uid {uid}");
        Ok(())
    }

    /// Persist one flag value. Succeeds only when the endpoint answers with a truthy body.
    pub async fn update_flag(&self, kind: FlagKind, id: &str, value: bool) -> Result<(), RemoteError> {
        let url = format!("{}{}", self.api_url, kind.endpoint());
        let mut body = serde_json::Map::new();
        body.insert("id".to_owned(), Value::from(id));
        body.insert(kind.field().to_owned(), Value::from(value));

        let response = Client::post(&url, &body)
            .map_err(|e| RemoteError::Decode(format!("failed to serialize request: {e}")))?
            .send()
            .await?;

        if !response.is_success() {
            return Err(RemoteError::Status(response.status));
        }

        let data: Value = response
            .json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        if is_truthy(&data) {
            Ok(())
        } else {
            Err(RemoteError::Falsy)
        }
    }
}

/// JavaScript truthiness of a decoded JSON body.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
