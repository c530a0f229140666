//! catalog::http
//!
//! Catalog implementation over a rosapi-style HTTP/JSON bridge.
//!
//! # Design
//!
//! Every catalog operation is one JSON `POST` to `{endpoint}/rosapi/<call>`
//! with the call's arguments as the request body. Descriptor calls answer with
//! a `typedefs` list whose first entry describes the requested type.
//!
//! The rosapi calls are ordinary services, so calling any other service is the
//! same request against `{endpoint}<service name>`. A bridge may wrap a reply
//! as `{"result": <bool>, "values": <reply>}`; `result: false` becomes
//! [`CatalogError::Rejected`].
//!
//! Each request is bounded by the configured timeout, so a bridge that never
//! answers surfaces as [`CatalogError::Timeout`] rather than a hang. There is
//! no retry.
//!
//! # Example
//!
//! ```ignore
//! use rosdesk::catalog::http::HttpCatalog;
//! use rosdesk::catalog::{Catalog, EntityKind};
//! use std::time::Duration;
//!
//! let catalog = HttpCatalog::new("http://localhost:9090", Duration::from_secs(5))?;
//! let topics = catalog.list_names(EntityKind::Topics).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::traits::{Catalog, CatalogError, DescriptorRole, EntityKind};
use crate::core::schema::TypeDescriptor;
use crate::core::types::TypeName;
use crate::core::value::Value;

/// User-Agent header value for bridge requests.
const USER_AGENT_VALUE: &str = "rosdesk";

/// HTTP catalog client.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    /// HTTP client for making requests
    client: Client,
    /// Bridge base URL, without trailing slash
    endpoint: String,
    /// Per-request timeout
    timeout: Duration,
}

/// Error body returned by the bridge.
#[derive(Debug, Deserialize)]
struct BridgeErrorResponse {
    #[serde(alias = "error")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TopicsResponse {
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ServicesResponse {
    #[serde(default)]
    services: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ParamNamesResponse {
    #[serde(default)]
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NodesResponse {
    #[serde(default)]
    nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TypeResponse {
    #[serde(rename = "type", default)]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    typedefs: Vec<TypeDescriptor>,
}

/// Parameter values travel as JSON-encoded strings.
#[derive(Debug, Serialize, Deserialize)]
struct ParamValue {
    value: String,
}

impl HttpCatalog {
    /// Create a catalog client for the bridge at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// The bridge base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build URL for a rosapi call.
    fn call_url(&self, call: &str) -> String {
        self.service_url(&format!("/rosapi/{}", call))
    }

    /// Build URL for a service by its hierarchical name.
    fn service_url(&self, service: &str) -> String {
        if service.starts_with('/') {
            format!("{}{}", self.endpoint, service)
        } else {
            format!("{}/{}", self.endpoint, service)
        }
    }

    /// POST a rosapi call and decode its response.
    async fn call<T: DeserializeOwned>(
        &self,
        call: &str,
        args: serde_json::Value,
    ) -> Result<T, CatalogError> {
        self.post(self.call_url(call), &args).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: String,
        args: &serde_json::Value,
    ) -> Result<T, CatalogError> {
        tracing::debug!(url = %url, "bridge request");

        let response = self
            .client
            .post(url)
            .json(args)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        self.handle_response(response).await
    }

    /// Unwrap a `{"result", "values"}` envelope if the bridge sent one.
    ///
    /// Any other body is the reply itself.
    fn unwrap_reply(subject: &str, body: serde_json::Value) -> Result<serde_json::Value, CatalogError> {
        let serde_json::Value::Object(mut map) = body else {
            return Ok(body);
        };
        let is_envelope = map.len() == 2
            && map.get("result").is_some_and(serde_json::Value::is_boolean)
            && map.contains_key("values");
        if !is_envelope {
            return Ok(serde_json::Value::Object(map));
        }

        let values = map.remove("values").unwrap_or_default();
        if map.get("result") == Some(&serde_json::Value::Bool(true)) {
            return Ok(values);
        }
        let reason = match values {
            serde_json::Value::String(message) => message,
            serde_json::Value::Null => "no reason given".to_string(),
            other => other.to_string(),
        };
        Err(CatalogError::Rejected(format!("{}: {}", subject, reason)))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> CatalogError {
        if err.is_timeout() {
            CatalogError::Timeout(self.timeout)
        } else {
            CatalogError::NetworkError(err.to_string())
        }
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, CatalogError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout(self.timeout)
                } else {
                    CatalogError::Malformed(format!("failed to parse response: {}", e))
                }
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the bridge.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, CatalogError> {
        let message = match response.json::<BridgeErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::NOT_FOUND => CatalogError::NotFound(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                CatalogError::Timeout(self.timeout)
            }
            _ if status.is_server_error() => CatalogError::ApiError {
                status: status.as_u16(),
                message: format!("bridge error: {}", message),
            },
            _ => CatalogError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }

    fn parse_type_name(raw: String, subject: &str) -> Result<TypeName, CatalogError> {
        // The bridge answers an unknown entity with an empty type.
        if raw.is_empty() {
            return Err(CatalogError::NotFound(subject.to_string()));
        }
        TypeName::new(raw).map_err(|e| CatalogError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list_names(&self, kind: EntityKind) -> Result<Vec<String>, CatalogError> {
        let names = match kind {
            EntityKind::Topics => {
                self.call::<TopicsResponse>("topics", json!({}))
                    .await?
                    .topics
            }
            EntityKind::Services => {
                self.call::<ServicesResponse>("services", json!({}))
                    .await?
                    .services
            }
            EntityKind::Params => {
                self.call::<ParamNamesResponse>("get_param_names", json!({}))
                    .await?
                    .names
            }
            EntityKind::Nodes => self.call::<NodesResponse>("nodes", json!({})).await?.nodes,
        };
        Ok(names)
    }

    async fn entity_type(&self, kind: EntityKind, name: &str) -> Result<TypeName, CatalogError> {
        let response: TypeResponse = match kind {
            EntityKind::Topics => self.call("topic_type", json!({ "topic": name })).await?,
            EntityKind::Services => {
                self.call("service_type", json!({ "service": name }))
                    .await?
            }
            EntityKind::Params | EntityKind::Nodes => {
                return Err(CatalogError::NotFound(format!(
                    "{} have no type: {}",
                    kind, name
                )))
            }
        };
        Self::parse_type_name(response.type_name, name)
    }

    async fn type_descriptor(
        &self,
        type_name: &TypeName,
        role: DescriptorRole,
    ) -> Result<TypeDescriptor, CatalogError> {
        let call = match role {
            DescriptorRole::Message => "message_details",
            DescriptorRole::ServiceRequest => "service_request_details",
            DescriptorRole::ServiceResponse => "service_response_details",
        };

        let response: DetailsResponse = self
            .call(call, json!({ "type": type_name.as_str() }))
            .await?;

        response
            .typedefs
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(format!("type {} ({})", type_name, role)))
    }

    async fn get_param(&self, name: &str) -> Result<Value, CatalogError> {
        let response: ParamValue = self.call("get_param", json!({ "name": name })).await?;

        if response.value.is_empty() {
            return Err(CatalogError::NotFound(format!("param {}", name)));
        }
        serde_json::from_str::<serde_json::Value>(&response.value)
            .map(Value::from)
            .map_err(|e| CatalogError::Malformed(format!("param {}: {}", name, e)))
    }

    async fn set_param(&self, name: &str, value: &Value) -> Result<(), CatalogError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| CatalogError::Malformed(format!("param {}: {}", name, e)))?;

        let body: serde_json::Value = self
            .call("set_param", json!({ "name": name, "value": encoded }))
            .await?;
        Self::unwrap_reply(&format!("set_param {}", name), body)?;
        Ok(())
    }

    async fn delete_param(&self, name: &str) -> Result<(), CatalogError> {
        let body: serde_json::Value = self.call("delete_param", json!({ "name": name })).await?;
        Self::unwrap_reply(&format!("delete_param {}", name), body)?;
        Ok(())
    }

    async fn call_service(&self, name: &str, request: &Value) -> Result<Value, CatalogError> {
        let args = serde_json::Value::from(request.clone());
        // An empty request still travels as an object.
        let args = if args.is_null() { json!({}) } else { args };

        let body: serde_json::Value = self.post(self.service_url(name), &args).await?;
        Self::unwrap_reply(name, body).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let catalog = HttpCatalog::new("http://localhost:9090/", Duration::from_secs(1)).unwrap();
        assert_eq!(catalog.endpoint(), "http://localhost:9090");
        assert_eq!(
            catalog.call_url("topics"),
            "http://localhost:9090/rosapi/topics"
        );
    }

    #[test]
    fn service_urls_follow_names() {
        let catalog = HttpCatalog::new("http://localhost:9090", Duration::from_secs(1)).unwrap();
        assert_eq!(
            catalog.service_url("/arm/home"),
            "http://localhost:9090/arm/home"
        );
        assert_eq!(catalog.service_url("reset"), "http://localhost:9090/reset");
    }

    #[test]
    fn reply_envelopes() {
        assert_eq!(
            HttpCatalog::unwrap_reply("/s", json!({"result": true, "values": {"ok": 1}})).unwrap(),
            json!({"ok": 1})
        );
        assert_eq!(
            HttpCatalog::unwrap_reply("/s", json!({"result": false, "values": "busy"})).unwrap_err(),
            CatalogError::Rejected("/s: busy".into())
        );
        // A reply that merely has a `result` field is not an envelope.
        assert_eq!(
            HttpCatalog::unwrap_reply("/s", json!({"result": false, "code": 3})).unwrap(),
            json!({"result": false, "code": 3})
        );
        assert_eq!(HttpCatalog::unwrap_reply("/s", json!({})).unwrap(), json!({}));
    }

    #[test]
    fn catalog_name() {
        let catalog = HttpCatalog::new("http://localhost:9090", Duration::from_secs(1)).unwrap();
        assert_eq!(catalog.name(), "http");
    }

    #[test]
    fn empty_type_is_not_found() {
        let err = HttpCatalog::parse_type_name(String::new(), "/ghost").unwrap_err();
        assert_eq!(err, CatalogError::NotFound("/ghost".into()));
    }

    #[test]
    fn details_response_takes_typedefs() {
        let json = r#"{"typedefs": [
            {"type": "geometry_msgs/Pose", "fieldnames": ["position"], "fieldtypes": ["geometry_msgs/Point"], "fieldarraylen": [-1]},
            {"type": "geometry_msgs/Point", "fieldnames": ["x"], "fieldtypes": ["float64"], "fieldarraylen": [-1]}
        ]}"#;
        let response: DetailsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.typedefs.len(), 2);
        assert_eq!(response.typedefs[0].type_name, "geometry_msgs/Pose");
    }
}
