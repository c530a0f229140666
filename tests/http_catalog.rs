//! Integration tests for the HTTP catalog against a mock bridge.
//!
//! Each test starts a wiremock server that answers rosapi-style calls.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rosdesk::catalog::http::HttpCatalog;
use rosdesk::catalog::{Catalog, CatalogError, DescriptorRole, EntityKind};
use rosdesk::core::resolver::{ResolverOptions, SchemaResolver};
use rosdesk::core::schema::FieldKind;
use rosdesk::core::types::TypeName;
use rosdesk::core::value::Value;

fn catalog(server: &MockServer) -> HttpCatalog {
    HttpCatalog::new(server.uri(), Duration::from_secs(5)).unwrap()
}

async fn answer(server: &MockServer, call: &str, args: serde_json::Value, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("/rosapi/{}", call)))
        .and(body_json(args))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn typedef(name: &str, fields: &[(&str, &str, i64)]) -> serde_json::Value {
    json!({
        "type": name,
        "fieldnames": fields.iter().map(|f| f.0).collect::<Vec<_>>(),
        "fieldtypes": fields.iter().map(|f| f.1).collect::<Vec<_>>(),
        "fieldarraylen": fields.iter().map(|f| f.2).collect::<Vec<_>>(),
    })
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_each_kind() {
        let server = MockServer::start().await;
        answer(&server, "topics", json!({}), json!({"topics": ["/a/b", "/c"]})).await;
        answer(&server, "services", json!({}), json!({"services": ["/reset"]})).await;
        answer(&server, "get_param_names", json!({}), json!({"names": ["/rate"]})).await;
        answer(&server, "nodes", json!({}), json!({"nodes": []})).await;

        let catalog = catalog(&server);
        assert_eq!(
            catalog.list_names(EntityKind::Topics).await.unwrap(),
            vec!["/a/b", "/c"]
        );
        assert_eq!(
            catalog.list_names(EntityKind::Services).await.unwrap(),
            vec!["/reset"]
        );
        assert_eq!(
            catalog.list_names(EntityKind::Params).await.unwrap(),
            vec!["/rate"]
        );
        assert!(catalog.list_names(EntityKind::Nodes).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn entity_types() {
        let server = MockServer::start().await;
        answer(
            &server,
            "topic_type",
            json!({"topic": "/odom"}),
            json!({"type": "nav_msgs/Odometry"}),
        )
        .await;
        answer(
            &server,
            "topic_type",
            json!({"topic": "/ghost"}),
            json!({"type": ""}),
        )
        .await;
        answer(
            &server,
            "service_type",
            json!({"service": "/reset"}),
            json!({"type": "std_srvs/Empty"}),
        )
        .await;

        let catalog = catalog(&server);
        assert_eq!(
            catalog
                .entity_type(EntityKind::Topics, "/odom")
                .await
                .unwrap()
                .as_str(),
            "nav_msgs/Odometry"
        );
        assert_eq!(
            catalog
                .entity_type(EntityKind::Services, "/reset")
                .await
                .unwrap()
                .as_str(),
            "std_srvs/Empty"
        );
        assert!(matches!(
            catalog.entity_type(EntityKind::Topics, "/ghost").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.entity_type(EntityKind::Params, "/rate").await,
            Err(CatalogError::NotFound(_))
        ));
    }
}

mod descriptors {
    use super::*;

    #[tokio::test]
    async fn role_selects_call() {
        let server = MockServer::start().await;
        let args = json!({"type": "std_srvs/SetBool"});
        answer(
            &server,
            "service_request_details",
            args.clone(),
            json!({"typedefs": [typedef("std_srvs/SetBoolRequest", &[("data", "bool", -1)])]}),
        )
        .await;
        answer(
            &server,
            "service_response_details",
            args,
            json!({"typedefs": [typedef(
                "std_srvs/SetBoolResponse",
                &[("success", "bool", -1), ("message", "string", -1)],
            )]}),
        )
        .await;

        let catalog = catalog(&server);
        let name = TypeName::new("std_srvs/SetBool").unwrap();

        let request = catalog
            .type_descriptor(&name, DescriptorRole::ServiceRequest)
            .await
            .unwrap();
        assert_eq!(request.fieldnames, vec!["data"]);

        let response = catalog
            .type_descriptor(&name, DescriptorRole::ServiceResponse)
            .await
            .unwrap();
        assert_eq!(response.fieldnames, vec!["success", "message"]);
        assert_eq!(response.fieldarraylen, vec![-1, -1]);
    }

    #[tokio::test]
    async fn empty_typedefs_is_not_found() {
        let server = MockServer::start().await;
        answer(
            &server,
            "message_details",
            json!({"type": "pkg/Missing"}),
            json!({"typedefs": []}),
        )
        .await;

        let catalog = catalog(&server);
        let err = catalog
            .type_descriptor(&TypeName::new("pkg/Missing").unwrap(), DescriptorRole::Message)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolves_nested_types_over_http() {
        let server = MockServer::start().await;
        answer(
            &server,
            "message_details",
            json!({"type": "geometry_msgs/Pose"}),
            json!({"typedefs": [typedef(
                "geometry_msgs/Pose",
                &[("position", "geometry_msgs/Point", -1)],
            )]}),
        )
        .await;
        answer(
            &server,
            "message_details",
            json!({"type": "geometry_msgs/Point"}),
            json!({"typedefs": [typedef(
                "geometry_msgs/Point",
                &[("x", "float64", -1), ("y", "float64", -1), ("z", "float64", -1)],
            )]}),
        )
        .await;

        let catalog = catalog(&server);
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let resolved = resolver
            .resolve(&TypeName::new("geometry_msgs/Pose").unwrap())
            .await
            .unwrap();

        assert_eq!(resolved.fetches, 2);
        let position = &resolved.fields[0];
        assert!(matches!(position.kind, FieldKind::Composite { .. }));
        let names: Vec<_> = position
            .children()
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }
}

mod params {
    use super::*;

    #[tokio::test]
    async fn values_travel_as_json_strings() {
        let server = MockServer::start().await;
        answer(
            &server,
            "get_param",
            json!({"name": "/rate"}),
            json!({"value": "10.5"}),
        )
        .await;
        answer(
            &server,
            "get_param",
            json!({"name": "/frames"}),
            json!({"value": "[\"map\", \"odom\"]"}),
        )
        .await;
        answer(
            &server,
            "set_param",
            json!({"name": "/rate", "value": "12"}),
            json!({}),
        )
        .await;

        let catalog = catalog(&server);
        assert_eq!(
            catalog.get_param("/rate").await.unwrap(),
            Value::Number(10.5)
        );
        assert_eq!(
            catalog.get_param("/frames").await.unwrap(),
            Value::List(vec![Value::from("map"), Value::from("odom")])
        );
        catalog.set_param("/rate", &Value::Number(12.0)).await.unwrap();
    }

    #[tokio::test]
    async fn unset_param_is_not_found() {
        let server = MockServer::start().await;
        answer(&server, "get_param", json!({"name": "/nope"}), json!({"value": ""})).await;

        let catalog = catalog(&server);
        assert!(matches!(
            catalog.get_param("/nope").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejected_set_is_an_error() {
        let server = MockServer::start().await;
        answer(
            &server,
            "set_param",
            json!({"name": "/locked", "value": "1"}),
            json!({"result": false, "values": "parameter is read-only"}),
        )
        .await;

        let err = catalog(&server)
            .set_param("/locked", &Value::Number(1.0))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::Rejected("set_param /locked: parameter is read-only".into())
        );
    }

    #[tokio::test]
    async fn delete_posts_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rosapi/delete_param"))
            .and(body_json(json!({"name": "/rate"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        catalog(&server).delete_param("/rate").await.unwrap();
    }

    #[tokio::test]
    async fn rejected_delete_is_an_error() {
        let server = MockServer::start().await;
        answer(
            &server,
            "delete_param",
            json!({"name": "/ghost"}),
            json!({"result": false, "values": null}),
        )
        .await;

        assert!(matches!(
            catalog(&server).delete_param("/ghost").await,
            Err(CatalogError::Rejected(_))
        ));
    }
}

mod services {
    use super::*;

    #[tokio::test]
    async fn request_posts_to_service_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/arm/set_joints"))
            .and(body_json(json!({"names": ["elbow"], "positions": [0.5]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "moved"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = Value::from(json!({"names": ["elbow"], "positions": [0.5]}));
        let reply = catalog(&server)
            .call_service("/arm/set_joints", &request)
            .await
            .unwrap();
        assert_eq!(reply.get("success"), Some(&Value::Bool(true)));
        assert_eq!(reply.get("message"), Some(&Value::from("moved")));
    }

    #[tokio::test]
    async fn enveloped_reply_is_unwrapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reset"))
            .and(body_json(json!({})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": true, "values": {"count": 3}})),
            )
            .mount(&server)
            .await;

        let reply = catalog(&server)
            .call_service("/reset", &Value::Undefined)
            .await
            .unwrap();
        assert_eq!(reply.get("count"), Some(&Value::Number(3.0)));
    }

    #[tokio::test]
    async fn failed_call_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reset"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": false, "values": "busy"})),
            )
            .mount(&server)
            .await;

        assert_eq!(
            catalog(&server)
                .call_service("/reset", &Value::record([("hard", Value::Bool(true))]))
                .await
                .unwrap_err(),
            CatalogError::Rejected("/reset: busy".into())
        );
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no such service"})))
            .mount(&server)
            .await;

        assert_eq!(
            catalog(&server)
                .call_service("/missing", &Value::Undefined)
                .await
                .unwrap_err(),
            CatalogError::NotFound("no such service".into())
        );
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rosapi/topics"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let err = catalog(&server)
            .list_names(EntityKind::Topics)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::ApiError {
                status: 500,
                message: "bridge error: boom".into()
            }
        );
    }

    #[tokio::test]
    async fn not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rosapi/topic_type"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such topic"})))
            .mount(&server)
            .await;

        let err = catalog(&server)
            .entity_type(EntityKind::Topics, "/x")
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::NotFound("no such topic".into()));
    }

    #[tokio::test]
    async fn slow_bridge_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rosapi/topics"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"topics": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(server.uri(), Duration::from_millis(100)).unwrap();
        let err = catalog.list_names(EntityKind::Topics).await.unwrap_err();
        assert_eq!(err, CatalogError::Timeout(Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rosapi/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = catalog(&server)
            .list_names(EntityKind::Topics)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }
}
