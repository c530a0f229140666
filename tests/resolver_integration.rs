//! Integration tests for schema resolution against a mock catalog.
//!
//! The fixture mirrors a realistic message family: a path of stamped poses,
//! each with its own header, so the same types appear at several depths.

use rosdesk::catalog::mock::{FailOn, MockCatalog};
use rosdesk::catalog::{CatalogError, DescriptorRole};
use rosdesk::core::resolver::{ResolveError, ResolverOptions, SchemaResolver};
use rosdesk::core::schema::{Arity, FieldKind, FieldSchema};
use rosdesk::core::types::{ScalarTag, TypeName};

fn nav_catalog() -> MockCatalog {
    MockCatalog::new()
        .with_type(
            "nav_msgs/Path",
            &[
                ("header", "std_msgs/Header", -1),
                ("poses", "geometry_msgs/PoseStamped", 0),
            ],
        )
        .with_type(
            "std_msgs/Header",
            &[
                ("seq", "uint32", -1),
                ("stamp", "time", -1),
                ("frame_id", "string", -1),
            ],
        )
        .with_type(
            "geometry_msgs/PoseStamped",
            &[
                ("header", "std_msgs/Header", -1),
                ("pose", "geometry_msgs/Pose", -1),
            ],
        )
        .with_type(
            "geometry_msgs/Pose",
            &[
                ("position", "geometry_msgs/Point", -1),
                ("orientation", "geometry_msgs/Quaternion", -1),
            ],
        )
        .with_type(
            "geometry_msgs/Point",
            &[("x", "float64", -1), ("y", "float64", -1), ("z", "float64", -1)],
        )
        .with_type(
            "geometry_msgs/Quaternion",
            &[
                ("x", "float64", -1),
                ("y", "float64", -1),
                ("z", "float64", -1),
                ("w", "float64", -1),
            ],
        )
}

fn type_name(name: &str) -> TypeName {
    TypeName::new(name).unwrap()
}

fn field<'a>(fields: &'a [FieldSchema], name: &str) -> &'a FieldSchema {
    fields
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("no field {}", name))
}

mod structure {
    use super::*;

    #[tokio::test]
    async fn path_resolves_completely() {
        let catalog = nav_catalog();
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let resolved = resolver.resolve(&type_name("nav_msgs/Path")).await.unwrap();

        assert_eq!(resolved.root.as_str(), "nav_msgs/Path");
        assert_eq!(resolved.role, DescriptorRole::Message);

        let header = field(&resolved.fields, "header");
        let header_fields = header.children().unwrap();
        assert_eq!(
            header_fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["seq", "stamp", "frame_id"]
        );
        assert_eq!(field(header_fields, "stamp").kind, FieldKind::Time);
        assert_eq!(
            field(header_fields, "seq").kind,
            FieldKind::Primitive {
                tag: ScalarTag::Uint32
            }
        );

        let poses = field(&resolved.fields, "poses");
        assert_eq!(poses.arity, Arity::Variable);
        assert_eq!(poses.display_type(), "geometry_msgs/PoseStamped[]");

        let pose = field(poses.children().unwrap(), "pose");
        let orientation = field(pose.children().unwrap(), "orientation");
        assert_eq!(orientation.children().unwrap().len(), 4);
        assert!(!orientation.is_array());
    }

    #[tokio::test]
    async fn fixed_length_arrays_stay_scalar() {
        let catalog = MockCatalog::new().with_type(
            "demo_msgs/Covariance",
            &[("values", "float64", 36), ("labels", "string", 0)],
        );
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let resolved = resolver
            .resolve(&type_name("demo_msgs/Covariance"))
            .await
            .unwrap();

        let values = field(&resolved.fields, "values");
        assert_eq!(values.arity, Arity::Fixed(36));
        assert!(!values.is_array());
        assert_eq!(values.display_type(), "float64");

        assert!(field(&resolved.fields, "labels").is_array());
    }
}

mod fetching {
    use super::*;

    #[tokio::test]
    async fn depth_first_without_cache() {
        let catalog = nav_catalog();
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let resolved = resolver.resolve(&type_name("nav_msgs/Path")).await.unwrap();

        assert_eq!(
            catalog.descriptor_fetches(),
            vec![
                "nav_msgs/Path",
                "std_msgs/Header",
                "geometry_msgs/PoseStamped",
                "std_msgs/Header",
                "geometry_msgs/Pose",
                "geometry_msgs/Point",
                "geometry_msgs/Quaternion",
            ]
        );
        assert_eq!(resolved.fetches, 7);
    }

    #[tokio::test]
    async fn cache_fetches_each_type_once() {
        let catalog = nav_catalog();
        let options = ResolverOptions {
            cache_descriptors: true,
            ..ResolverOptions::default()
        };
        let resolver = SchemaResolver::new(&catalog, options);

        let first = resolver.resolve(&type_name("nav_msgs/Path")).await.unwrap();
        assert_eq!(first.fetches, 6);

        let second = resolver.resolve(&type_name("nav_msgs/Path")).await.unwrap();
        assert_eq!(second.fetches, 0);
        assert_eq!(first.fields, second.fields);
        assert_eq!(catalog.descriptor_fetches().len(), 6);
    }

    #[tokio::test]
    async fn cached_and_uncached_agree() {
        let catalog = nav_catalog();
        let plain = SchemaResolver::new(&catalog, ResolverOptions::default())
            .resolve(&type_name("nav_msgs/Path"))
            .await
            .unwrap();
        let cached = SchemaResolver::new(
            &catalog,
            ResolverOptions {
                cache_descriptors: true,
                ..ResolverOptions::default()
            },
        )
        .resolve(&type_name("nav_msgs/Path"))
        .await
        .unwrap();
        assert_eq!(plain.fields, cached.fields);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn nested_fetch_failure_names_the_type() {
        let catalog = nav_catalog().fail_on(FailOn::Descriptor(
            "geometry_msgs/Quaternion".into(),
            CatalogError::NetworkError("bridge went away".into()),
        ));
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let err = resolver
            .resolve(&type_name("nav_msgs/Path"))
            .await
            .unwrap_err();

        match err {
            ResolveError::Fetch { type_name, source } => {
                assert_eq!(type_name, "geometry_msgs/Quaternion");
                assert_eq!(source, CatalogError::NetworkError("bridge went away".into()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn unknown_nested_type() {
        let catalog = MockCatalog::new().with_type("demo_msgs/Wrapper", &[("inner", "demo_msgs/Gone", -1)]);
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let err = resolver
            .resolve(&type_name("demo_msgs/Wrapper"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Fetch {
                source: CatalogError::NotFound(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn recursive_array_type_is_a_cycle() {
        let catalog = MockCatalog::new().with_type(
            "demo_msgs/Tree",
            &[("label", "string", -1), ("children", "demo_msgs/Tree", 0)],
        );
        let resolver = SchemaResolver::new(&catalog, ResolverOptions::default());
        let err = resolver
            .resolve(&type_name("demo_msgs/Tree"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "type cycle: demo_msgs/Tree -> demo_msgs/Tree");
    }

    #[tokio::test]
    async fn shallow_depth_limit() {
        let catalog = nav_catalog();
        let options = ResolverOptions {
            max_depth: 2,
            ..ResolverOptions::default()
        };
        let resolver = SchemaResolver::new(&catalog, options);
        let err = resolver
            .resolve(&type_name("nav_msgs/Path"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::DepthExceeded { max_depth: 2, .. }));
    }
}
