use cutcell::boundary::{BoundaryKind, EmbeddedObject};
use cutcell::config::{Discretization, DiscretizationConfig, MeshConfig};
use cutcell::geometry::GeometryError;
use cutcell::matrix::ApplyPolicy;
use cutcell::mesh::Direction;
use cutcell::operator::OperatorError;
use cutcell::shape::Sphere;
use cutcell::stencil::{IdentityStencil, PolynomialStencil};
use nalgebra::point;

const PLANAR: &str = r#"{
    "mesh": { "extents": [12, 12, 1], "min": [0.0, 0.0, 0.0], "max": [11.0, 11.0, 0.0] },
    "objects": [
        {
            "id": 4,
            "shape": { "type": "sphere", "center": [5.5, 5.5, 0.0], "radius": 2.2 },
            "boundary": "neumann"
        }
    ],
    "domain_boundaries": {
        "x": ["dirichlet", "dirichlet"],
        "y": ["neumann", "floating"],
        "z": ["floating", "floating"]
    }
}"#;

fn has_cause<E: std::error::Error + 'static>(report: &eyre::Report) -> bool {
    report.chain().any(|cause| cause.is::<E>())
}

#[test]
fn planar_config_builds_operators_for_extended_directions() {
    let config: DiscretizationConfig<f64> = serde_json::from_str(PLANAR).unwrap();
    assert_eq!(config.objects.len(), 1);
    assert_eq!(config.objects[0].boundary, BoundaryKind::Neumann);
    assert_eq!(
        config.domain_boundaries.along(Direction::Y),
        [BoundaryKind::Neumann, BoundaryKind::Floating]
    );

    let discretization = Discretization::from_config(&config, &PolynomialStencil::second_order()).unwrap();
    assert_eq!(discretization.mesh().num_points(), 144);
    assert_eq!(discretization.object_boundaries().get(&4), Some(&BoundaryKind::Neumann));
    assert!(discretization.operator(Direction::X).is_some());
    assert!(discretization.operator(Direction::Y).is_some());
    assert!(discretization.operator(Direction::Z).is_none());
    assert!(discretization.geometry().direction(Direction::Z).records().is_empty());

    // Lines at y = 4 to 7 pass through the disk
    let x = discretization.operator(Direction::X).unwrap();
    assert_eq!(x.block().len(), 12 + 4);
    assert_eq!(x.derivatives().nnz(), 8);
}

#[test]
fn config_without_objects_uses_floating_walls() {
    let json = r#"{ "mesh": { "extents": [6, 5, 4], "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0] } }"#;
    let config: DiscretizationConfig<f64> = serde_json::from_str(json).unwrap();
    assert!(config.objects.is_empty());

    let discretization = Discretization::from_config(&config, &IdentityStencil).unwrap();
    let field: Vec<f64> = (0..discretization.mesh().num_points()).map(|i| i as f64).collect();
    for direction in Direction::ALL {
        let operator = discretization.operator(direction).unwrap();
        assert_eq!(operator.values().nnz(), 0);
        assert_eq!(operator.derivatives().nnz(), 0);
        let mut output = vec![0.0; field.len()];
        operator.apply(&field, &mut output, ApplyPolicy::Assign);
        assert_eq!(output, field);
    }
}

#[test]
fn config_serialization_round_trip() {
    let config: DiscretizationConfig<f64> = serde_json::from_str(PLANAR).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: DiscretizationConfig<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn duplicate_object_ids_are_rejected() {
    let sphere = Sphere::from_center_and_radius(point![5.0, 5.0, 5.0], 2.25);
    let config = DiscretizationConfig {
        mesh: MeshConfig {
            extents: [11, 11, 11],
            min: [0.0; 3],
            max: [10.0; 3],
        },
        objects: vec![
            EmbeddedObject::new(1, sphere, BoundaryKind::Dirichlet),
            EmbeddedObject::new(1, sphere, BoundaryKind::Neumann),
        ],
        domain_boundaries: Default::default(),
    };
    let error = Discretization::from_config(&config, &IdentityStencil).unwrap_err();
    assert!(error.to_string().contains("duplicate object id 1"));
}

#[test]
fn invalid_meshes_are_rejected() {
    let mut mesh = MeshConfig {
        extents: [4, 0, 4],
        min: [0.0; 3],
        max: [1.0; 3],
    };
    assert!(mesh.to_mesh().is_err());

    mesh.extents = [4, 4, 4];
    mesh.max[2] = 0.0;
    assert!(mesh.to_mesh().is_err());

    mesh.extents = [4, 4, 1];
    assert!(mesh.to_mesh().is_ok());

    let config = DiscretizationConfig {
        mesh: MeshConfig {
            extents: [0, 4, 4],
            min: [0.0; 3],
            max: [1.0; 3],
        },
        objects: vec![],
        domain_boundaries: Default::default(),
    };
    assert!(Discretization::from_config(&config, &IdentityStencil).is_err());
}

#[test]
fn geometry_errors_are_reported_with_context() {
    let config = DiscretizationConfig {
        mesh: MeshConfig {
            extents: [4, 3, 3],
            min: [0.0; 3],
            max: [3.0, 2.0, 2.0],
        },
        objects: vec![EmbeddedObject::new(
            0,
            Sphere::from_center_and_radius(point![1.5, 1.0, 1.0], 0.3),
            BoundaryKind::Dirichlet,
        )],
        domain_boundaries: Default::default(),
    };
    let error = Discretization::from_config(&config, &IdentityStencil).unwrap_err();
    assert!(has_cause::<GeometryError>(&error));
    assert!(error.to_string().contains("failed to intersect"));
}

#[test]
fn operator_errors_are_reported_with_context() {
    let config = DiscretizationConfig {
        mesh: MeshConfig {
            extents: [2, 6, 6],
            min: [0.0; 3],
            max: [1.0; 3],
        },
        objects: vec![],
        domain_boundaries: Default::default(),
    };
    let error = Discretization::from_config(&config, &PolynomialStencil::second_order()).unwrap_err();
    assert!(has_cause::<OperatorError>(&error));
    assert!(error.to_string().contains("along x"));
}
