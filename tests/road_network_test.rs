//! Road network construction validation

use smart_traffic::simulation::{IntersectionId, RoadId, SimRoadNetwork, TrafficError};

fn id(name: &str) -> IntersectionId {
    IntersectionId::from(name)
}

#[test]
fn test_adding_intersection_twice_is_a_no_op() {
    let mut network = SimRoadNetwork::new();
    network.add_intersection("A");
    network.add_intersection("A");

    assert_eq!(network.intersection_count(), 1);
    assert!(network.contains(&id("A")));
}

#[test]
fn test_road_requires_registered_endpoints() {
    let mut network = SimRoadNetwork::new();
    network.add_intersection("A");

    assert_eq!(
        network.add_road(&id("A"), &id("B"), 3),
        Err(TrafficError::UnknownIntersection(id("B")))
    );
    assert_eq!(
        network.add_road(&id("B"), &id("A"), 3),
        Err(TrafficError::UnknownIntersection(id("B")))
    );
    assert_eq!(network.road_count(), 0);
}

#[test]
fn test_negative_weight_is_rejected() {
    let mut network = SimRoadNetwork::new();
    network.add_intersection("A");
    network.add_intersection("B");

    assert_eq!(
        network.add_road(&id("A"), &id("B"), -1),
        Err(TrafficError::InvalidWeight {
            from: id("A"),
            to: id("B"),
            weight: -1,
        })
    );
    assert_eq!(network.road_count(), 0);
}

#[test]
fn test_edges_from_keeps_insertion_order() {
    let mut network = SimRoadNetwork::new();
    for name in ["A", "B", "C", "D"] {
        network.add_intersection(name);
    }
    network.add_road(&id("A"), &id("C"), 4).unwrap();
    network.add_road(&id("B"), &id("A"), 1).unwrap();
    network.add_road(&id("A"), &id("B"), 2).unwrap();
    network.add_road(&id("A"), &id("D"), 7).unwrap();

    let targets: Vec<&IntersectionId> = network
        .edges_from(&id("A"))
        .into_iter()
        .map(|road| &road.to)
        .collect();

    assert_eq!(targets, vec![&id("C"), &id("B"), &id("D")]);
    assert_eq!(network.edges_from(&id("A"))[0].id, RoadId(0));
}

#[test]
fn test_roads_are_directed() {
    let mut network = SimRoadNetwork::new();
    network.add_intersection("A");
    network.add_intersection("B");
    network.add_road(&id("A"), &id("B"), 5).unwrap();

    assert_eq!(network.edges_from(&id("A")).len(), 1);
    assert!(network.edges_from(&id("B")).is_empty());
    assert!(network.find_road_between(&id("B"), &id("A")).is_none());
}

#[test]
fn test_unknown_intersection_has_no_roads() {
    let network = SimRoadNetwork::new();
    assert!(network.edges_from(&id("ghost")).is_empty());
}

#[test]
fn test_two_way_road_adds_both_directions() {
    let mut network = SimRoadNetwork::new();
    network.add_intersection("A");
    network.add_intersection("B");

    let (forward, backward) = network.add_two_way_road(&id("A"), &id("B"), 6).unwrap();

    assert_eq!(forward, RoadId(0));
    assert_eq!(backward, RoadId(1));
    assert_eq!(network.find_road_between(&id("A"), &id("B")).unwrap().weight, 6);
    assert_eq!(network.find_road_between(&id("B"), &id("A")).unwrap().weight, 6);
}

#[test]
fn test_from_records_stops_at_first_bad_record() {
    let result = SimRoadNetwork::from_records(
        ["A", "B"],
        [(id("A"), id("B"), 1), (id("B"), id("C"), 1)],
    );

    assert_eq!(result.unwrap_err(), TrafficError::UnknownIntersection(id("C")));
}

#[test]
fn test_intersections_in_registration_order() {
    let network = SimRoadNetwork::from_records(
        ["north", "south", "east"],
        Vec::<(IntersectionId, IntersectionId, i64)>::new(),
    )
    .unwrap();

    let names: Vec<&str> = network.intersections().map(IntersectionId::as_str).collect();
    assert_eq!(names, vec!["north", "south", "east"]);
}
