#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map overlay layers for campus, stations, and evacuation routes.
//!
//! Builds the data a map renderer needs (points as `(name, lat, lon)`,
//! paths as ordered coordinate sequences, plus per-layer styling) and
//! exports it as a `GeoJSON` `FeatureCollection`. Rendering itself is left
//! to whatever consumes the `GeoJSON`.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use iridm_geography_models::{Campus, CampusLocation, Coordinate, Station};
use serde_json::json;

/// Initial zoom level for the campus view.
pub const DEFAULT_ZOOM: f64 = 16.0;

/// Initial camera pitch in degrees.
pub const DEFAULT_PITCH: f64 = 45.0;

/// Initial camera position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Camera centre.
    pub center: Coordinate,
    /// Zoom level.
    pub zoom: f64,
    /// Pitch in degrees.
    pub pitch: f64,
}

impl ViewState {
    /// A view centred on `center` with the default zoom and pitch.
    #[must_use]
    pub const fn centered_on(center: Coordinate) -> Self {
        Self {
            center,
            zoom: DEFAULT_ZOOM,
            pitch: DEFAULT_PITCH,
        }
    }
}

/// The kinds of layer drawn on the campus map, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Fire stations (red).
    Stations,
    /// Reportable campus locations (blue).
    CampusLocations,
    /// Extinguishers at the selected location (green).
    Extinguishers,
    /// Evacuation route for the selected location (orange).
    EvacuationPath,
}

impl LayerKind {
    /// Identifier written to each feature's `layer` property.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Stations => "stations",
            Self::CampusLocations => "campus_locations",
            Self::Extinguishers => "extinguishers",
            Self::EvacuationPath => "evacuation_path",
        }
    }

    /// RGBA colour.
    #[must_use]
    pub const fn color(self) -> [u8; 4] {
        match self {
            Self::Stations => [255, 0, 0, 160],
            Self::CampusLocations => [0, 128, 255, 160],
            Self::Extinguishers => [0, 255, 0, 200],
            Self::EvacuationPath => [255, 165, 0, 255],
        }
    }

    /// Marker radius in metres for point layers, line width in pixels for
    /// the path layer.
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Stations => 150,
            Self::CampusLocations => 100,
            Self::Extinguishers => 50,
            Self::EvacuationPath => 4,
        }
    }
}

/// A named point on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    /// Label, if the point has one (extinguishers do not).
    pub name: Option<String>,
    /// Position.
    pub coordinate: Coordinate,
    /// Phone number, for stations.
    pub phone: Option<String>,
}

/// Geometry carried by a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    /// Independent points.
    Points(Vec<MapPoint>),
    /// One ordered poly-line.
    Path(Vec<Coordinate>),
}

/// One styled map layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// What the layer shows; determines styling.
    pub kind: LayerKind,
    /// Layer geometry.
    pub data: LayerData,
}

/// Everything a renderer needs to draw the campus map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOverlay {
    /// Initial camera.
    pub view: ViewState,
    /// Layers, bottom to top.
    pub layers: Vec<Layer>,
}

impl MapOverlay {
    /// Builds the overlay for the campus and station set.
    ///
    /// Station and campus layers are always present. When a location is
    /// selected its extinguishers are added, and its evacuation path when
    /// `highlight_evac` is set and the path has at least two waypoints.
    #[must_use]
    pub fn build(
        campus: &Campus,
        stations: &[Station],
        selected: Option<&CampusLocation>,
        highlight_evac: bool,
    ) -> Self {
        let mut layers = vec![
            Layer {
                kind: LayerKind::Stations,
                data: LayerData::Points(
                    stations
                        .iter()
                        .map(|s| MapPoint {
                            name: Some(s.name.clone()),
                            coordinate: s.coordinate(),
                            phone: Some(s.phone.clone()),
                        })
                        .collect(),
                ),
            },
            Layer {
                kind: LayerKind::CampusLocations,
                data: LayerData::Points(
                    campus
                        .locations
                        .iter()
                        .map(|loc| MapPoint {
                            name: Some(loc.name.clone()),
                            coordinate: loc.coordinate(),
                            phone: None,
                        })
                        .collect(),
                ),
            },
        ];

        if let Some(location) = selected {
            if !location.extinguishers.is_empty() {
                layers.push(Layer {
                    kind: LayerKind::Extinguishers,
                    data: LayerData::Points(
                        location
                            .extinguishers
                            .iter()
                            .map(|&coordinate| MapPoint {
                                name: None,
                                coordinate,
                                phone: None,
                            })
                            .collect(),
                    ),
                });
            }

            if highlight_evac && location.evac_path.len() >= 2 {
                layers.push(Layer {
                    kind: LayerKind::EvacuationPath,
                    data: LayerData::Path(location.evac_path.clone()),
                });
            }
        }

        Self {
            view: ViewState::centered_on(campus.center),
            layers,
        }
    }

    /// Returns the layer of the given kind, if present.
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    /// Converts the overlay to a `GeoJSON` `FeatureCollection`.
    ///
    /// Each feature carries `layer`, `color` and `radius`/`width`
    /// properties; the view state is stored as the `view_state` foreign
    /// member.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .layers
            .iter()
            .flat_map(|layer| match &layer.data {
                LayerData::Points(points) => points
                    .iter()
                    .map(|p| point_feature(layer.kind, p))
                    .collect::<Vec<_>>(),
                LayerData::Path(path) => vec![path_feature(layer.kind, path)],
            })
            .collect();

        let mut foreign = JsonObject::new();
        foreign.insert(
            "view_state".to_string(),
            json!({
                "latitude": self.view.center.latitude,
                "longitude": self.view.center.longitude,
                "zoom": self.view.zoom,
                "pitch": self.view.pitch,
            }),
        );

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign),
        }
    }

    /// Serializes the overlay as a `GeoJSON` string.
    #[must_use]
    pub fn to_geojson_string(&self) -> String {
        GeoJson::FeatureCollection(self.to_feature_collection()).to_string()
    }
}

fn style_properties(kind: LayerKind) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("layer".to_string(), json!(kind.id()));
    props.insert("color".to_string(), json!(kind.color()));
    let size_key = match kind {
        LayerKind::EvacuationPath => "width",
        _ => "radius",
    };
    props.insert(size_key.to_string(), json!(kind.size()));
    props
}

fn point_feature(kind: LayerKind, point: &MapPoint) -> Feature {
    let mut props = style_properties(kind);
    if let Some(name) = &point.name {
        props.insert("name".to_string(), json!(name));
    }
    if let Some(phone) = &point.phone {
        props.insert("phone".to_string(), json!(phone));
    }

    let geo_point = geo::Point::new(point.coordinate.longitude, point.coordinate.latitude);
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&geo_point))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn path_feature(kind: LayerKind, path: &[Coordinate]) -> Feature {
    let line: geo::LineString<f64> = path
        .iter()
        .map(|c| geo::coord! { x: c.longitude, y: c.latitude })
        .collect();

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&line))),
        id: None,
        properties: Some(style_properties(kind)),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus() -> Campus {
        Campus {
            name: "Test".to_string(),
            center: Coordinate::new(12.9076, 77.4329),
            locations: vec![CampusLocation {
                name: "Admin Block".to_string(),
                latitude: 12.9079,
                longitude: 77.4332,
                evac_path: vec![
                    Coordinate::new(12.9080, 77.4330),
                    Coordinate::new(12.9082, 77.4324),
                    Coordinate::new(12.9076, 77.4321),
                ],
                extinguishers: vec![Coordinate::new(12.90795, 77.43305)],
            }],
        }
    }

    fn stations() -> Vec<Station> {
        vec![Station::new("Kengeri", 12.9133, 77.4488, "+918022851049")]
    }

    #[test]
    fn base_layers_without_selection() {
        let overlay = MapOverlay::build(&campus(), &stations(), None, true);
        assert_eq!(overlay.layers.len(), 2);
        assert!(overlay.layer(LayerKind::Stations).is_some());
        assert!(overlay.layer(LayerKind::CampusLocations).is_some());
        assert!(overlay.layer(LayerKind::EvacuationPath).is_none());
        assert_eq!(overlay.view.center, Coordinate::new(12.9076, 77.4329));
        assert!((overlay.view.zoom - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn selected_location_adds_overlays() {
        let campus = campus();
        let admin = campus.location("Admin Block");
        let overlay = MapOverlay::build(&campus, &stations(), admin, true);

        let kinds: Vec<LayerKind> = overlay.layers.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LayerKind::Stations,
                LayerKind::CampusLocations,
                LayerKind::Extinguishers,
                LayerKind::EvacuationPath,
            ]
        );

        match &overlay.layer(LayerKind::EvacuationPath).unwrap().data {
            LayerData::Path(path) => assert_eq!(path.len(), 3),
            LayerData::Points(_) => panic!("evacuation layer should be a path"),
        }

        let without_evac = MapOverlay::build(&campus, &stations(), admin, false);
        assert!(without_evac.layer(LayerKind::EvacuationPath).is_none());
        assert!(without_evac.layer(LayerKind::Extinguishers).is_some());
    }

    #[test]
    fn geojson_uses_lon_lat_order_and_layer_properties() {
        let campus = campus();
        let overlay = MapOverlay::build(&campus, &stations(), campus.location("Admin Block"), true);
        let value: serde_json::Value = serde_json::from_str(&overlay.to_geojson_string()).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        // 1 station + 1 location + 1 extinguisher + 1 path
        assert_eq!(features.len(), 4);

        let station = &features[0];
        assert_eq!(station["properties"]["layer"], "stations");
        assert_eq!(station["properties"]["phone"], "+918022851049");
        assert_eq!(station["properties"]["radius"], 150);
        let coords = station["geometry"]["coordinates"].as_array().unwrap();
        assert!((coords[0].as_f64().unwrap() - 77.4488).abs() < 1e-9);
        assert!((coords[1].as_f64().unwrap() - 12.9133).abs() < 1e-9);

        let path = &features[3];
        assert_eq!(path["geometry"]["type"], "LineString");
        assert_eq!(path["properties"]["width"], 4);
        assert_eq!(path["geometry"]["coordinates"].as_array().unwrap().len(), 3);

        assert_eq!(value["view_state"]["pitch"], 45.0);
    }
}
