// ABOUTME: Layer metadata lookup over the GeoServer REST API
// ABOUTME: Extracts the native lat/lon extent and the ordered style list for a layer

use crate::wms::BoundingBox;
use serde::Deserialize;

/// What the preview needs to know about a layer before its first GetMap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMetadata {
    pub bounds: Option<BoundingBox>,
    /// Default style first, then alternates; duplicates removed
    pub styles: Vec<String>,
}

/// GeoServer serialises one-element lists as a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct LayerEnvelope {
    layer: LayerInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerInfo {
    #[serde(default)]
    default_style: Option<NamedRef>,
    #[serde(default)]
    styles: Option<StyleList>,
    #[serde(default)]
    resource: Option<ResourceRef>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StyleList {
    #[serde(default)]
    style: Option<OneOrMany<NamedRef>>,
}

#[derive(Debug, Deserialize)]
struct ResourceRef {
    #[serde(default)]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceEnvelope {
    #[serde(default)]
    feature_type: Option<ResourceInfo>,
    #[serde(default)]
    coverage: Option<ResourceInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceInfo {
    #[serde(default)]
    lat_lon_bounding_box: Option<LatLonBox>,
}

#[derive(Debug, Deserialize)]
struct LatLonBox {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
}

impl LayerEnvelope {
    pub(crate) fn style_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        if let Some(default) = &self.layer.default_style {
            names.push(default.name.clone());
        }

        if let Some(style) = self
            .layer
            .styles
            .as_ref()
            .and_then(|list| list.style.as_ref())
        {
            let alternates = match style {
                OneOrMany::One(item) => std::slice::from_ref(item),
                OneOrMany::Many(items) => items.as_slice(),
            };
            for alt in alternates {
                if !names.contains(&alt.name) {
                    names.push(alt.name.clone());
                }
            }
        }

        names
    }

    pub(crate) fn resource_href(&self) -> Option<&str> {
        self.layer
            .resource
            .as_ref()
            .and_then(|resource| resource.href.as_deref())
    }
}

impl ResourceEnvelope {
    pub(crate) fn bounds(&self) -> Option<BoundingBox> {
        let info = self.feature_type.as_ref().or(self.coverage.as_ref())?;
        let b = info.lat_lon_bounding_box.as_ref()?;
        if b.minx >= b.maxx || b.miny >= b.maxy {
            return None;
        }
        Some(BoundingBox::new(b.minx, b.miny, b.maxx, b.maxy))
    }
}
