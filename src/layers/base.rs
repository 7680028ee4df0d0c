// LayerTrait is unified with LayerOperations in shared traits
pub use crate::traits::LayerOperations as LayerTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Polygon,
    Marker,
    GroundImage,
    DrawingTools,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Polygon => write!(f, "polygon"),
            LayerType::Marker => write!(f, "marker"),
            LayerType::GroundImage => write!(f, "ground-image"),
            LayerType::DrawingTools => write!(f, "drawing-tools"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
    pub interactive: bool,
    pub options: serde_json::Value,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            interactive: true,
            options: serde_json::Value::Null,
        }
    }
}

/// Layer with no geometry of its own, described entirely by its options
/// (used for control surfaces such as the drawing tools)
pub struct BaseLayer {
    pub properties: LayerProperties,
}

impl BaseLayer {
    pub fn new(properties: LayerProperties) -> Self {
        Self { properties }
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.properties.options = options;
        self
    }
}

impl LayerTrait for BaseLayer {
    crate::impl_layer_trait!(BaseLayer, properties);
    crate::impl_basic_options!(properties);
}
