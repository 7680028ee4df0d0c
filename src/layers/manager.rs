use crate::{
    layers::base::{LayerTrait, LayerType},
    prelude::HashMap,
    MapError, Result,
};

/// Keeps the overlays registered on one map backend, in z-order
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs (sorted by z-index, insertion order on ties)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer; IDs must be unique within one backend
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::InvalidState(format!(
                "layer {} is already registered",
                layer_id
            )));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Downcasts a layer to its concrete type
    pub fn get_layer_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.get_layer(layer_id)
            .and_then(|layer| layer.as_any().downcast_ref::<T>())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Gets all layers in z-order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Number of layers of the given type
    pub fn count_of(&self, layer_type: LayerType) -> usize {
        self.layers
            .values()
            .filter(|layer| layer.layer_type() == layer_type)
            .count()
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, LatLngBounds};
    use crate::layers::{image::GroundImageLayer, marker::Marker, tile::TileLayer};

    #[test]
    fn test_layers_are_ordered_by_z_index() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(Marker::new(
                "marker".to_string(),
                LatLng::new(26.2, 92.9),
                "Flood Zone 1",
            )))
            .unwrap();
        manager
            .add_layer(Box::new(TileLayer::openstreetmap(
                "osm".to_string(),
                "OpenStreetMap".to_string(),
            )))
            .unwrap();

        let order: Vec<&str> = manager.layers().iter().map(|l| l.id()).collect();
        assert_eq!(order, vec!["osm", "marker"]);
        assert_eq!(manager.count_of(LayerType::Marker), 1);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut manager = LayerManager::new();
        let bounds = LatLngBounds::from_coords(24.0, 89.0, 28.0, 96.0);
        let make = || {
            Box::new(GroundImageLayer::new(
                "ground".to_string(),
                "img.png".to_string(),
                bounds.clone(),
                0.6,
            ))
        };

        manager.add_layer(make()).unwrap();
        assert!(manager.add_layer(make()).is_err());
        assert_eq!(manager.len(), 1);

        assert!(manager.get_layer_as::<GroundImageLayer>("ground").is_some());
        assert!(manager.remove_layer("ground").is_some());
        assert!(manager.is_empty());
    }
}
