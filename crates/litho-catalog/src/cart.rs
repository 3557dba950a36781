//! Cart handoff records.
//!
//! The commerce endpoint is fire-and-forget; all the preview owes it is a
//! variant id plus free-form custom attributes.

use litho_shading::LightColor;
use serde::{Deserialize, Serialize};

use crate::product::{Product, ProductId, Variant, VariantId};

pub const ENGRAVING_ATTRIBUTE: &str = "engraving";
pub const LIGHT_COLOR_ATTRIBUTE: &str = "light_color";

/// Shop-facing label for a light color selection.
pub fn light_color_label(color: LightColor) -> &'static str {
    match color {
        LightColor::Warm => "Warmweiß",
        LightColor::Cool => "Kaltweiß",
        LightColor::Multi => "Multicolor",
    }
}

/// One line item handed to the commerce endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartRequest {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
    /// Custom attributes in submission order.
    pub attributes: Vec<(String, String)>,
}

impl CartRequest {
    /// Assembles a line item for the configured variant.
    ///
    /// Engraving text is trimmed and clipped to the product's character
    /// limit; products without engraving never submit the attribute.
    /// Multicolor products always submit "Multicolor" regardless of the
    /// preview's color selection.
    pub fn new(product: &Product, variant: &Variant, engraving: &str, light: LightColor) -> Self {
        let light = if product.multicolor {
            LightColor::Multi
        } else {
            light
        };

        let mut attributes = Vec::with_capacity(2);
        if let Some(limit) = product.engraving_limit {
            let text = engraving.trim();
            if !text.is_empty() {
                attributes.push((
                    ENGRAVING_ATTRIBUTE.to_string(),
                    text.chars().take(limit).collect(),
                ));
            }
        }
        attributes.push((
            LIGHT_COLOR_ATTRIBUTE.to_string(),
            light_color_label(light).to_string(),
        ));

        Self {
            product_id: product.id,
            variant_id: variant.id,
            quantity: 1,
            attributes,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
