//! Product and variant records plus the built-in demo catalog.

use litho_mesh::{GeometryError, ProductKind};
use serde::{Deserialize, Serialize};

use crate::scale::{extract_size_label, parse_size_cm, scale_for_size};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Shop-side product identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

/// Shop-side variant identifier (one size of one product).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(pub u32);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One purchasable size of a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    /// Display name, e.g. `"MoonLamp (15cm)"`.
    pub name: String,
    /// Size label, e.g. `"10cm"` or `"15x20cm"`. May be empty; the name is
    /// the fallback source for size parsing.
    pub size: String,
    /// Price in euro cents; records keep integer cents so arithmetic and
    /// comparisons never touch floats.
    pub price_cents: u32,
}

impl Variant {
    /// Size in centimeters parsed from the size label, falling back to the
    /// label embedded in the display name.
    ///
    /// The label takes precedence because names can carry unrelated numbers
    /// ("Windlicht Ø60mm x 10cm" sizes 10 cm, not 60).
    pub fn size_cm(&self) -> u32 {
        if self.size.is_empty() {
            parse_size_cm(extract_size_label(&self.name))
        } else {
            parse_size_cm(&self.size)
        }
    }

    /// Uniform mesh scale factor for this variant's size.
    pub fn scale(&self) -> f32 {
        scale_for_size(self.size_cm())
    }

    pub fn price_label(&self) -> String {
        format_price(self.price_cents)
    }
}

/// A configurable product and its purchasable variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Geometry tag resolved via [`Product::kind`] at rebuild time. Stored
    /// as data so catalog records stay serializable; an unknown tag fails
    /// the rebuild instead of silently previewing the wrong shape.
    pub geometry: String,
    pub bestseller: bool,
    /// Maximum engraving length in characters, `None` if the product cannot
    /// be engraved.
    pub engraving_limit: Option<usize>,
    /// Multicolor products ship with an RGB remote; the preview pins their
    /// light color to [`litho_shading::LightColor::Multi`].
    pub multicolor: bool,
    /// Number of selectable color modes on the physical lamp.
    pub color_count: u8,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Resolves the geometry tag to a builder kind.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedKind`] for tags no builder
    /// handles.
    pub fn kind(&self) -> Result<ProductKind, GeometryError> {
        self.geometry.parse()
    }

    /// Cheapest variant price in cents, `None` for an empty variant list.
    pub fn min_price_cents(&self) -> Option<u32> {
        self.variants.iter().map(|v| v.price_cents).min()
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

/// Formats euro cents as a German price label, e.g. `"49,90 €"`.
pub fn format_price(cents: u32) -> String {
    format!("{},{:02} €", cents / 100, cents % 100)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered product list with id lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The demo catalog used when no shop backend is wired up.
    pub fn demo() -> Self {
        let products = vec![
            Product {
                id: ProductId(7146),
                name: "MoonLamp".to_string(),
                geometry: "sphere".to_string(),
                bestseller: true,
                engraving_limit: Some(30),
                multicolor: true,
                color_count: 16,
                variants: vec![
                    Variant {
                        id: VariantId(71461),
                        name: "MoonLamp (10cm)".to_string(),
                        size: "10cm".to_string(),
                        price_cents: 49_90,
                    },
                    Variant {
                        id: VariantId(71462),
                        name: "MoonLamp (15cm)".to_string(),
                        size: "15cm".to_string(),
                        price_cents: 69_90,
                    },
                    Variant {
                        id: VariantId(71463),
                        name: "MoonLamp (20cm)".to_string(),
                        size: "20cm".to_string(),
                        price_cents: 89_90,
                    },
                ],
            },
            Product {
                id: ProductId(7145),
                name: "Lithophane Gebogen".to_string(),
                geometry: "curved".to_string(),
                bestseller: false,
                engraving_limit: Some(50),
                multicolor: false,
                color_count: 2,
                variants: vec![
                    Variant {
                        id: VariantId(71451),
                        name: "Lithophane Gebogen (15x20cm)".to_string(),
                        size: "15x20cm".to_string(),
                        price_cents: 39_90,
                    },
                    Variant {
                        id: VariantId(71452),
                        name: "Lithophane Gebogen (20x25cm)".to_string(),
                        size: "20x25cm".to_string(),
                        price_cents: 54_90,
                    },
                ],
            },
            Product {
                id: ProductId(7147),
                name: "Windlicht".to_string(),
                geometry: "cylinder".to_string(),
                bestseller: false,
                engraving_limit: None,
                multicolor: false,
                color_count: 2,
                variants: vec![Variant {
                    id: VariantId(71471),
                    name: "Windlicht Lithophane Ø60mm x 10cm".to_string(),
                    size: "10cm".to_string(),
                    price_cents: 21_90,
                }],
            },
        ];
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Finds a variant anywhere in the catalog, with its owning product.
    pub fn variant(&self, id: VariantId) -> Option<(&Product, &Variant)> {
        self.products
            .iter()
            .find_map(|p| p.variant(id).map(|v| (p, v)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
