//! Product catalog, size-to-scale policy, and cart handoff records.
//!
//! The shop backend is an external collaborator; this crate only holds the
//! demo records the preview runs against and the pure policy code (geometry
//! tag resolution, size parsing, cart attribute assembly) shared with it.

mod cart;
mod product;
mod scale;

pub use cart::{CartRequest, ENGRAVING_ATTRIBUTE, LIGHT_COLOR_ATTRIBUTE, light_color_label};
pub use product::{Catalog, Product, ProductId, Variant, VariantId, format_price};
pub use scale::{
    DEFAULT_SIZE_CM, SCALE_MAX, SCALE_MIN, extract_size_label, parse_size_cm, scale_for_size,
};
