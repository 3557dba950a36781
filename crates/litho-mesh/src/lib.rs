//! Displaced preview meshes: the four geometry builders and their shared
//! vertex format.

mod cylinder;
mod mesh;
mod normals;
mod panel;
mod sphere;
mod vertex;

pub use cylinder::{CYLINDER_DEPTH, CYLINDER_HEIGHT, CYLINDER_RADIUS, build_cylinder};
pub use mesh::{GeometryError, LithoMesh, ProductKind};
pub use normals::recompute_normals;
pub use panel::{CURVED_CURVATURE, PANEL_DEPTH, build_curved, build_flat};
pub use sphere::{IMAGE_DEPTH, IMAGE_RADIUS, SPHERE_RADIUS, build_sphere};
pub use vertex::{LITHO_VERTEX_ATTRIBUTES, LITHO_VERTEX_LAYOUT, MeshVertex};
