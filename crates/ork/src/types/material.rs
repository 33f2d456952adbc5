use super::{MaterialType, XmlEnum};

/// A named material with its density.
///
/// Units depend on the type: kg/m³ for bulk, kg/m² for surface and kg/m for
/// line materials.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialType,
    pub name: String,
    pub density: f64,
    /// Not found in the material database; defined by the design file.
    pub user_defined: bool,
}

impl Material {
    pub fn new(kind: MaterialType, name: impl Into<String>, density: f64) -> Self {
        Self {
            kind,
            name: name.into(),
            density,
            user_defined: false,
        }
    }

    pub fn default_bulk() -> Self {
        Self::new(MaterialType::Bulk, "Cardboard", 680.0)
    }

    pub fn default_surface() -> Self {
        Self::new(MaterialType::Surface, "Ripstop nylon", 0.067)
    }

    pub fn default_line() -> Self {
        Self::new(MaterialType::Line, "Elastic cord (round 2 mm, 1/16 in)", 0.0018)
    }

    /// Parse the `TYPE|name|density` form used by document preferences.
    pub fn from_storable(value: &str) -> Option<Self> {
        let mut parts = value.splitn(3, '|');
        let kind = MaterialType::from_xml(parts.next()?)?;
        let name = parts.next()?.trim();
        let density: f64 = parts.next()?.trim().parse().ok()?;
        if name.is_empty() || !(density > 0.0) {
            return None;
        }
        let mut material = Self::new(kind, name, density);
        material.user_defined = true;
        Some(material)
    }
}

/// Resolves materials named in a design file against a material database.
pub trait MaterialLookup {
    /// Always produces a material: a database entry when one matches the
    /// name and density, otherwise a user-defined material.
    fn find_material(&self, kind: MaterialType, name: &str, density: f64) -> Material;
}

/// In-memory material database.
#[derive(Debug, Clone, Default)]
pub struct MaterialDatabase {
    materials: Vec<Material>,
}

impl MaterialDatabase {
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    /// A small set of common hobby-rocketry materials.
    pub fn with_defaults() -> Self {
        use MaterialType::*;
        Self::new(vec![
            Material::new(Bulk, "Aluminum", 2700.0),
            Material::new(Bulk, "Balsa", 170.0),
            Material::new(Bulk, "Birch", 670.0),
            Material::new(Bulk, "Cardboard", 680.0),
            Material::new(Bulk, "Fiberglass", 1850.0),
            Material::new(Bulk, "Kraft phenolic", 950.0),
            Material::new(Bulk, "Plywood (birch)", 630.0),
            Material::new(Bulk, "Polycarbonate (Lexan)", 1200.0),
            Material::new(Bulk, "Polystyrene", 1050.0),
            Material::new(Surface, "Mylar", 0.021),
            Material::new(Surface, "Paper (office)", 0.08),
            Material::new(Surface, "Ripstop nylon", 0.067),
            Material::new(Line, "Elastic cord (round 2 mm, 1/16 in)", 0.0018),
            Material::new(Line, "Kevlar thread", 0.0003),
            Material::new(Line, "Tubular nylon (11 mm, 7/16 in)", 0.013),
        ])
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }
}

impl MaterialLookup for MaterialDatabase {
    fn find_material(&self, kind: MaterialType, name: &str, density: f64) -> Material {
        let tolerance = density.abs() * 1e-6;
        self.materials
            .iter()
            .find(|m| m.kind == kind && m.name == name && (m.density - density).abs() <= tolerance)
            .cloned()
            .unwrap_or_else(|| Material {
                kind,
                name: name.to_string(),
                density,
                user_defined: true,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_database_entry() {
        let db = MaterialDatabase::with_defaults();
        let balsa = db.find_material(MaterialType::Bulk, "Balsa", 170.0);
        assert!(!balsa.user_defined);

        let heavy_balsa = db.find_material(MaterialType::Bulk, "Balsa", 200.0);
        assert!(heavy_balsa.user_defined);
        assert_eq!(heavy_balsa.density, 200.0);
    }

    #[test]
    fn storable_form() {
        let m = Material::from_storable("SURFACE|Tyvek|0.05").unwrap();
        assert_eq!(m.kind, MaterialType::Surface);
        assert_eq!(m.name, "Tyvek");
        assert!(Material::from_storable("BULK|Lead|-1").is_none());
        assert!(Material::from_storable("Lead").is_none());
    }
}
