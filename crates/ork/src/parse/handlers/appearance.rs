//! Rendering appearance of component surfaces.
//!
//! ```xml
//! <appearance>
//!   <paint red="200" green="30" blue="30" alpha="255"/>
//!   <shine>0.4</shine>
//!   <decal name="decals/logo.png" rotation="0.0" edgemode="sticker">
//!     <center x="0.5" y="0.5"/><offset x="0" y="0"/><scale x="1" y="1"/>
//!   </decal>
//! </appearance>
//! ```

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::values::{parse_color, parse_double};
use crate::parse::{Attributes, LoadContext};
use crate::types::{Appearance, ComponentIndex, Decal, EdgeMode, InsideAppearance, Vec2, XmlEnum};
use crate::units::clamp_fraction;

use super::{boolean, number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Outside,
    Inside,
}

/// `<appearance>` and `<insideappearance>`; committed when the element
/// closes.
pub(crate) struct AppearanceHandler {
    index: ComponentIndex,
    surface: Surface,
    appearance: Appearance,
    edges_same_as_inside: bool,
    inside_same_as_outside: bool,
}

impl AppearanceHandler {
    fn new(index: ComponentIndex, surface: Surface) -> Self {
        Self {
            index,
            surface,
            appearance: Appearance::default(),
            edges_same_as_inside: false,
            inside_same_as_outside: false,
        }
    }

    pub fn outside(index: ComponentIndex) -> Self {
        Self::new(index, Surface::Outside)
    }

    pub fn inside(index: ComponentIndex) -> Self {
        Self::new(index, Surface::Inside)
    }
}

impl ElementHandler for AppearanceHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element.to_ascii_lowercase().as_str() {
            "paint" | "shine" => Open::PlainText,
            "decal" => Open::Delegate(Box::<DecalHandler>::default()),
            "edgessameasinside" | "edgesuseinsideappearance" | "insidesameasoutside"
            | "useinsideappearance"
                if self.surface == Surface::Inside =>
            {
                Open::PlainText
            }
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        match (element.to_ascii_lowercase().as_str(), built) {
            ("paint", _) => {
                warn_unexpected_text(cx, element, content);
                if let Some(color) = parse_color(attrs, &mut cx.warnings) {
                    self.appearance.paint = color;
                }
            }
            ("shine", _) => {
                if let Some(shine) = number(cx, content) {
                    self.appearance.shine = clamp_fraction(shine);
                }
            }
            ("decal", Built::Decal(decal)) => self.appearance.decal = Some(decal),
            ("edgessameasinside" | "edgesuseinsideappearance", _) => {
                if let Some(value) = boolean(cx, content) {
                    self.edges_same_as_inside = value;
                }
            }
            ("insidesameasoutside", _) => {
                if let Some(value) = boolean(cx, content) {
                    self.inside_same_as_outside = value;
                }
            }
            // Older files store the opposite flag.
            ("useinsideappearance", _) => {
                if let Some(value) = boolean(cx, content) {
                    self.inside_same_as_outside = !value;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let component = cx.component_mut(self.index);
        match self.surface {
            Surface::Outside => component.appearance = Some(self.appearance),
            Surface::Inside => {
                let inside = InsideAppearance {
                    appearance: self.appearance,
                    edges_same_as_inside: self.edges_same_as_inside,
                    inside_same_as_outside: self.inside_same_as_outside,
                };
                if component.set_inside_appearance(inside).is_none() {
                    let kind = component.kind();
                    cx.warn(format!(
                        "{} has no inside surface, ignoring its inside appearance.",
                        kind.display_name()
                    ));
                }
            }
        }
        Ok(Built::Nothing)
    }
}

#[derive(Default)]
struct DecalHandler {
    center: Option<Vec2>,
    offset: Option<Vec2>,
    scale: Option<Vec2>,
}

fn point(cx: &mut LoadContext<'_>, attrs: &Attributes) -> Option<Vec2> {
    let x = attrs.get("x").and_then(parse_double);
    let y = attrs.get("y").and_then(parse_double);
    match (x, y) {
        (Some(x), Some(y)) => Some(Vec2::new(x, y)),
        _ => {
            cx.warn("Illegal decal coordinates, ignoring.");
            None
        }
    }
}

impl ElementHandler for DecalHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "center" | "offset" | "scale" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        warn_unexpected_text(cx, element, content);
        let value = point(cx, attrs);
        match element {
            "center" => self.center = value.or(self.center),
            "offset" => self.offset = value.or(self.offset),
            "scale" => self.scale = value.or(self.scale),
            _ => {}
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let Some(image) = attrs.get("name").filter(|name| !name.is_empty()) else {
            cx.warn("Decal without an image, ignoring.");
            return Ok(Built::Nothing);
        };
        let mut decal = Decal::new(image);
        if let Some(rotation) = attrs.get("rotation") {
            match parse_double(rotation) {
                Some(rotation) => decal.rotation = rotation,
                None => cx.warn(format!("Illegal decal rotation '{rotation}', ignoring.")),
            }
        }
        if let Some(mode) = attrs.get("edgemode") {
            match EdgeMode::from_xml(mode) {
                Some(mode) => decal.edge_mode = mode,
                None => cx.warn(format!("Unknown decal edge mode '{mode}', ignoring.")),
            }
        }
        decal.center = self.center.unwrap_or(decal.center);
        decal.offset = self.offset.unwrap_or(decal.offset);
        decal.scale = self.scale.unwrap_or(decal.scale);
        Ok(Built::Decal(decal))
    }
}
