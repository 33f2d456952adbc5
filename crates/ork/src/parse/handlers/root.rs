use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::{Attributes, LoadContext};
use crate::types::ExtensionConfig;
use crate::{OrkError, Result};

use super::component::ComponentParameterHandler;
use super::datatypes::DatatypesHandler;
use super::entries::{DocMaterialsHandler, EntryReader};
use super::simulation::SimulationsHandler;

/// Oldest and newest supported file format, as `major * 100 + minor`.
const SUPPORTED_VERSIONS: std::ops::RangeInclusive<u32> = 100..=110;

/// Motor digests written by earlier versions are unreliable.
pub(crate) const FIRST_VERSION_WITH_MOTOR_DIGEST: u32 = 104;

/// Handles the document element.
#[derive(Default)]
pub(crate) struct DocumentHandler {
    document: bool,
    rocket: bool,
    fatal: Option<OrkError>,
}

impl DocumentHandler {
    /// Fail on what made the document unusable.
    pub fn finish(self) -> Result<()> {
        if let Some(err) = self.fatal {
            return Err(err);
        }
        if !self.document {
            return Err(OrkError::MissingDocument("openrocket"));
        }
        if !self.rocket {
            return Err(OrkError::MissingDocument("rocket"));
        }
        Ok(())
    }
}

fn parse_version(version: &str) -> Option<u32> {
    let (major, minor) = version.trim().split_once('.')?;
    let major: u32 = major.parse().ok()?;
    let minor: u32 = minor.parse().ok()?;
    (minor < 100).then_some(major * 100 + minor)
}

impl ElementHandler for DocumentHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        if element != "openrocket" {
            cx.warn(format!("Unknown document element '{element}', ignoring."));
            return Open::Skip;
        }
        if self.document {
            cx.warn("Multiple document elements, ignoring subsequent ones.");
            return Open::Skip;
        }
        self.document = true;

        let creator = attrs.get("creator").unwrap_or("an unknown program");
        match attrs.get("version") {
            Some(text) => {
                let version = parse_version(text);
                match version {
                    Some(v) if SUPPORTED_VERSIONS.contains(&v) => {
                        log::debug!("file format version {text} written by {creator}");
                    }
                    _ if cx.env.options.strict_version => {
                        self.fatal = Some(OrkError::UnsupportedVersion(text.to_string()));
                        return Open::Skip;
                    }
                    _ => cx.warn(format!(
                        "Unsupported file version {text} (created by {creator}), \
                         attempting to read file anyway."
                    )),
                }
                cx.file_version = version.unwrap_or(0);
            }
            None if cx.env.options.strict_version => {
                self.fatal = Some(OrkError::UnsupportedVersion(String::new()));
                return Open::Skip;
            }
            None => cx.warn(format!(
                "Missing file version (created by {creator}), attempting to read file anyway."
            )),
        }
        cx.doc.file_version = cx.file_version;
        Open::Delegate(Box::<ContentHandler>::default())
    }

    fn close_element(
        &mut self,
        _cx: &mut LoadContext<'_>,
        _element: &str,
        _attrs: &Attributes,
        _content: &str,
        built: Built,
    ) -> Result<()> {
        if let Built::Document { rocket } = built {
            self.rocket = rocket;
        }
        Ok(())
    }
}

/// Dispatches the sections of the document.
#[derive(Default)]
struct ContentHandler {
    seen: Vec<&'static str>,
}

impl ContentHandler {
    /// Remember a single-instance section; false if it was seen before.
    fn first(&mut self, cx: &mut LoadContext<'_>, section: &'static str) -> bool {
        if self.seen.contains(&section) {
            cx.warn(format!(
                "Multiple <{section}> sections within one document, ignoring subsequent ones."
            ));
            return false;
        }
        self.seen.push(section);
        true
    }
}

impl ElementHandler for ContentHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        log::debug!("section <{element}>");
        let section: &'static str = match element {
            "rocket" => "rocket",
            "datatypes" => "datatypes",
            "simulations" => "simulations",
            "photostudio" => "photostudio",
            "docprefs" => "docprefs",
            _ => return unknown_element(cx, element),
        };
        if !self.first(cx, section) {
            return Open::Skip;
        }
        match section {
            "rocket" => {
                let root = cx.doc.rocket.root();
                Open::Delegate(Box::new(ComponentParameterHandler::new(cx, root)))
            }
            "datatypes" => Open::Delegate(Box::new(DatatypesHandler)),
            "simulations" => Open::Delegate(Box::new(SimulationsHandler)),
            "photostudio" => Open::Delegate(Box::new(PhotoStudioHandler)),
            _ => Open::Delegate(Box::<DocPrefsHandler>::default()),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        warn_unexpected_text(cx, element, content);
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::Document {
            rocket: self.seen.contains(&"rocket"),
        })
    }
}

/// Settings of the 3D photo view, kept as opaque key/value text.
struct PhotoStudioHandler;

impl ElementHandler for PhotoStudioHandler {
    fn open_element(&mut self, _cx: &mut LoadContext<'_>, _element: &str, _attrs: &Attributes) -> Open {
        Open::PlainText
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        cx.doc
            .photo_settings
            .insert(element.to_string(), content.to_string());
        Ok(())
    }
}

/// Document preferences: typed `<pref>` entries and document materials.
#[derive(Default)]
struct DocPrefsHandler {
    entries: EntryReader,
}

impl ElementHandler for DocPrefsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        match element {
            "pref" | "entry" => self.entries.open(cx, attrs),
            "docmaterials" => Open::Delegate(Box::<DocMaterialsHandler>::default()),
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
        match (element, built) {
            ("docmaterials", Built::Materials(materials)) => {
                cx.doc.preferences.materials.extend(materials);
            }
            ("pref" | "entry", built) => self.entries.close(cx, attrs, content, built),
            _ => {}
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let entries: ExtensionConfig = self.entries.finish();
        log::debug!("{} document preferences", entries.len());
        cx.doc.preferences.entries.extend(entries);
        Ok(Built::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions() {
        assert_eq!(parse_version("1.0"), Some(100));
        assert_eq!(parse_version("1.10"), Some(110));
        assert_eq!(parse_version("1.9"), Some(109));
        assert_eq!(parse_version("2"), None);
        assert_eq!(parse_version("one.two"), None);
        assert!(!SUPPORTED_VERSIONS.contains(&parse_version("1.11").unwrap()));
    }
}
