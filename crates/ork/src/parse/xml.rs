//! Drives the handler stack from a quick-xml event stream.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::{OrkError, Result};

use super::handler::{Built, ElementHandler, Open};
use super::{Attributes, LoadContext};

enum Token {
    Open {
        name: String,
        attrs: Attributes,
        empty: bool,
    },
    Text(String),
    Close,
    Eof,
}

pub(crate) struct TokenSource<'x> {
    reader: Reader<&'x [u8]>,
    open: Vec<String>,
}

impl<'x> TokenSource<'x> {
    pub fn new(xml: &'x str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        Self {
            reader,
            open: Vec::new(),
        }
    }

    /// Feed every top-level element to `root`.
    pub fn run(&mut self, root: &mut dyn ElementHandler, cx: &mut LoadContext<'_>) -> Result<()> {
        loop {
            match self.next()? {
                Token::Open { name, attrs, empty } => {
                    self.dispatch(root, cx, &name, attrs, empty)?
                }
                Token::Text(_) | Token::Close => {}
                Token::Eof => return Ok(()),
            }
        }
    }

    fn dispatch(
        &mut self,
        parent: &mut dyn ElementHandler,
        cx: &mut LoadContext<'_>,
        name: &str,
        attrs: Attributes,
        empty: bool,
    ) -> Result<()> {
        log::trace!("<{name}>");
        match parent.open_element(cx, name, &attrs) {
            Open::Delegate(mut child) => {
                let content = if empty {
                    String::new()
                } else {
                    self.children(child.as_mut(), cx)?
                };
                let built = child.end_handler(cx, &attrs, &content)?;
                parent.close_element(cx, name, &attrs, &content, built)
            }
            Open::PlainText => {
                let content = if empty {
                    String::new()
                } else {
                    self.plain_text(cx)?
                };
                parent.close_element(cx, name, &attrs, &content, Built::Nothing)
            }
            Open::Skip => {
                if !empty {
                    self.skip()?;
                }
                Ok(())
            }
        }
    }

    /// Hand every child of the current element to `handler`; returns the
    /// element's own trimmed text.
    fn children(&mut self, handler: &mut dyn ElementHandler, cx: &mut LoadContext<'_>) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Token::Open { name, attrs, empty } => {
                    self.dispatch(handler, cx, &name, attrs, empty)?
                }
                Token::Text(t) => text.push_str(&t),
                Token::Close => return Ok(text.trim().to_string()),
                Token::Eof => return Err(self.eof()),
            }
        }
    }

    fn plain_text(&mut self, cx: &mut LoadContext<'_>) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Token::Open { name, empty, .. } => {
                    cx.warn(format!("Unknown element '{name}' encountered, ignoring."));
                    if !empty {
                        self.skip()?;
                    }
                }
                Token::Text(t) => text.push_str(&t),
                Token::Close => return Ok(text.trim().to_string()),
                Token::Eof => return Err(self.eof()),
            }
        }
    }

    fn skip(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next()? {
                Token::Open { empty: false, .. } => depth += 1,
                Token::Close => depth -= 1,
                Token::Eof => return Err(self.eof()),
                _ => {}
            }
        }
        Ok(())
    }

    fn eof(&self) -> OrkError {
        OrkError::UnexpectedEof(self.open.last().cloned().unwrap_or_default())
    }

    fn next(&mut self) -> Result<Token> {
        loop {
            let token = match self.reader.read_event()? {
                Event::Start(e) => {
                    let (name, attrs) = open_tag(&e)?;
                    self.open.push(name.clone());
                    Token::Open {
                        name,
                        attrs,
                        empty: false,
                    }
                }
                Event::Empty(e) => {
                    let (name, attrs) = open_tag(&e)?;
                    Token::Open {
                        name,
                        attrs,
                        empty: true,
                    }
                }
                Event::End(_) => {
                    self.open.pop();
                    Token::Close
                }
                Event::Text(t) => Token::Text(t.decode().map_err(quick_xml::Error::from)?.into_owned()),
                Event::CData(c) => Token::Text(c.decode().map_err(quick_xml::Error::from)?.into_owned()),
                Event::GeneralRef(r) => Token::Text(resolve_reference(&r)?),
                Event::Eof => Token::Eof,
                // declaration, comments, processing instructions, doctype
                _ => continue,
            };
            return Ok(token);
        }
    }
}

fn open_tag(e: &BytesStart<'_>) -> Result<(String, Attributes)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Attributes::default();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attrs.push(key, value);
    }
    Ok((name, attrs))
}

fn resolve_reference(r: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = r.resolve_char_ref()? {
        return Ok(ch.to_string());
    }
    let name = r.decode().map_err(quick_xml::Error::from)?;
    Ok(match resolve_predefined_entity(&name) {
        Some(value) => value.to_string(),
        None => format!("&{name};"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImportContext;

    /// Records the callback order as text.
    struct Recorder {
        name: String,
        log: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl ElementHandler for Recorder {
        fn open_element(&mut self, _cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
            match element {
                "leaf" => Open::PlainText,
                "skip" => Open::Skip,
                _ => Open::Delegate(Box::new(Recorder {
                    name: element.to_string(),
                    log: self.log.clone(),
                })),
            }
        }

        fn close_element(
            &mut self,
            _cx: &mut LoadContext<'_>,
            element: &str,
            _attrs: &Attributes,
            content: &str,
            _built: Built,
        ) -> Result<()> {
            self.log
                .borrow_mut()
                .push(format!("{}:close {element} [{content}]", self.name));
            Ok(())
        }

        fn end_handler(
            self: Box<Self>,
            _cx: &mut LoadContext<'_>,
            attrs: &Attributes,
            _content: &str,
        ) -> Result<Built> {
            let id = attrs.get("id").unwrap_or("-");
            self.log.borrow_mut().push(format!("{}:end {id}", self.name));
            Ok(Built::Nothing)
        }
    }

    fn record(xml: &str) -> (Result<()>, Vec<String>) {
        let env = ImportContext::default();
        let mut cx = LoadContext::new(&env);
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut root = Recorder {
            name: "root".into(),
            log: log.clone(),
        };
        let result = TokenSource::new(xml).run(&mut root, &mut cx);
        let entries = log.borrow().clone();
        (result, entries)
    }

    #[test]
    fn child_end_runs_before_parent_close() {
        let (result, log) = record(
            r#"<?xml version="1.0"?><a id="1"><leaf> x &amp; y </leaf><b id="2"><leaf>z</leaf></b></a>"#,
        );
        assert!(result.is_ok());
        assert_eq!(
            log,
            vec![
                "a:close leaf [x & y]",
                "b:close leaf [z]",
                "b:end 2",
                "a:close b []",
                "a:end 1",
                "root:close a []",
            ]
        );
    }

    #[test]
    fn skipped_subtrees_produce_no_callbacks() {
        let (result, log) = record("<a><skip><leaf>1</leaf></skip><leaf>2</leaf></a>");
        assert!(result.is_ok());
        assert_eq!(log, vec!["a:close leaf [2]", "a:end -", "root:close a []"]);
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let (result, _) = record("<a><b></a>");
        assert!(matches!(result, Err(OrkError::Xml(_))));
    }

    #[test]
    fn truncated_input_is_fatal() {
        let (result, _) = record("<a><b>");
        assert!(result.is_err());
    }
}
