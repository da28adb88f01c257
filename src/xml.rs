//! Namespace-aware navigation over the service's XML envelope.
//!
//! The response is small (one page), so it is read into a tree of [`Element`]s
//! once and navigated by `(Namespace, local name)` pairs instead of by
//! prefixed tag strings.

use quick_xml::{
    events::{BytesStart, Event},
    name::ResolveResult,
    reader::NsReader,
};

use crate::error::{ArxivError, Result};

/// The two namespaces the envelope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Entry feed: `feed`, `entry`, `title`, `link`, ...
    Atom,
    /// Search metadata: `totalResults`, `startIndex`, `itemsPerPage`.
    OpenSearch,
}

impl Namespace {
    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Atom => "http://www.w3.org/2005/Atom",
            Namespace::OpenSearch => "http://a9.com/-/spec/opensearch/1.1/",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Self> {
        let namespace = match ns {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.0).into_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(ArxivError::MalformedResponse(format!(
                    "undeclared namespace prefix `{}`",
                    String::from_utf8_lossy(&prefix)
                )))
            }
        };
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            namespace,
            name,
            attributes,
            ..Element::default()
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, ns: Namespace, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(ns.uri())
    }

    /// Text directly inside this element, unescaped and trimmed at both ends.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, ns: Namespace, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(ns, name))
    }

    /// All matching children, in document order.
    pub fn children<'a>(&'a self, ns: Namespace, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.is(ns, name))
    }

    pub fn child_text(&self, ns: Namespace, name: &str) -> Option<&str> {
        self.child(ns, name).map(Element::text)
    }
}

/// A parsed, well-formed response document.
#[derive(Debug, Clone)]
pub struct XmlEnvelope {
    root: Element,
}

impl XmlEnvelope {
    /// Fails with [`ArxivError::MalformedResponse`] unless `text` is one complete XML document.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(text);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event()? {
                (ns, Event::Start(start)) => {
                    let element = Element::open(ns, &start)?;
                    if stack.is_empty() && root.is_some() {
                        return Err(multiple_roots());
                    }
                    stack.push(element);
                }
                (ns, Event::Empty(start)) => {
                    let element = Element::open(ns, &start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        ArxivError::MalformedResponse("unexpected closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::Text(text)) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(text_outside_root()),
                    }
                }
                (_, Event::CData(data)) => match stack.last_mut() {
                    Some(current) => {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()))
                    }
                    None => return Err(text_outside_root()),
                },
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ArxivError::MalformedResponse(format!(
                "document ended inside <{}>",
                open.name
            )));
        }
        root.map(|root| XmlEnvelope { root })
            .ok_or_else(|| ArxivError::MalformedResponse("document has no root element".to_string()))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(multiple_roots()),
    }
    Ok(())
}

fn text_outside_root() -> ArxivError {
    ArxivError::MalformedResponse("text outside the root element".to_string())
}

fn multiple_roots() -> ArxivError {
    ArxivError::MalformedResponse("document has more than one root element".to_string())
}
