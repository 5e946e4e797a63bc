//! Editable document content (word/document.xml)
//!
//! The main document part is parsed into a lossless element tree rather
//! than a summarised block model: every element, attribute and text node is
//! kept so the tree can be written back after paragraphs are edited.
//! Typed views ([`Paragraph`], [`Table`], [`TableRow`], [`TableCell`])
//! borrow into the tree and expose the WordprocessingML structure.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{OoxmlError, Result};

/// A node of the XML tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A nested element
    Element(Element),
    /// Character data (unescaped)
    Text(String),
    /// A CDATA section
    CData(String),
    /// A comment, kept verbatim
    Comment(String),
}

/// An XML element with its qualified name, attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified name, e.g. `w:p`
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Name without the namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Namespace prefix, if the name has one
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Child elements, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Child elements with the given local name
    pub fn children_named<'s>(&'s self, local: &'s str) -> impl Iterator<Item = &'s Element> + 's {
        self.elements().filter(move |el| el.local_name() == local)
    }

    /// Mutable child elements with the given local name
    pub fn children_named_mut<'s>(
        &'s mut self,
        local: &'s str,
    ) -> impl Iterator<Item = &'s mut Element> + 's {
        self.children
            .iter_mut()
            .filter_map(|node| match node {
                Node::Element(el) => Some(el),
                _ => None,
            })
            .filter(move |el| el.local_name() == local)
    }

    /// Qualified name for a sibling element in the same namespace
    fn sibling_name(&self, local: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        }
    }

    fn from_start(e: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| OoxmlError::InvalidStructure(err.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}

/// A parsed, editable Word document body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
    has_declaration: bool,
}

impl Document {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Don't trim text - whitespace inside w:t is content
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut has_declaration = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Decl(_) => has_declaration = true,
                Event::Start(ref e) => stack.push(Element::from_start(e)?),
                Event::Empty(ref e) => {
                    let element = Element::from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        OoxmlError::InvalidStructure("unbalanced closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref e) => {
                    // Whitespace outside the root element carries nothing
                    if let Some(parent) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| OoxmlError::InvalidStructure(err.to_string()))?;
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        parent.children.push(Node::CData(text));
                    }
                }
                Event::Comment(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        parent.children.push(Node::Comment(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(OoxmlError::InvalidStructure(
                "unclosed element at end of document".to_string(),
            ));
        }
        let root = root.ok_or_else(|| {
            OoxmlError::InvalidStructure("document has no root element".to_string())
        })?;
        if root.local_name() != "document" {
            return Err(OoxmlError::InvalidStructure(format!(
                "expected <w:document> root, found <{}>",
                root.name
            )));
        }
        if root.children_named("body").next().is_none() {
            return Err(OoxmlError::InvalidStructure(
                "document has no body".to_string(),
            ));
        }

        Ok(Self {
            root,
            has_declaration,
        })
    }

    /// Serialize the tree back to XML bytes
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        if self.has_declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
            writer.get_mut().extend_from_slice(b"\r\n");
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }

    /// The root `w:document` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    fn body(&self) -> Option<&Element> {
        self.root.children_named("body").next()
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.root.children_named_mut("body").next()
    }

    /// Body-level paragraphs, in document order
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = Paragraph<'_>> {
        self.body_mut()
            .into_iter()
            .flat_map(|body| body.children_named_mut("p"))
            .map(|element| Paragraph { element })
    }

    /// Body-level tables, in document order
    pub fn tables_mut(&mut self) -> impl Iterator<Item = Table<'_>> {
        self.body_mut()
            .into_iter()
            .flat_map(|body| body.children_named_mut("tbl"))
            .map(|element| Table { element })
    }

    /// Text of each body-level paragraph
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.body()
            .map(|body| body.children_named("p").map(paragraph_text).collect())
            .unwrap_or_default()
    }

    /// Plain text of the body, paragraphs and table cell paragraphs in
    /// document order, one paragraph per line
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(body) = self.body() {
            for block in body.elements() {
                match block.local_name() {
                    "p" => lines.push(paragraph_text(block)),
                    "tbl" => {
                        for row in block.children_named("tr") {
                            for cell in row.children_named("tc") {
                                lines.extend(cell.children_named("p").map(paragraph_text));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        lines.join("\n")
    }
}

/// A paragraph (`w:p`) borrowed from the tree
#[derive(Debug)]
pub struct Paragraph<'a> {
    element: &'a mut Element,
}

impl Paragraph<'_> {
    /// The underlying element
    pub fn element(&self) -> &Element {
        self.element
    }

    /// Text of the paragraph's runs, hyperlink runs included
    pub fn text(&self) -> String {
        paragraph_text(self.element)
    }

    /// Replace the paragraph content with a single run holding `text`
    ///
    /// Paragraph properties survive. All runs are collapsed into one that
    /// carries the first original run's properties, so formatting applied
    /// to individual spans is lost. Unlike a bare text reset, the new run
    /// is not stripped of `w:rPr`; a paragraph without runs gets a plain
    /// `w:r`.
    pub fn set_text(&mut self, text: &str) {
        let run_properties = first_run_properties(self.element);

        self.element
            .children
            .retain(|node| matches!(node, Node::Element(el) if el.local_name() == "pPr"));

        let mut run = Element::new(self.element.sibling_name("r"));
        if let Some(rpr) = run_properties {
            run.children.push(Node::Element(rpr));
        }
        append_run_content(&mut run, text);
        self.element.children.push(Node::Element(run));
    }
}

/// A table (`w:tbl`) borrowed from the tree
#[derive(Debug)]
pub struct Table<'a> {
    element: &'a mut Element,
}

impl Table<'_> {
    /// Rows (`w:tr`) of the table
    pub fn rows(&mut self) -> impl Iterator<Item = TableRow<'_>> {
        self.element
            .children_named_mut("tr")
            .map(|element| TableRow { element })
    }
}

/// A table row (`w:tr`)
#[derive(Debug)]
pub struct TableRow<'a> {
    element: &'a mut Element,
}

impl TableRow<'_> {
    /// Cells (`w:tc`) of the row
    pub fn cells(&mut self) -> impl Iterator<Item = TableCell<'_>> {
        self.element
            .children_named_mut("tc")
            .map(|element| TableCell { element })
    }
}

/// A table cell (`w:tc`)
#[derive(Debug)]
pub struct TableCell<'a> {
    element: &'a mut Element,
}

impl TableCell<'_> {
    /// Paragraphs directly inside the cell
    pub fn paragraphs(&mut self) -> impl Iterator<Item = Paragraph<'_>> {
        self.element
            .children_named_mut("p")
            .map(|element| Paragraph { element })
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(OoxmlError::InvalidStructure(
                "multiple root elements".to_string(),
            ))
        }
    }
    Ok(())
}

fn paragraph_text(paragraph: &Element) -> String {
    let mut text = String::new();
    for child in paragraph.elements() {
        match child.local_name() {
            "r" => push_run_text(child, &mut text),
            "hyperlink" => {
                for run in child.children_named("r") {
                    push_run_text(run, &mut text);
                }
            }
            _ => {}
        }
    }
    text
}

fn push_run_text(run: &Element, out: &mut String) {
    for child in run.elements() {
        match child.local_name() {
            "t" => {
                for node in &child.children {
                    if let Node::Text(t) | Node::CData(t) = node {
                        out.push_str(t);
                    }
                }
            }
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            _ => {}
        }
    }
}

fn first_run_properties(paragraph: &Element) -> Option<Element> {
    paragraph
        .elements()
        .flat_map(|child| match child.local_name() {
            "r" => vec![child],
            "hyperlink" => child.children_named("r").collect(),
            _ => Vec::new(),
        })
        .next()
        .and_then(|run| run.children_named("rPr").next().cloned())
}

fn append_run_content(run: &mut Element, text: &str) {
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                flush_segment(run, &mut segment);
                let local = if ch == '\t' { "tab" } else { "br" };
                let name = run.sibling_name(local);
                run.children.push(Node::Element(Element::new(name)));
            }
            _ => segment.push(ch),
        }
    }
    flush_segment(run, &mut segment);
}

fn flush_segment(run: &mut Element, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    let mut t = Element::new(run.sibling_name("t")).with_attribute("xml:space", "preserve");
    t.children.push(Node::Text(std::mem::take(segment)));
    run.children.push(Node::Element(t));
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(el) => write_element(writer, el)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::CData(text) => {
                writer.write_event(Event::CData(BytesCData::new(text.as_str())))?
            }
            Node::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
