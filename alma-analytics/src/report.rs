//! Parsing of analytics report documents into JSON-ready rows.
//!
//! A report page looks like:
//!
//! ```xml
//! <report>
//!   <QueryResult>
//!     <ResumptionToken>9672D715A8E2</ResumptionToken>
//!     <IsFinished>false</IsFinished>
//!     <ResultXml>
//!       <rowset xmlns="urn:schemas-microsoft-com:xml-analysis:rowset">
//!         <xsd:schema>
//!           ... <xsd:element name="Column1" saw-sql:columnHeading="Title"/> ...
//!         </xsd:schema>
//!         <Row><Column0>0</Column0><Column1>Foo</Column1></Row>
//!       </rowset>
//!     </ResultXml>
//!   </QueryResult>
//! </report>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{Error, Result};
use std::collections::HashMap;
use tracing::error;

/// Header substituted for the generated CASE expression of the provenance column.
pub const PROVENANCE_CODE: &str = "Provenance Code";

const PROVENANCE_CASE_MARKER: &str = "CASE  WHEN Provenance Code";

/// Synthetic leading column present in every row.
const SYNTHETIC_COLUMN: &str = "Column0";

/// One report row keyed by column heading, in document order.
pub type Row = Map<String, Value>;

/// Element of a parsed XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    /// Parse a complete document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        // Bottom of the stack collects the root element.
        let mut stack = vec![XmlNode::default()];

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(XmlNode::start(e)?),
                Ok(Event::End(_)) => {
                    let node = stack.pop().ok_or_else(invalid_document)?;
                    stack.last_mut().ok_or_else(invalid_document)?.children.push(node);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|err| {
                        error!("Invalid XML text at {}: {}", reader.buffer_position(), err);
                        invalid_document()
                    })?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    error!("Invalid XML at {}: {}", reader.buffer_position(), err);
                    return Err(invalid_document());
                }
            }
        }

        let mut document = stack.pop().filter(|_| stack.is_empty()).ok_or_else(invalid_document)?;
        if document.children.len() != 1 {
            error!("Empty or invalid XML response");
            return Err(invalid_document());
        }
        Ok(document.children.remove(0))
    }

    fn start(e: &BytesStart<'_>) -> Result<XmlNode> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| {
                error!("Invalid attribute on <{}>: {}", name, err);
                invalid_document()
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| {
                    error!("Invalid attribute value on <{}>: {}", name, err);
                    invalid_document()
                })?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(XmlNode {
            name,
            attributes,
            ..XmlNode::default()
        })
    }

    /// Qualified tag name, including any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute with qualified name `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// First descendant (or self) named `name`, in document order.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Every descendant (or self) named `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.collect_named(name, out);
        }
    }
}

fn invalid_document() -> Error {
    Error::NotFound("Empty or invalid XML response".to_string())
}

/// Rows of one report page plus the token for the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPage {
    pub resume: Option<String>,
    pub rows: Vec<Row>,
}

/// Turn a raw report document into a [`ReportPage`].
pub fn transform(xml: &str) -> Result<ReportPage> {
    let document = XmlNode::parse(xml)?;

    if let Some(remote_error) = document.find("error") {
        let message = remote_error.text().trim().to_string();
        error!("Error: {}", message);
        return Err(Error::RemoteReported(message));
    }

    let columns = extract_columns(&document)?;
    let rows = extract_rows(&document, &columns)?;
    let resume = document.find("ResumptionToken").map(XmlNode::text);

    Ok(ReportPage { resume, rows })
}

/// Map internal column names (`Column1`, ...) to their headings.
pub fn extract_columns(document: &XmlNode) -> Result<HashMap<String, String>> {
    let declarations = document.find_all("xsd:element");
    if declarations.is_empty() {
        error!("No columns found");
        return Err(Error::NotFound("No columns found".to_string()));
    }

    let columns = declarations
        .into_iter()
        .filter_map(|element| {
            let name = element.attr("name")?;
            let heading = element.attr("saw-sql:columnHeading").unwrap_or(name);
            Some((name.to_string(), normalize_heading(heading)))
        })
        .collect();

    Ok(columns)
}

fn normalize_heading(heading: &str) -> String {
    if heading.contains(PROVENANCE_CASE_MARKER) {
        PROVENANCE_CODE.to_string()
    } else {
        heading.to_string()
    }
}

/// Extract every `Row` as a heading-keyed map, skipping the synthetic column.
pub fn extract_rows(document: &XmlNode, columns: &HashMap<String, String>) -> Result<Vec<Row>> {
    let rows = document.find_all("Row");
    if rows.is_empty() {
        error!("No rows found");
        return Err(Error::NotFound("No rows found".to_string()));
    }

    let rows = rows
        .into_iter()
        .map(|row| {
            row.children()
                .iter()
                .filter(|cell| cell.name() != SYNTHETIC_COLUMN)
                .map(|cell| {
                    let key = columns
                        .get(cell.name())
                        .cloned()
                        .unwrap_or_else(|| cell.name().to_string());
                    (key, Value::String(cell.text()))
                })
                .collect::<Row>()
        })
        .collect();

    Ok(rows)
}
