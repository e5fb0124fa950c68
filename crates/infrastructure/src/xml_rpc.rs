//! Minimal XML-RPC codec for the account API.
//!
//! Requests are produced with a streaming writer so every interpolated value
//! is escaped. Responses are read into a small element tree and then decoded
//! into [`XmlRpcValue`]s.

use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use dormant_core::{API_STATUS_OK, ApiError, AppError, AppResult};


/// A decoded XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlRpcValue {
    /// `<string>` or an untyped `<value>`.
    String(String),
    /// `<int>`, `<i4>` or `<i8>`.
    Int(i64),
    /// `<boolean>`.
    Boolean(bool),
    /// `<double>`.
    Double(f64),
    /// `<struct>` with members in document order.
    Struct(Vec<(String, XmlRpcValue)>),
    /// `<array>`.
    Array(Vec<XmlRpcValue>),
    /// `<nil/>`.
    Nil,
}

impl XmlRpcValue {
    /// Builds a struct value from `(name, value)` pairs.
    #[must_use]
    pub fn structure<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, XmlRpcValue)>,
        K: Into<String>,
    {
        Self::Struct(
            members
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Looks up a struct member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&XmlRpcValue> {
        match self {
            Self::Struct(members) => members
                .iter()
                .find(|(member_name, _)| member_name == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns the string payload of string values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the integer payload, accepting numeric strings.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the first string of an array, or the value itself when it is
    /// a plain string.
    #[must_use]
    pub fn first_string(&self) -> Option<&str> {
        match self {
            Self::Array(items) => items.iter().find_map(Self::first_string),
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// An XML-RPC method call.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    method_name: String,
    params: Vec<XmlRpcValue>,
}

impl MethodCall {
    /// Starts a call to `method_name` without parameters.
    #[must_use]
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            params: Vec::new(),
        }
    }

    /// Appends a positional parameter.
    #[must_use]
    pub fn param(mut self, value: XmlRpcValue) -> Self {
        self.params.push(value);
        self
    }

    /// Returns the remote method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        self.method_name.as_str()
    }

    /// Serializes the call to an XML document.
    pub fn to_xml(&self) -> AppResult<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
        start(&mut writer, "methodCall")?;
        text_element(&mut writer, "methodName", &self.method_name)?;
        start(&mut writer, "params")?;
        for param in &self.params {
            start(&mut writer, "param")?;
            write_value(&mut writer, param)?;
            end(&mut writer, "param")?;
        }
        end(&mut writer, "params")?;
        end(&mut writer, "methodCall")?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|error| AppError::Internal(format!("request is not valid UTF-8: {error}")))
    }
}

/// A decoded `<methodResponse>`.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// The first `<param>` value.
    Params(XmlRpcValue),
    /// The `<fault>` value.
    Fault(XmlRpcValue),
}

impl MethodResponse {
    /// Parses a response document.
    pub fn parse(xml: &str) -> AppResult<Self> {
        let root = parse_tree(xml)?;
        if root.name != "methodResponse" {
            return Err(AppError::Protocol(format!(
                "expected methodResponse root element, found '{}'",
                root.name
            )));
        }

        if let Some(fault) = root.child("fault") {
            let value = fault
                .child("value")
                .ok_or_else(|| missing("fault/value"))?;
            return Ok(Self::Fault(decode_value(value)?));
        }

        let value = root
            .child("params")
            .and_then(|params| params.child("param"))
            .and_then(|param| param.child("value"))
            .ok_or_else(|| missing("params/param/value"))?;
        Ok(Self::Params(decode_value(value)?))
    }

    /// Classifies the response by its `api_status` member.
    ///
    /// Non-OK statuses become [`ApiError`]s: a field error takes its category
    /// from the first entry of `errors`, a login rejection uses `login` and
    /// the first entry of `messages`.
    pub fn into_result(self) -> AppResult<XmlRpcValue> {
        let value = match self {
            Self::Fault(fault) => {
                let code = fault
                    .member("faultCode")
                    .and_then(XmlRpcValue::as_i64)
                    .unwrap_or_default();
                let message = fault
                    .member("faultString")
                    .and_then(XmlRpcValue::as_str)
                    .unwrap_or("unknown fault");
                return Err(ApiError::new(code, "fault", message).into());
            }
            Self::Params(value) => value,
        };

        let status = value
            .member("api_status")
            .and_then(XmlRpcValue::as_i64)
            .ok_or_else(|| missing("api_status"))?;
        if status == API_STATUS_OK {
            return Ok(value);
        }

        if let Some(XmlRpcValue::Struct(fields)) = value.member("errors")
            && let Some((field, messages)) = fields.first()
        {
            let message = messages.first_string().unwrap_or_default();
            return Err(ApiError::new(status, field.as_str(), message).into());
        }

        if let Some(messages) = value.member("messages") {
            let message = messages.first_string().unwrap_or_default();
            return Err(ApiError::new(status, "login", message).into());
        }

        Err(ApiError::new(
            status,
            "api",
            format!("request failed with api_status {status}"),
        )
        .into())
    }
}

fn missing(path: &str) -> AppError {
    AppError::Protocol(format!("response is missing '{path}'"))
}

fn write_error(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("failed to write XML-RPC request: {error}"))
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn start(writer: &mut XmlWriter, name: &str) -> AppResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_error)
}

fn end(writer: &mut XmlWriter, name: &str) -> AppResult<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_error)
}

fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> AppResult<()> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_error)?;
    end(writer, name)
}

fn write_value(writer: &mut XmlWriter, value: &XmlRpcValue) -> AppResult<()> {
    start(writer, "value")?;
    match value {
        XmlRpcValue::String(text) => text_element(writer, "string", text)?,
        XmlRpcValue::Int(number) => text_element(writer, "int", &number.to_string())?,
        XmlRpcValue::Boolean(flag) => {
            text_element(writer, "boolean", if *flag { "1" } else { "0" })?;
        }
        XmlRpcValue::Double(number) => text_element(writer, "double", &number.to_string())?,
        XmlRpcValue::Struct(members) => {
            start(writer, "struct")?;
            for (name, member) in members {
                start(writer, "member")?;
                text_element(writer, "name", name)?;
                write_value(writer, member)?;
                end(writer, "member")?;
            }
            end(writer, "struct")?;
        }
        XmlRpcValue::Array(items) => {
            start(writer, "array")?;
            start(writer, "data")?;
            for item in items {
                write_value(writer, item)?;
            }
            end(writer, "data")?;
            end(writer, "array")?;
        }
        XmlRpcValue::Nil => writer
            .write_event(Event::Empty(BytesStart::new("nil")))
            .map_err(write_error)?,
    }
    end(writer, "value")
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }
}

fn parse_tree(xml: &str) -> AppResult<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|error| {
            AppError::Protocol(format!(
                "malformed XML at position {}: {error}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(tag) => stack.push(Element::named(tag.local_name().as_ref())),
            Event::Empty(tag) => {
                attach(&mut stack, &mut root, Element::named(tag.local_name().as_ref()));
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| AppError::Protocol("unbalanced XML end tag".to_owned()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|error| AppError::Protocol(format!("invalid XML text: {error}")))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(AppError::Protocol("unexpected end of XML document".to_owned()));
    }
    root.ok_or_else(|| AppError::Protocol("empty XML document".to_owned()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn decode_value(value: &Element) -> AppResult<XmlRpcValue> {
    let Some(typed) = value.children.first() else {
        return Ok(XmlRpcValue::String(value.text.clone()));
    };

    match typed.name.as_str() {
        "string" => Ok(XmlRpcValue::String(typed.text.clone())),
        "int" | "i4" | "i8" => typed
            .text
            .trim()
            .parse()
            .map(XmlRpcValue::Int)
            .map_err(|error| {
                AppError::Protocol(format!("invalid integer '{}': {error}", typed.text))
            }),
        "boolean" => Ok(XmlRpcValue::Boolean(typed.text.trim() == "1")),
        "double" => typed
            .text
            .trim()
            .parse()
            .map(XmlRpcValue::Double)
            .map_err(|error| {
                AppError::Protocol(format!("invalid double '{}': {error}", typed.text))
            }),
        "struct" => {
            let mut members = Vec::with_capacity(typed.children.len());
            for member in &typed.children {
                let name = member
                    .child("name")
                    .map(|name| name.text.trim().to_owned())
                    .ok_or_else(|| missing("member/name"))?;
                let value = member
                    .child("value")
                    .ok_or_else(|| missing("member/value"))?;
                members.push((name, decode_value(value)?));
            }
            Ok(XmlRpcValue::Struct(members))
        }
        "array" => {
            let items = typed
                .child("data")
                .map(|data| {
                    data.children
                        .iter()
                        .filter(|item| item.name == "value")
                        .map(decode_value)
                        .collect::<AppResult<Vec<_>>>()
                })
                .transpose()?
                .unwrap_or_default();
            Ok(XmlRpcValue::Array(items))
        }
        "nil" => Ok(XmlRpcValue::Nil),
        _ => Ok(XmlRpcValue::String(typed.text.clone())),
    }
}
