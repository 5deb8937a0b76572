//! XML-RPC request encoding and response decoding over `serde_json::Value`.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Number, Value};

use crate::error::{Result, StoreError};

pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?><methodCall><methodName>");
    xml.push_str(&escape(method));
    xml.push_str("</methodName><params>");
    for param in params {
        xml.push_str("<param>");
        encode_value(param, &mut xml);
        xml.push_str("</param>");
    }
    xml.push_str("</params></methodCall>");
    xml
}

fn encode_value(value: &Value, xml: &mut String) {
    xml.push_str("<value>");
    match value {
        Value::Null => xml.push_str("<nil/>"),
        Value::Bool(b) => {
            xml.push_str("<boolean>");
            xml.push_str(if *b { "1" } else { "0" });
            xml.push_str("</boolean>");
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => xml.push_str(&format!("<int>{i}</int>")),
            None => xml.push_str(&format!("<double>{}</double>", n.as_f64().unwrap_or_default())),
        },
        Value::String(s) => {
            xml.push_str("<string>");
            xml.push_str(&escape(s.as_str()));
            xml.push_str("</string>");
        }
        Value::Array(items) => {
            xml.push_str("<array><data>");
            for item in items {
                encode_value(item, xml);
            }
            xml.push_str("</data></array>");
        }
        Value::Object(members) => {
            xml.push_str("<struct>");
            for (name, member) in members {
                xml.push_str("<member><name>");
                xml.push_str(&escape(name.as_str()));
                xml.push_str("</name>");
                encode_value(member, xml);
                xml.push_str("</member>");
            }
            xml.push_str("</struct>");
        }
    }
    xml.push_str("</value>");
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    fn require(&self, name: &str) -> Result<&Node> {
        self.child(name).ok_or_else(|| {
            StoreError::Protocol(format!("<{}> is missing a <{}> element", self.name, name))
        })
    }
}

fn xml_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Xml(e.to_string())
}

fn parse_tree(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    let mut stack = vec![Node::default()];

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Node::new(start.name().as_ref())),
            Event::Empty(empty) => {
                let node = Node::new(empty.name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(StoreError::Xml("unbalanced closing tag".to_string()));
                }
                if let Some(node) = stack.pop()
                    && let Some(parent) = stack.last_mut()
                {
                    parent.children.push(node);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(StoreError::Xml("unexpected end of document".to_string()));
    }
    stack
        .pop()
        .ok_or_else(|| StoreError::Xml("empty document".to_string()))
}

/// Decode a `methodResponse`; a `<fault>` becomes [`StoreError::Fault`].
pub fn decode_response(xml: &str) -> Result<Value> {
    let root = parse_tree(xml)?;
    let response = root.require("methodResponse")?;

    if let Some(fault) = response.child("fault") {
        let fault = decode_value(fault.require("value")?)?;
        let code = match fault.get("faultCode") {
            Some(Value::String(code)) => code.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let message = fault
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(StoreError::Fault { code, message });
    }

    let value = response.require("params")?.require("param")?.require("value")?;
    decode_value(value)
}

fn decode_value(value: &Node) -> Result<Value> {
    let Some(typed) = value.children.first() else {
        return Ok(Value::String(value.text.clone()));
    };

    match typed.name.as_str() {
        "int" | "i4" | "i8" => typed
            .text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| StoreError::Protocol(format!("invalid integer: {e}"))),
        "double" => {
            let number = typed
                .text
                .trim()
                .parse::<f64>()
                .map_err(|e| StoreError::Protocol(format!("invalid double: {e}")))?;
            Number::from_f64(number)
                .map(Value::Number)
                .ok_or_else(|| StoreError::Protocol(format!("non-finite double: {number}")))
        }
        "boolean" => match typed.text.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(StoreError::Protocol(format!("invalid boolean: {other}"))),
        },
        "string" => Ok(Value::String(typed.text.clone())),
        "dateTime.iso8601" | "base64" => Ok(Value::String(typed.text.trim().to_string())),
        "nil" => Ok(Value::Null),
        "array" => {
            let data = typed.require("data")?;
            data.children
                .iter()
                .filter(|child| child.name == "value")
                .map(decode_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.children.iter().filter(|child| child.name == "member") {
                let name = member.require("name")?.text.clone();
                members.insert(name, decode_value(member.require("value")?)?);
            }
            Ok(Value::Object(members))
        }
        other => Err(StoreError::Protocol(format!("unsupported XML-RPC type <{other}>"))),
    }
}
