//! Compiled schema document
//!
//! [`SchemaDocument`] is an arena of schema nodes built from a [`JsonSchema`].
//! Compilation resolves every local `$ref` to a node id and compiles every
//! `pattern` once, so validation never has to look at the raw schema again.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;
use crate::json_schema::{InstanceType, Items, JsonSchema, SchemaMetadata, SchemaObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaNodeId(pub usize);

/// A compiled schema: node arena, root node and named definitions.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub nodes: Vec<SchemaNode>,
    pub root: SchemaNodeId,
    /// Root-level `definitions` and `$defs` entries, keyed by name.
    pub definitions: IndexMap<String, SchemaNodeId>,
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub content: SchemaNodeContent,
    pub metadata: SchemaMetadata,
}

#[derive(Debug, Clone)]
pub enum SchemaNodeContent {
    /// `true` or `{}`
    Any,
    /// `false`
    Never,
    /// `$ref`; sibling keywords are ignored (Draft-07)
    Reference(TypeReference),
    /// Any combination of assertion and applicator keywords
    Keywords(Box<KeywordSchema>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// The reference as written, e.g. `#/definitions/metric`
    pub reference: String,
    pub target: SchemaNodeId,
}

#[derive(Debug, Clone, Default)]
pub struct KeywordSchema {
    pub types: Option<Vec<InstanceType>>,
    pub enum_values: Option<Vec<Value>>,
    pub const_value: Option<Value>,
    pub string: Option<StringSchema>,
    pub number: Option<NumberSchema>,
    pub array: Option<ArraySchema>,
    pub object: Option<ObjectSchema>,
    pub all_of: Option<Vec<SchemaNodeId>>,
    pub any_of: Option<Vec<SchemaNodeId>>,
    pub one_of: Option<Vec<SchemaNodeId>>,
    pub not: Option<SchemaNodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<Pattern>,
}

/// A `pattern` keyword with its compiled regex.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub source: String,
    pub regex: Regex,
}

impl Pattern {
    /// Compile an ECMA-262 `pattern`.
    pub fn new(source: &str) -> Result<Self, SchemaError> {
        let regex =
            Regex::new(&translate_pattern(source)).map_err(|e| SchemaError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Unanchored search, as ECMA-262 `RegExp.test` does.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Rewrite ECMA-262 regex syntax into `regex` syntax.
///
/// ECMA-262 `\d` and `\w` are ASCII classes and `\b` uses ASCII word
/// characters. Inside a class `\b` is a backspace and `[` is a literal, while
/// `regex` would open a nested class there. Set operators (`&&`, `--`, `~~`)
/// have no meaning in ECMA-262 classes and are escaped.
fn translate_pattern(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(escaped) = chars.next() else {
                    out.push('\\');
                    break;
                };
                match escaped {
                    'd' => out.push_str("[0-9]"),
                    'D' => out.push_str("[^0-9]"),
                    'w' => out.push_str("[0-9A-Za-z_]"),
                    'W' => out.push_str("[^0-9A-Za-z_]"),
                    'b' if in_class => out.push_str(r"\x08"),
                    'b' => out.push_str(r"(?-u:\b)"),
                    'B' if !in_class => out.push_str(r"(?-u:\B)"),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            '[' if in_class => out.push_str(r"\["),
            '[' => {
                in_class = true;
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('^');
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            '&' | '-' | '~' if in_class && chars.peek() == Some(&c) => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: ArrayItems,
    pub min_items: Option<u32>,
    pub max_items: Option<u32>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    /// No `items` keyword
    Any,
    /// Every element validates against one schema
    Single(SchemaNodeId),
    /// Positional schemas; elements past the prefix use `additional`
    Tuple {
        prefix: Vec<SchemaNodeId>,
        additional: Option<SchemaNodeId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaNodeId>,
    pub required: Vec<String>,
    pub additional: AdditionalProperties,
}

/// Policy for members not listed in `properties`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalProperties {
    Allow,
    Deny,
    Schema(SchemaNodeId),
}

impl SchemaDocument {
    /// Deserialize and compile a schema from its JSON form.
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let schema = JsonSchema::deserialize(value)?;
        Self::compile(&schema)
    }

    /// Compile a schema.
    pub fn compile(schema: &JsonSchema) -> Result<Self, SchemaError> {
        let mut compiler = SchemaCompiler::default();
        let root = compiler.reserve_node();

        if let JsonSchema::Object(object) = schema {
            compiler.reserve_definitions(object);
        }
        compiler.compile_into(root, schema)?;

        let pending = std::mem::take(&mut compiler.pending_definitions);
        for (id, definition) in pending {
            compiler.compile_into(id, definition)?;
        }

        let document = SchemaDocument {
            nodes: compiler.nodes,
            root,
            definitions: compiler.definitions,
        };
        document.check_reference_cycles()?;

        debug!(
            nodes = document.nodes.len(),
            definitions = document.definitions.len(),
            "compiled schema document"
        );
        Ok(document)
    }

    pub fn node(&self, id: SchemaNodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Node id of a root-level definition.
    pub fn definition(&self, name: &str) -> Option<SchemaNodeId> {
        self.definitions.get(name).copied()
    }

    /// Follow `$ref` chains to the first non-reference node.
    pub fn resolve(&self, id: SchemaNodeId) -> SchemaNodeId {
        let mut current = id;
        for _ in 0..self.nodes.len() {
            match &self.node(current).content {
                SchemaNodeContent::Reference(type_ref) => current = type_ref.target,
                _ => return current,
            }
        }
        current
    }

    /// Literal values a node accepts when it is made only of `const` or
    /// `enum`, following references.
    pub fn literal_values(&self, id: SchemaNodeId) -> Option<Vec<Value>> {
        let SchemaNodeContent::Keywords(keywords) = &self.node(self.resolve(id)).content else {
            return None;
        };
        if keywords.one_of.is_some() || keywords.any_of.is_some() || keywords.all_of.is_some() {
            return None;
        }
        if let Some(value) = &keywords.const_value {
            return Some(vec![value.clone()]);
        }
        keywords.enum_values.clone()
    }

    fn check_reference_cycles(&self) -> Result<(), SchemaError> {
        for (index, node) in self.nodes.iter().enumerate() {
            let SchemaNodeContent::Reference(start) = &node.content else {
                continue;
            };
            let mut current = start.target;
            let mut steps = 0;
            while let SchemaNodeContent::Reference(next) = &self.node(current).content {
                if current.0 == index || steps > self.nodes.len() {
                    return Err(SchemaError::CircularReference {
                        reference: start.reference.clone(),
                    });
                }
                current = next.target;
                steps += 1;
            }
        }
        Ok(())
    }
}

// =============================================================================
// SchemaCompiler
// =============================================================================

#[derive(Default)]
struct SchemaCompiler<'s> {
    nodes: Vec<SchemaNode>,
    definitions: IndexMap<String, SchemaNodeId>,
    /// `$defs` entries, kept apart so a `definitions` entry of the same name
    /// does not shadow them
    defs: IndexMap<String, SchemaNodeId>,
    pending_definitions: Vec<(SchemaNodeId, &'s JsonSchema)>,
}

impl<'s> SchemaCompiler<'s> {
    fn reserve_node(&mut self) -> SchemaNodeId {
        let id = SchemaNodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            content: SchemaNodeContent::Any,
            metadata: SchemaMetadata::default(),
        });
        id
    }

    /// Reserve ids for root definitions so references can point at them
    /// before they are compiled.
    fn reserve_definitions(&mut self, root: &'s SchemaObject) {
        for (name, definition) in root.definitions.iter().flatten() {
            let id = self.reserve_node();
            self.definitions.insert(name.clone(), id);
            self.pending_definitions.push((id, definition));
        }
        for (name, definition) in root.defs.iter().flatten() {
            let id = self.reserve_node();
            self.defs.insert(name.clone(), id);
            self.definitions.entry(name.clone()).or_insert(id);
            self.pending_definitions.push((id, definition));
        }
    }

    fn compile_new(&mut self, schema: &JsonSchema) -> Result<SchemaNodeId, SchemaError> {
        let id = self.reserve_node();
        self.compile_into(id, schema)?;
        Ok(id)
    }

    fn compile_all(&mut self, schemas: &[JsonSchema]) -> Result<Vec<SchemaNodeId>, SchemaError> {
        schemas.iter().map(|s| self.compile_new(s)).collect()
    }

    fn compile_into(&mut self, id: SchemaNodeId, schema: &JsonSchema) -> Result<(), SchemaError> {
        let node = match schema {
            JsonSchema::Boolean(true) => SchemaNode {
                content: SchemaNodeContent::Any,
                metadata: SchemaMetadata::default(),
            },
            JsonSchema::Boolean(false) => SchemaNode {
                content: SchemaNodeContent::Never,
                metadata: SchemaMetadata::default(),
            },
            JsonSchema::Object(object) => SchemaNode {
                content: self.compile_object(object)?,
                metadata: object.metadata.clone(),
            },
        };
        self.nodes[id.0] = node;
        Ok(())
    }

    fn compile_object(&mut self, object: &SchemaObject) -> Result<SchemaNodeContent, SchemaError> {
        if let Some(reference) = &object.reference {
            let target = self.resolve_reference(reference)?;
            return Ok(SchemaNodeContent::Reference(TypeReference {
                reference: reference.clone(),
                target,
            }));
        }

        let keywords = KeywordSchema {
            types: object.instance_type.as_ref().map(|t| t.to_vec()),
            enum_values: object.enum_values.clone(),
            const_value: object.const_value.clone(),
            string: self.compile_string(object)?,
            number: compile_number(object),
            array: self.compile_array(object)?,
            object: self.compile_properties(object)?,
            all_of: object
                .all_of
                .as_deref()
                .map(|s| self.compile_all(s))
                .transpose()?,
            any_of: object
                .any_of
                .as_deref()
                .map(|s| self.compile_all(s))
                .transpose()?,
            one_of: object
                .one_of
                .as_deref()
                .map(|s| self.compile_all(s))
                .transpose()?,
            not: object
                .not
                .as_deref()
                .map(|s| self.compile_new(s))
                .transpose()?,
        };

        if keywords.is_empty() {
            Ok(SchemaNodeContent::Any)
        } else {
            Ok(SchemaNodeContent::Keywords(Box::new(keywords)))
        }
    }

    fn compile_string(&mut self, object: &SchemaObject) -> Result<Option<StringSchema>, SchemaError> {
        if object.min_length.is_none() && object.max_length.is_none() && object.pattern.is_none() {
            return Ok(None);
        }
        Ok(Some(StringSchema {
            min_length: object.min_length,
            max_length: object.max_length,
            pattern: object.pattern.as_deref().map(Pattern::new).transpose()?,
        }))
    }

    fn compile_array(&mut self, object: &SchemaObject) -> Result<Option<ArraySchema>, SchemaError> {
        if object.items.is_none()
            && object.min_items.is_none()
            && object.max_items.is_none()
            && object.unique_items.is_none()
        {
            return Ok(None);
        }
        let items = match &object.items {
            None => ArrayItems::Any,
            Some(Items::Single(schema)) => ArrayItems::Single(self.compile_new(schema)?),
            Some(Items::Tuple(schemas)) => ArrayItems::Tuple {
                prefix: self.compile_all(schemas)?,
                additional: object
                    .additional_items
                    .as_deref()
                    .map(|s| self.compile_new(s))
                    .transpose()?,
            },
        };
        Ok(Some(ArraySchema {
            items,
            min_items: object.min_items,
            max_items: object.max_items,
            unique: object.unique_items.unwrap_or(false),
        }))
    }

    fn compile_properties(
        &mut self,
        object: &SchemaObject,
    ) -> Result<Option<ObjectSchema>, SchemaError> {
        if object.properties.is_none()
            && object.required.is_none()
            && object.additional_properties.is_none()
        {
            return Ok(None);
        }
        let mut properties = IndexMap::new();
        for (name, schema) in object.properties.iter().flatten() {
            properties.insert(name.clone(), self.compile_new(schema)?);
        }
        let additional = match object.additional_properties.as_deref() {
            None | Some(JsonSchema::Boolean(true)) => AdditionalProperties::Allow,
            Some(JsonSchema::Boolean(false)) => AdditionalProperties::Deny,
            Some(schema) => AdditionalProperties::Schema(self.compile_new(schema)?),
        };
        Ok(Some(ObjectSchema {
            properties,
            required: object.required.clone().unwrap_or_default(),
            additional,
        }))
    }

    fn resolve_reference(&self, reference: &str) -> Result<SchemaNodeId, SchemaError> {
        if reference == "#" {
            return Ok(SchemaNodeId(0));
        }
        let (section, name) = if let Some(name) = reference.strip_prefix("#/definitions/") {
            (&self.definitions, name)
        } else if let Some(name) = reference.strip_prefix("#/$defs/") {
            (&self.defs, name)
        } else {
            return Err(SchemaError::UnsupportedReference {
                reference: reference.to_string(),
            });
        };
        if name.contains('/') {
            return Err(SchemaError::UnsupportedReference {
                reference: reference.to_string(),
            });
        }
        let name = name.replace("~1", "/").replace("~0", "~");
        section
            .get(&name)
            .copied()
            .ok_or_else(|| SchemaError::UndefinedReference {
                reference: reference.to_string(),
            })
    }
}

fn compile_number(object: &SchemaObject) -> Option<NumberSchema> {
    let number = NumberSchema {
        minimum: object.minimum,
        maximum: object.maximum,
        exclusive_minimum: object.exclusive_minimum,
        exclusive_maximum: object.exclusive_maximum,
        multiple_of: object.multiple_of,
    };
    (number != NumberSchema::default()).then_some(number)
}

impl KeywordSchema {
    fn is_empty(&self) -> bool {
        self.types.is_none()
            && self.enum_values.is_none()
            && self.const_value.is_none()
            && self.string.is_none()
            && self.number.is_none()
            && self.array.is_none()
            && self.object.is_none()
            && self.all_of.is_none()
            && self.any_of.is_none()
            && self.one_of.is_none()
            && self.not.is_none()
    }
}
