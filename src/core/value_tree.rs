//! core::value_tree
//!
//! Bound placeholder trees and value marshalling.
//!
//! # Design
//!
//! A [`ValueTree`] binds every field of a resolved schema to a placeholder
//! created by a caller-supplied [`PlaceholderFactory`]. The core only ever
//! reads and writes placeholder text; what a placeholder looks like on screen
//! is the caller's business.
//!
//! - [`ValueTree::collect`] turns placeholder text into a nested [`Value`]
//!   shaped exactly like the schema.
//! - [`ValueTree::refresh`] writes an incoming nested value into the
//!   placeholders for display.
//!
//! Time fields are bound as two placeholders, `secs` and `nsecs`. On collect
//! they always produce the current wall-clock time with `nsecs = 0`, whatever
//! is displayed.
//!
//! Placeholders are addressed by dotted paths: `pos.x`, `header.stamp.secs`,
//! `poses[1].position.z`.
//!
//! [`BoundTree`] wraps a tree whose schema is still being resolved and guards
//! every write with a [`Liveness`] token so a torn-down consumer is never
//! written to.
//!
//! # Example
//!
//! ```
//! use rosdesk::core::schema::FieldSchema;
//! use rosdesk::core::types::ScalarTag;
//! use rosdesk::core::value::Value;
//! use rosdesk::core::value_tree::{TextFactory, ValueTree};
//!
//! let schema = vec![FieldSchema::primitive("x", ScalarTag::Float32)];
//! let mut tree = ValueTree::build(&schema, None, TextFactory);
//! tree.set_text("x", "1.5").unwrap();
//!
//! let value = tree.collect().unwrap();
//! assert_eq!(value.get("x"), Some(&Value::Number(1.5)));
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::format::NumberFormat;
use super::resolver::{ResolveError, ResolvedSchema};
use super::schema::{FieldKind, FieldSchema};
use super::types::ScalarTag;
use super::value::{Record, Value};

/// Sub-field names of a time value.
pub const SECS: &str = "secs";
pub const NSECS: &str = "nsecs";

/// Errors from value tree operations.
#[derive(Debug, Error)]
pub enum ValueTreeError {
    /// The schema is still being resolved.
    #[error("schema resolution has not completed")]
    NotReady,

    /// The owning consumer has been torn down.
    #[error("value tree is detached from its consumer")]
    Detached,

    /// Schema resolution failed earlier.
    #[error("schema resolution failed: {0}")]
    Failed(String),

    /// Schema resolution failed during binding.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Strict mode rejected a non-numeric value in a numeric field.
    #[error("invalid {tag} value '{text}' at {path}")]
    InvalidInput {
        path: String,
        text: String,
        tag: ScalarTag,
    },

    /// The path does not name a placeholder or field.
    #[error("no field at {0}")]
    UnknownField(String),

    /// The path names a field that is not an array of composites.
    #[error("{0} is not an array of composites")]
    NotAnArray(String),
}

/// An opaque display slot owned by the consumer.
pub trait Placeholder: std::fmt::Debug + Send {
    /// Current display text.
    fn text(&self) -> String;

    /// Replace the display text.
    fn set_text(&mut self, text: &str);
}

/// Creates placeholders for newly bound fields.
pub trait PlaceholderFactory: Send {
    type Placeholder: Placeholder;

    /// Create a placeholder for `path` showing `initial`.
    fn create(&mut self, path: &str, initial: &str) -> Self::Placeholder;
}

/// In-memory placeholder holding plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPlaceholder {
    path: String,
    text: String,
}

impl TextPlaceholder {
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Placeholder for TextPlaceholder {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// Factory for [`TextPlaceholder`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFactory;

impl PlaceholderFactory for TextFactory {
    type Placeholder = TextPlaceholder;

    fn create(&mut self, path: &str, initial: &str) -> TextPlaceholder {
        TextPlaceholder {
            path: path.to_string(),
            text: initial.to_string(),
        }
    }
}

/// How a field is bound.
#[derive(Debug)]
pub enum Binding<P> {
    /// One placeholder for a primitive (array or scalar).
    Primitive(P),
    /// Two placeholders for a time value.
    Time { secs: P, nsecs: P },
    /// Nested fields of a composite scalar.
    Composite(Vec<ValueNode<P>>),
    /// One sub-tree per element of a composite array.
    Elements(Vec<Vec<ValueNode<P>>>),
}

/// One schema field bound to its placeholders.
#[derive(Debug)]
pub struct ValueNode<P> {
    field: FieldSchema,
    path: String,
    binding: Binding<P>,
}

impl<P: Placeholder> ValueNode<P> {
    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn field(&self) -> &FieldSchema {
        &self.field
    }

    pub fn binding(&self) -> &Binding<P> {
        &self.binding
    }

    /// Add one blank element to a composite array and return its fields.
    pub fn append<F>(&mut self, factory: &mut F) -> Result<&[ValueNode<P>], ValueTreeError>
    where
        F: PlaceholderFactory<Placeholder = P>,
    {
        let ValueNode {
            field,
            path,
            binding,
        } = self;
        let (Binding::Elements(elements), Some(children)) = (binding, field.children()) else {
            return Err(ValueTreeError::NotAnArray(path.clone()));
        };

        let element_path = element_path(path, elements.len());
        elements.push(build_nodes(children, &element_path, None, factory));
        Ok(elements.last().map(Vec::as_slice).unwrap_or_default())
    }
}

/// A schema bound to placeholders.
pub struct ValueTree<F: PlaceholderFactory> {
    factory: F,
    nodes: Vec<ValueNode<F::Placeholder>>,
    format: NumberFormat,
    strict: bool,
}

impl<F: PlaceholderFactory> std::fmt::Debug for ValueTree<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueTree")
            .field("nodes", &self.nodes)
            .field("format", &self.format)
            .field("strict", &self.strict)
            .finish()
    }
}

impl<F: PlaceholderFactory> ValueTree<F> {
    /// Bind `schema` to fresh placeholders.
    ///
    /// `saved` is a value previously produced by [`collect`](Self::collect);
    /// its entries become the initial display text. A composite array gets
    /// one sub-tree per saved element, or a single blank element when
    /// nothing was saved.
    pub fn build(schema: &[FieldSchema], saved: Option<&Value>, mut factory: F) -> Self {
        let nodes = build_nodes(schema, "", saved, &mut factory);
        Self {
            factory,
            nodes,
            format: NumberFormat::default(),
            strict: false,
        }
    }

    /// Use `format` when refreshing numeric scalars.
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    /// Reject non-numeric text in numeric fields on collect.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn nodes(&self) -> &[ValueNode<F::Placeholder>] {
        &self.nodes
    }

    pub fn format(&self) -> NumberFormat {
        self.format
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Find the node bound to a field path.
    pub fn node(&self, path: &str) -> Option<&ValueNode<F::Placeholder>> {
        find_node(&self.nodes, path)
    }

    /// Display text of the placeholder at `path`.
    pub fn text(&self, path: &str) -> Option<String> {
        find_placeholder(&self.nodes, path).map(Placeholder::text)
    }

    /// Write display text into the placeholder at `path`.
    pub fn set_text(&mut self, path: &str, text: &str) -> Result<(), ValueTreeError> {
        let placeholder = find_placeholder_mut(&mut self.nodes, path)
            .ok_or_else(|| ValueTreeError::UnknownField(path.to_string()))?;
        placeholder.set_text(text);
        Ok(())
    }

    /// Every placeholder as `(path, text)`, in schema order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        visit_placeholders(&self.nodes, &mut |path: &str, p: &F::Placeholder| {
            out.push((path.to_string(), p.text()))
        });
        out
    }

    /// Add one blank element to the composite array at `path`.
    ///
    /// Returns the index of the new element.
    pub fn append(&mut self, path: &str) -> Result<usize, ValueTreeError> {
        let node = find_node_mut(&mut self.nodes, path)
            .ok_or_else(|| ValueTreeError::UnknownField(path.to_string()))?;
        node.append(&mut self.factory)?;
        match &node.binding {
            Binding::Elements(elements) => Ok(elements.len() - 1),
            _ => Err(ValueTreeError::NotAnArray(path.to_string())),
        }
    }

    /// Collect placeholder text into a nested value, stamping time fields
    /// with the current wall-clock second.
    pub fn collect(&self) -> Result<Value, ValueTreeError> {
        self.collect_at(chrono::Utc::now().timestamp())
    }

    /// Collect with time fields stamped as `now_secs`.
    pub fn collect_at(&self, now_secs: i64) -> Result<Value, ValueTreeError> {
        let ctx = CollectCtx {
            now_secs,
            strict: self.strict,
        };
        collect_nodes(&self.nodes, &ctx).map(Value::Record)
    }

    /// Display an incoming nested value.
    ///
    /// Fields missing from `incoming` keep their current text. Composite
    /// arrays are resized to the incoming element count.
    pub fn refresh(&mut self, incoming: &Value) {
        refresh_nodes(&mut self.nodes, incoming, &mut self.factory, self.format);
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn element_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// The part of `path` below `node_path`, if `path` lies inside that node.
fn below<'p>(path: &'p str, node_path: &str) -> Option<&'p str> {
    path.strip_prefix(node_path)
        .filter(|rest| rest.starts_with('.') || rest.starts_with('['))
}

fn bracketed(items: &[Value]) -> String {
    let inner: Vec<String> = items.iter().map(Value::to_plain_string).collect();
    format!("[{}]", inner.join(","))
}

fn initial_text(saved: Option<&Value>, is_array: bool) -> String {
    match saved {
        None | Some(Value::Undefined) if is_array => "[]".to_string(),
        None | Some(Value::Undefined) => String::new(),
        Some(Value::List(items)) => bracketed(items),
        Some(value) => value.to_plain_string(),
    }
}

fn build_nodes<F: PlaceholderFactory>(
    fields: &[FieldSchema],
    prefix: &str,
    saved: Option<&Value>,
    factory: &mut F,
) -> Vec<ValueNode<F::Placeholder>> {
    fields
        .iter()
        .map(|field| {
            let path = join_path(prefix, &field.name);
            let saved = saved.and_then(|s| s.get(&field.name));
            build_node(field, path, saved, factory)
        })
        .collect()
}

fn build_node<F: PlaceholderFactory>(
    field: &FieldSchema,
    path: String,
    saved: Option<&Value>,
    factory: &mut F,
) -> ValueNode<F::Placeholder> {
    let binding = match &field.kind {
        FieldKind::Primitive { .. } => {
            Binding::Primitive(factory.create(&path, &initial_text(saved, field.is_array())))
        }
        FieldKind::Time => {
            let part = |name| {
                saved
                    .and_then(|s| s.get(name))
                    .map(Value::to_plain_string)
                    .unwrap_or_default()
            };
            Binding::Time {
                secs: factory.create(&join_path(&path, SECS), &part(SECS)),
                nsecs: factory.create(&join_path(&path, NSECS), &part(NSECS)),
            }
        }
        FieldKind::Composite { fields, .. } if field.is_array() => {
            let elements = match saved.and_then(Value::as_list).filter(|l| !l.is_empty()) {
                Some(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| build_nodes(fields, &element_path(&path, i), Some(item), factory))
                    .collect(),
                None => vec![build_nodes(fields, &element_path(&path, 0), None, factory)],
            };
            Binding::Elements(elements)
        }
        FieldKind::Composite { fields, .. } => {
            Binding::Composite(build_nodes(fields, &path, saved, factory))
        }
    };

    ValueNode {
        field: field.clone(),
        path,
        binding,
    }
}

fn find_node<'a, P>(nodes: &'a [ValueNode<P>], path: &str) -> Option<&'a ValueNode<P>> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if below(path, &node.path).is_none() {
            continue;
        }
        return match &node.binding {
            Binding::Composite(children) => find_node(children, path),
            Binding::Elements(elements) => elements.iter().find_map(|e| find_node(e, path)),
            _ => None,
        };
    }
    None
}

fn find_node_mut<'a, P>(nodes: &'a mut [ValueNode<P>], path: &str) -> Option<&'a mut ValueNode<P>> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return Some(node);
        }
        if below(path, &node.path).is_none() {
            continue;
        }
        return match &mut node.binding {
            Binding::Composite(children) => find_node_mut(children, path),
            Binding::Elements(elements) => elements.iter_mut().find_map(|e| find_node_mut(e, path)),
            _ => None,
        };
    }
    None
}

fn find_placeholder<'a, P>(nodes: &'a [ValueNode<P>], path: &str) -> Option<&'a P> {
    for node in nodes {
        if node.path == path {
            return match &node.binding {
                Binding::Primitive(p) => Some(p),
                _ => None,
            };
        }
        let Some(rest) = below(path, &node.path) else {
            continue;
        };
        return match &node.binding {
            Binding::Time { secs, nsecs } => match rest {
                ".secs" => Some(secs),
                ".nsecs" => Some(nsecs),
                _ => None,
            },
            Binding::Composite(children) => find_placeholder(children, path),
            Binding::Elements(elements) => elements.iter().find_map(|e| find_placeholder(e, path)),
            Binding::Primitive(_) => None,
        };
    }
    None
}

fn find_placeholder_mut<'a, P>(nodes: &'a mut [ValueNode<P>], path: &str) -> Option<&'a mut P> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return match &mut node.binding {
                Binding::Primitive(p) => Some(p),
                _ => None,
            };
        }
        let Some(rest) = below(path, &node.path) else {
            continue;
        };
        return match &mut node.binding {
            Binding::Time { secs, nsecs } => match rest {
                ".secs" => Some(secs),
                ".nsecs" => Some(nsecs),
                _ => None,
            },
            Binding::Composite(children) => find_placeholder_mut(children, path),
            Binding::Elements(elements) => elements
                .iter_mut()
                .find_map(|e| find_placeholder_mut(e, path)),
            Binding::Primitive(_) => None,
        };
    }
    None
}

fn visit_placeholders<P: Placeholder>(nodes: &[ValueNode<P>], visit: &mut dyn FnMut(&str, &P)) {
    for node in nodes {
        match &node.binding {
            Binding::Primitive(p) => visit(&node.path, p),
            Binding::Time { secs, nsecs } => {
                visit(&join_path(&node.path, SECS), secs);
                visit(&join_path(&node.path, NSECS), nsecs);
            }
            Binding::Composite(children) => visit_placeholders(children, visit),
            Binding::Elements(elements) => {
                for element in elements {
                    visit_placeholders(element, visit);
                }
            }
        }
    }
}

struct CollectCtx {
    now_secs: i64,
    strict: bool,
}

fn collect_nodes<P: Placeholder>(
    nodes: &[ValueNode<P>],
    ctx: &CollectCtx,
) -> Result<Record, ValueTreeError> {
    let mut record = Record::with_capacity(nodes.len());
    for node in nodes {
        record.insert(node.field.name.clone(), collect_node(node, ctx)?);
    }
    Ok(record)
}

fn collect_node<P: Placeholder>(node: &ValueNode<P>, ctx: &CollectCtx) -> Result<Value, ValueTreeError> {
    match (&node.binding, &node.field.kind) {
        (Binding::Primitive(p), FieldKind::Primitive { tag }) => {
            collect_primitive(&p.text(), *tag, node.field.is_array(), &node.path, ctx.strict)
        }
        (Binding::Primitive(p), _) => Ok(Value::coerce(&p.text())),
        // Displayed secs/nsecs are not read back.
        (Binding::Time { .. }, _) => Ok(Value::record([
            (SECS, Value::Number(ctx.now_secs as f64)),
            (NSECS, Value::Number(0.0)),
        ])),
        (Binding::Composite(children), _) => collect_nodes(children, ctx).map(Value::Record),
        (Binding::Elements(elements), _) => elements
            .iter()
            .map(|element| collect_nodes(element, ctx).map(Value::Record))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
    }
}

fn collect_primitive(
    text: &str,
    tag: ScalarTag,
    is_array: bool,
    path: &str,
    strict: bool,
) -> Result<Value, ValueTreeError> {
    if text.trim().is_empty() {
        return Ok(Value::Undefined);
    }
    if !is_array {
        return coerce_checked(text, tag, path, strict);
    }

    let trimmed = text.trim();
    let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Ok(Value::List(Vec::new()));
    }

    inner
        .split(',')
        .map(|element| coerce_checked(element, tag, path, strict))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

fn coerce_checked(
    text: &str,
    tag: ScalarTag,
    path: &str,
    strict: bool,
) -> Result<Value, ValueTreeError> {
    let value = Value::coerce(text);
    if strict && tag.is_numeric() && !matches!(value, Value::Number(_)) {
        return Err(ValueTreeError::InvalidInput {
            path: path.to_string(),
            text: text.to_string(),
            tag,
        });
    }
    Ok(value)
}

fn refresh_nodes<F: PlaceholderFactory>(
    nodes: &mut [ValueNode<F::Placeholder>],
    incoming: &Value,
    factory: &mut F,
    format: NumberFormat,
) {
    for node in nodes.iter_mut() {
        match incoming.get(&node.field.name) {
            Some(value) if !value.is_undefined() => refresh_node(node, value, factory, format),
            _ => {}
        }
    }
}

fn refresh_node<F: PlaceholderFactory>(
    node: &mut ValueNode<F::Placeholder>,
    value: &Value,
    factory: &mut F,
    format: NumberFormat,
) {
    let ValueNode {
        field,
        path,
        binding,
    } = node;

    match binding {
        Binding::Primitive(p) => p.set_text(&display_text(value, format)),
        Binding::Time { secs, nsecs } => {
            if let Some(v) = value.get(SECS) {
                secs.set_text(&v.to_plain_string());
            }
            if let Some(v) = value.get(NSECS) {
                nsecs.set_text(&v.to_plain_string());
            }
        }
        Binding::Composite(children) => match value {
            Value::Record(_) => refresh_nodes(children, value, factory, format),
            _ => tracing::debug!(path = %path, "skipping non-record value for composite field"),
        },
        Binding::Elements(elements) => {
            let (Some(items), Some(element_schema)) = (value.as_list(), field.children()) else {
                tracing::debug!(path = %path, "skipping non-list value for array field");
                return;
            };

            elements.truncate(items.len());
            while elements.len() < items.len() {
                let element_path = element_path(path, elements.len());
                elements.push(build_nodes(element_schema, &element_path, None, factory));
            }
            for (element, item) in elements.iter_mut().zip(items) {
                refresh_nodes(element, item, factory, format);
            }
        }
    }
}

fn display_text(value: &Value, format: NumberFormat) -> String {
    match value {
        Value::List(items) => bracketed(items),
        Value::Number(n) => format.render(*n),
        other => other.to_plain_string(),
    }
}

/// Shared flag telling asynchronous work whether its consumer still exists.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the consumer as gone. Every clone observes this.
    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Binding state of a [`BoundTree`].
#[derive(Debug)]
pub enum BindState<F: PlaceholderFactory> {
    /// Resolution has not completed.
    Pending,
    /// Resolved and bound.
    Ready {
        schema: ResolvedSchema,
        tree: ValueTree<F>,
    },
    /// Resolution failed.
    Failed(String),
}

/// A value tree whose schema is resolved asynchronously.
///
/// Every operation checks the liveness token first; after teardown they
/// fail with [`ValueTreeError::Detached`].
#[derive(Debug)]
pub struct BoundTree<F: PlaceholderFactory> {
    liveness: Liveness,
    state: BindState<F>,
}

impl<F: PlaceholderFactory> BoundTree<F> {
    /// A pending tree guarded by `liveness`.
    pub fn new(liveness: Liveness) -> Self {
        Self {
            liveness,
            state: BindState::Pending,
        }
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn state(&self) -> &BindState<F> {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, BindState::Ready { .. })
    }

    /// Await `resolution`, then bind its fields with `build`.
    ///
    /// A result arriving after the liveness token was revoked is discarded.
    pub async fn bind<R, B>(&mut self, resolution: R, build: B) -> Result<(), ValueTreeError>
    where
        R: Future<Output = Result<ResolvedSchema, ResolveError>>,
        B: FnOnce(&[FieldSchema]) -> ValueTree<F>,
    {
        self.check_alive()?;
        let result = resolution.await;

        if !self.liveness.is_alive() {
            tracing::debug!("discarding schema resolved after teardown");
            return Err(ValueTreeError::Detached);
        }

        match result {
            Ok(schema) => {
                let tree = build(&schema.fields);
                self.state = BindState::Ready { schema, tree };
                Ok(())
            }
            Err(e) => {
                self.state = BindState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn schema(&self) -> Option<&ResolvedSchema> {
        match &self.state {
            BindState::Ready { schema, .. } => Some(schema),
            _ => None,
        }
    }

    /// The bound tree, once ready and while alive.
    pub fn tree(&self) -> Result<&ValueTree<F>, ValueTreeError> {
        self.check_alive()?;
        match &self.state {
            BindState::Ready { tree, .. } => Ok(tree),
            BindState::Pending => Err(ValueTreeError::NotReady),
            BindState::Failed(msg) => Err(ValueTreeError::Failed(msg.clone())),
        }
    }

    pub fn tree_mut(&mut self) -> Result<&mut ValueTree<F>, ValueTreeError> {
        self.check_alive()?;
        match &mut self.state {
            BindState::Ready { tree, .. } => Ok(tree),
            BindState::Pending => Err(ValueTreeError::NotReady),
            BindState::Failed(msg) => Err(ValueTreeError::Failed(msg.clone())),
        }
    }

    pub fn collect(&self) -> Result<Value, ValueTreeError> {
        self.tree()?.collect()
    }

    pub fn collect_at(&self, now_secs: i64) -> Result<Value, ValueTreeError> {
        self.tree()?.collect_at(now_secs)
    }

    pub fn refresh(&mut self, incoming: &Value) -> Result<(), ValueTreeError> {
        self.tree_mut()?.refresh(incoming);
        Ok(())
    }

    pub fn set_text(&mut self, path: &str, text: &str) -> Result<(), ValueTreeError> {
        self.tree_mut()?.set_text(path, text)
    }

    pub fn append(&mut self, path: &str) -> Result<usize, ValueTreeError> {
        self.tree_mut()?.append(path)
    }

    /// Revoke the liveness token and drop the placeholders.
    pub fn teardown(&mut self) {
        self.liveness.revoke();
        self.state = BindState::Pending;
    }

    fn check_alive(&self) -> Result<(), ValueTreeError> {
        if self.liveness.is_alive() {
            Ok(())
        } else {
            Err(ValueTreeError::Detached)
        }
    }
}
