use crate::block::{BlockHandle, Frame, Output};
use crate::coercion::str_value;
use crate::engine::Engine;
use crate::errors::{RenderError, Result};
use crate::sink::DiagnosticSink;
use crate::template::{Call, Node, Param};
use crate::truth::is_truthy;
use crate::value::Value;

/// Walks a node tree for one render. Holds the stack of iteration frames.
pub(crate) struct Renderer<'e> {
    engine: &'e Engine,
    frames: Vec<Frame>,
}

impl<'e> Renderer<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            frames: Vec::new(),
        }
    }

    pub fn render(&mut self, nodes: &[Node], ctx: &Value) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Mustache { call, escape } => {
                    let rendered = self.mustache(call, ctx)?;
                    match rendered {
                        Output::Text(s) if *escape => out.push_str(&escape_html(&s)),
                        other => out.push_str(other.as_str()),
                    }
                }
                Node::Block { call, body, inverse } => {
                    let rendered = self.invoke(call, body, inverse.as_deref(), ctx)?;
                    out.push_str(rendered.as_str());
                }
            }
        }
        Ok(out)
    }

    fn mustache(&mut self, call: &Call, ctx: &Value) -> Result<Output> {
        let is_helper = call
            .helper_name()
            .is_some_and(|name| self.engine.registry().contains(name));
        if is_helper {
            return self.invoke(call, &[], None, ctx);
        }
        if !call.params.is_empty() || !call.hash.is_empty() {
            return Err(RenderError::UnknownHelper(head_label(&call.head)));
        }
        Ok(Output::Text(str_value(&self.resolve(&call.head, ctx))))
    }

    fn invoke(
        &mut self,
        call: &Call,
        body: &[Node],
        inverse: Option<&[Node]>,
        ctx: &Value,
    ) -> Result<Output> {
        let name = call
            .helper_name()
            .ok_or_else(|| RenderError::UnknownHelper(head_label(&call.head)))?;
        let helper = self
            .engine
            .registry()
            .get(name)
            .ok_or_else(|| RenderError::UnknownHelper(name.to_string()))?;

        let arity = helper.arity();
        if !arity.contains(&call.params.len()) {
            let expected = if arity.start() == arity.end() {
                arity.start().to_string()
            } else {
                format!("{}..={}", arity.start(), arity.end())
            };
            return Err(RenderError::Arity {
                helper: name.to_string(),
                expected,
                got: call.params.len(),
            });
        }

        let args: Vec<Value> = call.params.iter().map(|p| self.resolve(p, ctx)).collect();
        let include_zero = self.engine.config().include_zero
            || call
                .hash_param("includeZero")
                .is_some_and(|p| is_truthy(&self.resolve(p, ctx)));

        tracing::trace!(helper = name, args = args.len(), "dispatching helper");
        let mut scope = Scope {
            renderer: self,
            primary: body,
            inverse,
            context: ctx,
            include_zero,
        };
        helper.call(&args, &mut scope)
    }

    fn resolve(&self, param: &Param, ctx: &Value) -> Value {
        match param {
            Param::Literal(v) => v.clone(),
            Param::Data(name) => self
                .frames
                .last()
                .map(|f| f.data(name))
                .unwrap_or_default(),
            Param::Path(segs) => {
                let mut cur = ctx;
                for seg in segs {
                    match cur.field(seg) {
                        Some(next) => cur = next,
                        None => {
                            tracing::trace!(path = %segs.join("."), "unresolved path");
                            return Value::Null;
                        }
                    }
                }
                cur.clone()
            }
        }
    }
}

/// Execution handle backing one directive invocation.
struct Scope<'s, 'e> {
    renderer: &'s mut Renderer<'e>,
    primary: &'s [Node],
    inverse: Option<&'s [Node]>,
    context: &'s Value,
    include_zero: bool,
}

impl BlockHandle for Scope<'_, '_> {
    fn render_primary(&mut self) -> Result<String> {
        self.renderer.render(self.primary, self.context)
    }

    fn render_inverse(&mut self) -> Result<String> {
        match self.inverse {
            Some(nodes) => self.renderer.render(nodes, self.context),
            None => Ok(String::new()),
        }
    }

    fn render_primary_with(&mut self, ctx: &Value) -> Result<String> {
        self.renderer.render(self.primary, ctx)
    }

    fn render_primary_iterated(&mut self, ctx: &Value, frame: &Frame) -> Result<String> {
        self.renderer.frames.push(frame.clone());
        let out = self.renderer.render(self.primary, ctx);
        self.renderer.frames.pop();
        out
    }

    fn current_context(&self) -> &Value {
        self.context
    }

    fn include_zero(&self) -> bool {
        self.include_zero
    }

    fn diagnostics(&self) -> &dyn DiagnosticSink {
        self.renderer.engine.sink()
    }
}

fn head_label(head: &Param) -> String {
    match head {
        Param::Path(segs) if segs.is_empty() => "this".to_string(),
        Param::Path(segs) => segs.join("."),
        Param::Data(name) => format!("@{name}"),
        Param::Literal(v) => str_value(v),
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
    out
}
