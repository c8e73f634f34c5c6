use std::sync::Arc;

use crate::config::RenderConfig;
use crate::errors::Result;
use crate::helpers::Registry;
use crate::render::Renderer;
use crate::sink::{DiagnosticSink, TracingSink};
use crate::template::Template;
use crate::value::Value;

/// =========================
/// Public API (Engine)
/// =========================

/// Renders templates with a helper registry, a config and a diagnostic sink.
///
/// An `Engine` holds no per-render state, so one instance can serve
/// concurrent renders from several threads.
#[derive(Clone)]
pub struct Engine {
    config: RenderConfig,
    registry: Registry,
    sink: Arc<dyn DiagnosticSink>,
}

impl Engine {
    pub fn new(registry: Registry) -> Self {
        Self {
            config: RenderConfig::default(),
            registry,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Routes `log` output to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    pub fn render_template(&self, template: &Template, data: &Value) -> Result<String> {
        Renderer::new(self).render(&template.nodes, data)
    }

    pub fn render(&self, src: &str, data: &Value) -> Result<String> {
        let template = Template::parse(src)?;
        self.render_template(&template, data)
    }

    /// Parses `json` as the render context first.
    pub fn render_json(&self, src: &str, json: &str) -> Result<String> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        self.render(src, &Value::from(data))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Registry::with_builtins())
    }
}

/// =========================
/// Public API (Library funcs)
/// =========================

/// Convenience: render with the built-in helpers and default config.
pub fn render(src: &str, data: &Value) -> Result<String> {
    Engine::default().render(src, data)
}

/// Renders, coercing any error to empty text.
pub fn render_or_empty(src: &str, data: &Value) -> String {
    render(src, data).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "render failed, emitting empty text");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockHandle, Output, SafeString};
    use crate::helpers::Helper;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::ops::RangeInclusive;

    fn data(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn nested_each_sees_innermost_frame() {
        let tpl = "{{#each rows}}[{{@index}}:{{#each this}}{{@index}}{{/each}}]{{/each}}";
        let out = render(tpl, &data(json!({"rows": [["a", "b"], ["c"]]}))).unwrap();
        assert_eq!(out, "[0:01][1:0]");
    }

    #[test]
    fn with_does_not_leak_into_siblings() {
        let tpl = "{{#with inner}}{{name}}{{/with}}-{{name}}";
        let out = render(tpl, &data(json!({"name": "outer", "inner": {"name": "in"}}))).unwrap();
        assert_eq!(out, "in-outer");
    }

    #[test]
    fn frames_do_not_outlive_iteration() {
        let tpl = "{{#each xs}}{{@index}}{{/each}}|{{@index}}";
        let out = render(tpl, &data(json!({"xs": [1, 2]}))).unwrap();
        assert_eq!(out, "01|");
    }

    #[test]
    fn config_enables_include_zero() {
        let tpl = "{{#if n}}yes{{else}}no{{/if}}";
        let d = data(json!({"n": 0}));
        assert_eq!(render(tpl, &d).unwrap(), "no");
        let engine = Engine::default().with_config(RenderConfig { include_zero: true });
        assert_eq!(engine.render(tpl, &d).unwrap(), "yes");
    }

    struct Wrap;
    impl Helper for Wrap {
        fn name(&self) -> &'static str { "wrap" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            let inner = block.render_primary()?;
            Ok(SafeString(format!("<b>{}{inner}</b>", args[0])).into())
        }
    }

    #[test]
    fn safe_output_skips_escaping() {
        let mut registry = Registry::with_builtins();
        registry.register(Wrap);
        let engine = Engine::new(registry);
        assert_eq!(engine.render("{{wrap x}}", &data(json!({"x": "<i>"}))).unwrap(), "<b><i></b>");
        assert_eq!(engine.render("{{x}}", &data(json!({"x": "<i>"}))).unwrap(), "&lt;i&gt;");
        assert_eq!(engine.render("{{{x}}}", &data(json!({"x": "<i>"}))).unwrap(), "<i>");
    }

    struct FullName;
    impl Helper for FullName {
        fn name(&self) -> &'static str { "fullname" }
        fn arity(&self) -> RangeInclusive<usize> { 0..=0 }
        fn call(&self, _args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            let ctx = block.current_context();
            let part = |k: &str| ctx.field(k).map(ToString::to_string).unwrap_or_default();
            Ok(SafeString(format!("<b>{} {}</b>", part("first"), part("last"))).into())
        }
    }

    #[test]
    fn helper_sees_current_context() {
        let mut registry = Registry::with_builtins();
        registry.register(FullName);
        let engine = Engine::new(registry);
        let d = data(json!({
            "first": "Root", "last": "R",
            "author": {"first": "Alan", "last": "Johnson"},
            "people": [{"first": "Ada", "last": "L"}, {"first": "Bo", "last": "M"}]
        }));

        assert_eq!(engine.render("{{fullname}}", &d).unwrap(), "<b>Root R</b>");
        assert_eq!(
            engine.render("{{#with author}}{{fullname}}{{/with}}", &d).unwrap(),
            "<b>Alan Johnson</b>"
        );
        assert_eq!(
            engine.render("{{#each people}}{{fullname}},{{/each}}", &d).unwrap(),
            "<b>Ada L</b>,<b>Bo M</b>,"
        );
    }

    #[test]
    fn render_or_empty_swallows_errors() {
        assert_eq!(render_or_empty("{{#nope}}x{{/nope}}", &Value::Null), "");
        assert_eq!(render_or_empty("ok", &Value::Null), "ok");
    }
}
