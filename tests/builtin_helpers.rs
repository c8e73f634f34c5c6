use std::sync::{Arc, Mutex};

use block_helpers as bh;
use bh::block::{BlockHandle, Frame};
use bh::helpers;
use bh::sink::DiagnosticSink;
use bh::{Result, Value};

#[derive(Default)]
struct Recording(Mutex<Vec<String>>);

impl DiagnosticSink for Recording {
    fn log(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// Body text echoes the context it was rendered against; records every call.
struct Echo {
    ctx: Value,
    calls: Vec<String>,
    sink: Recording,
}

impl Echo {
    fn new(ctx: Value) -> Self {
        Self { ctx, calls: Vec::new(), sink: Recording::default() }
    }
}

impl BlockHandle for Echo {
    fn render_primary(&mut self) -> Result<String> {
        self.calls.push("primary".into());
        Ok(format!("fn({})", self.ctx))
    }

    fn render_inverse(&mut self) -> Result<String> {
        self.calls.push("inverse".into());
        Ok("inverse".into())
    }

    fn render_primary_with(&mut self, ctx: &Value) -> Result<String> {
        self.calls.push("with".into());
        Ok(format!("fn({ctx})"))
    }

    fn render_primary_iterated(&mut self, ctx: &Value, frame: &Frame) -> Result<String> {
        self.calls.push(format!("iter{}", frame.index));
        Ok(format!("{}/{}={ctx} ", frame.index, frame.length))
    }

    fn current_context(&self) -> &Value {
        &self.ctx
    }

    fn diagnostics(&self) -> &dyn DiagnosticSink {
        &self.sink
    }
}

#[test]
fn test_if_renders_against_current_context() {
    let mut h = Echo::new(Value::from("ctx"));
    assert_eq!(helpers::if_helper(&Value::Int(3), &mut h).unwrap(), "fn(ctx)");
    assert_eq!(h.calls, vec!["primary"]);
}

#[test]
fn test_with_exactly_one_render() {
    let mut h = Echo::new(Value::from("outer"));
    assert_eq!(helpers::with(&Value::from("inner"), &mut h).unwrap(), "fn(inner)");
    assert_eq!(h.calls, vec!["with"]);
    assert_eq!(h.current_context(), &Value::from("outer"));
}

#[test]
fn test_each_invokes_in_order() {
    let mut h = Echo::new(Value::Null);
    let out = helpers::each(&Value::from(vec![10, 20, 30]), &mut h).unwrap();
    assert_eq!(out, "0/3=10 1/3=20 2/3=30 ");
    assert_eq!(h.calls, vec!["iter0", "iter1", "iter2"]);
}

#[test]
fn test_equal_coerces() {
    let mut h = Echo::new(Value::Null);
    assert_eq!(helpers::equal(&Value::Int(1), &Value::from("1"), &mut h).unwrap(), "fn()");
    assert_eq!(helpers::equal(&Value::Int(1), &Value::Int(0), &mut h).unwrap(), "");
    assert_eq!(h.calls, vec!["primary"]);
}

#[test]
fn test_lookup_absent_is_empty() {
    let h = Echo::new(Value::Null);
    let obj = Value::from(serde_json::json!({"n": 1.0}));
    assert_eq!(helpers::lookup(&obj, "n", &h), "1");
    assert_eq!(helpers::lookup(&obj, "zz", &h), "");
    assert_eq!(helpers::lookup(&Value::Int(5), "n", &h), "");
}

#[test]
fn test_log_goes_to_injected_sink() {
    let h = Echo::new(Value::Null);
    assert_eq!(helpers::log("first", &h), "");
    assert_eq!(helpers::log("", &h), "");
    assert_eq!(*h.sink.0.lock().unwrap(), vec!["first".to_string(), String::new()]);
}

#[test]
fn test_engine_log_uses_configured_sink() {
    let sink = Arc::new(Recording::default());
    let engine = bh::Engine::default().with_sink(sink.clone());
    let d = Value::from(serde_json::json!({"who": "world", "n": 2}));
    assert_eq!(engine.render("{{log who}}{{log n}}done", &d).unwrap(), "done");
    assert_eq!(*sink.0.lock().unwrap(), vec!["world".to_string(), "2".to_string()]);
}

#[test]
fn test_registry_dispatch_matches_free_functions() {
    let registry = bh::Registry::with_builtins();
    let each = registry.get("each").unwrap();
    let mut h = Echo::new(Value::Null);
    let out = each.call(&[Value::from(vec!["a"])], &mut h).unwrap();
    assert_eq!(out.into_string(), "0/1=a ");
}

#[test]
fn test_engine_shared_across_threads() {
    let sink = Arc::new(Recording::default());
    let engine = bh::Engine::default().with_sink(sink.clone());

    let outputs: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let engine = &engine;
                s.spawn(move || {
                    let d = Value::from(serde_json::json!({"xs": [t, t + 1], "tag": format!("t{t}")}));
                    engine.render("{{#each xs}}{{this}}{{/each}}{{log tag}}", &d).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let expected: Vec<String> = (0..8).map(|t| format!("{t}{}", t + 1)).collect();
    assert_eq!(outputs, expected);

    let mut logged = sink.0.lock().unwrap().clone();
    logged.sort();
    let mut want: Vec<String> = (0..8).map(|t| format!("t{t}")).collect();
    want.sort();
    assert_eq!(logged, want);
}
