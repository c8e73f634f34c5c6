use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::block::{BlockHandle, Output};
use crate::errors::Result;
use crate::value::Value;

pub mod control;

pub use control::{each, equal, if_helper, log, lookup, unless, with};

/// A named helper the engine can dispatch a directive to.
///
/// `args` arrive already resolved and arity-checked against [`Helper::arity`].
pub trait Helper: Send + Sync {
    fn name(&self) -> &'static str;
    fn arity(&self) -> RangeInclusive<usize>;
    fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output>;
}

/// Thread-safe helper registry.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<&'static str, Arc<dyn Helper>>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut map: HashMap<&'static str, Arc<dyn Helper>> = HashMap::new();
        map.insert("if", Arc::new(builtins::If));
        map.insert("unless", Arc::new(builtins::Unless));
        map.insert("with", Arc::new(builtins::With));
        map.insert("each", Arc::new(builtins::Each));
        map.insert("equal", Arc::new(builtins::Equal));
        map.insert("lookup", Arc::new(builtins::Lookup));
        map.insert("log", Arc::new(builtins::Log));
        Self { inner: Arc::new(map) }
    }

    /// Adds `h`, replacing any helper already registered under its name.
    pub fn register<H: Helper + 'static>(&mut self, h: H) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(h.name(), Arc::new(h));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Helper>> {
        self.inner.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }
}

pub mod builtins {
    use super::*;
    use crate::coercion::str_value;

    fn arg(args: &[Value], i: usize) -> &Value {
        const ABSENT: &Value = &Value::Null;
        args.get(i).unwrap_or(ABSENT)
    }

    pub struct If;
    impl Helper for If {
        fn name(&self) -> &'static str { "if" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            if_helper(arg(args, 0), block).map(Output::Text)
        }
    }

    pub struct Unless;
    impl Helper for Unless {
        fn name(&self) -> &'static str { "unless" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            unless(arg(args, 0), block).map(Output::Text)
        }
    }

    pub struct With;
    impl Helper for With {
        fn name(&self) -> &'static str { "with" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            with(arg(args, 0), block).map(Output::Text)
        }
    }

    pub struct Each;
    impl Helper for Each {
        fn name(&self) -> &'static str { "each" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            each(arg(args, 0), block).map(Output::Text)
        }
    }

    pub struct Equal;
    impl Helper for Equal {
        fn name(&self) -> &'static str { "equal" }
        fn arity(&self) -> RangeInclusive<usize> { 2..=2 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            equal(arg(args, 0), arg(args, 1), block).map(Output::Text)
        }
    }

    pub struct Lookup;
    impl Helper for Lookup {
        fn name(&self) -> &'static str { "lookup" }
        fn arity(&self) -> RangeInclusive<usize> { 2..=2 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            let field = str_value(arg(args, 1));
            Ok(Output::Text(lookup(arg(args, 0), &field, block)))
        }
    }

    pub struct Log;
    impl Helper for Log {
        fn name(&self) -> &'static str { "log" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, args: &[Value], block: &mut dyn BlockHandle) -> Result<Output> {
            let message = str_value(arg(args, 0));
            Ok(Output::Text(log(&message, block)))
        }
    }
}
