use crate::block::{BlockHandle, Frame};
use crate::coercion::{loose_eq, str_value};
use crate::container::Container;
use crate::errors::Result;
use crate::truth::{is_truthy, is_zero};
use crate::value::Value;

fn includable_zero(condition: &Value, block: &dyn BlockHandle) -> bool {
    block.include_zero() && is_zero(condition)
}

/// `{{#if cond}}`: main body when `cond` is truthy, else the inverse.
pub fn if_helper(condition: &Value, block: &mut dyn BlockHandle) -> Result<String> {
    if includable_zero(condition, block) || is_truthy(condition) {
        block.render_primary()
    } else {
        block.render_inverse()
    }
}

/// `{{#unless cond}}`: `if` with the bodies swapped.
pub fn unless(condition: &Value, block: &mut dyn BlockHandle) -> Result<String> {
    if includable_zero(condition, block) || is_truthy(condition) {
        block.render_inverse()
    } else {
        block.render_primary()
    }
}

/// `{{#with ctx}}`: renders the main body once with `ctx` as its context.
pub fn with(context: &Value, block: &mut dyn BlockHandle) -> Result<String> {
    if is_truthy(context) {
        block.render_primary_with(context)
    } else {
        block.render_inverse()
    }
}

/// `{{#each ctx}}`: renders the main body once per entry of `ctx`.
///
/// Sequences go in index order and records in field declaration order.
/// Mappings visit every key exactly once in an unspecified order. A truthy
/// scalar yields no iterations and empty text.
pub fn each(context: &Value, block: &mut dyn BlockHandle) -> Result<String> {
    if !is_truthy(context) {
        return block.render_inverse();
    }

    let Some(container) = Container::of(context) else {
        tracing::trace!(?context, "each over a scalar, nothing to iterate");
        return Ok(String::new());
    };

    let length = container.len();
    let mut out = String::new();
    for (index, (key, item)) in container.entries().enumerate() {
        let frame = Frame::new(length, index, key);
        out.push_str(&block.render_primary_iterated(item, &frame)?);
    }
    Ok(out)
}

/// `{{#equal a b}}`: main body when both sides print the same; no inverse.
pub fn equal(a: &Value, b: &Value, block: &mut dyn BlockHandle) -> Result<String> {
    if loose_eq(a, b) {
        block.render_primary()
    } else {
        Ok(String::new())
    }
}

/// `{{lookup obj "field"}}`: the printed form of one field, empty when missing.
pub fn lookup(object: &Value, field: &str, block: &dyn BlockHandle) -> String {
    str_value(&block.resolve_field(object, field))
}

/// `{{log msg}}`: writes to the diagnostic sink, renders nothing.
pub fn log(message: &str, block: &dyn BlockHandle) -> String {
    block.diagnostics().log(message);
    String::new()
}
