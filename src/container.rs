use std::collections::HashMap;

use crate::value::{Record, Value};

/// Iterable view over the three container kinds `each` understands.
///
/// Every view exposes a length and positional entries, so iteration is a
/// plain index loop regardless of the underlying kind.
#[derive(Debug)]
pub enum Container<'a> {
    Sequence(SequenceView<'a>),
    Mapping(MappingView<'a>),
    Record(RecordView<'a>),
}

impl<'a> Container<'a> {
    /// Returns `None` for scalars.
    pub fn of(v: &'a Value) -> Option<Self> {
        match v {
            Value::Seq(items) => Some(Container::Sequence(SequenceView { items })),
            Value::Map(map) => Some(Container::Mapping(MappingView::new(map))),
            Value::Record(record) => Some(Container::Record(RecordView { record })),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Container::Sequence(s) => s.len(),
            Container::Mapping(m) => m.len(),
            Container::Record(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key and value at position `i`. Sequences have no key.
    pub fn entry_at(&self, i: usize) -> Option<(Option<&'a str>, &'a Value)> {
        match self {
            Container::Sequence(s) => s.entry_at(i).map(|v| (None, v)),
            Container::Mapping(m) => m.entry_at(i).map(|(k, v)| (Some(k), v)),
            Container::Record(r) => r.entry_at(i).map(|(k, v)| (Some(k), v)),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (Option<&'a str>, &'a Value)> + '_ {
        (0..self.len()).filter_map(move |i| self.entry_at(i))
    }
}

#[derive(Debug)]
pub struct SequenceView<'a> {
    items: &'a [Value],
}

impl<'a> SequenceView<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn entry_at(&self, i: usize) -> Option<&'a Value> {
        self.items.get(i)
    }
}

/// Snapshot of a mapping's keys. Order is whatever the map yields and is
/// not stable across maps with the same contents.
#[derive(Debug)]
pub struct MappingView<'a> {
    entries: Vec<(&'a str, &'a Value)>,
}

impl<'a> MappingView<'a> {
    fn new(map: &'a HashMap<String, Value>) -> Self {
        Self {
            entries: map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_at(&self, i: usize) -> Option<(&'a str, &'a Value)> {
        self.entries.get(i).copied()
    }
}

#[derive(Debug)]
pub struct RecordView<'a> {
    record: &'a Record,
}

impl<'a> RecordView<'a> {
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn entry_at(&self, i: usize) -> Option<(&'a str, &'a Value)> {
        self.record.fields().get(i).map(|(k, v)| (k.as_str(), v))
    }
}
