//! JSON tree serializer.
//!
//! Trees are as deep as the longest word, so neither direction recurses per
//! label: writing walks the automaton with an explicit stack, and reading lets
//! `serde_stacker` grow the stack while `serde_json` builds the [`Value`].

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{DafsaSerializer, SerializationError, TERMINAL_KEY};
use crate::dafsa::automaton::Dafsa;
use crate::dafsa::register::Register;
use crate::dafsa::state::{State, StateId, MAX_STATES};

/// JSON serializer writing the automaton as a tree of nested objects.
///
/// Each object is a state: one key per transition label, plus
/// `"$": 1` if the state is terminal.
pub struct JsonSerializer;

impl DafsaSerializer for JsonSerializer {
    fn serialize<W: Write>(dafsa: &Dafsa<char>, writer: W) -> Result<(), SerializationError> {
        check_labels(dafsa)?;
        write_tree(dafsa, BufWriter::new(writer))?;
        debug!("wrote DAFSA with {} words as JSON tree", dafsa.len());
        Ok(())
    }

    fn deserialize<R: Read>(reader: R) -> Result<Dafsa<char>, SerializationError> {
        let mut json = serde_json::Deserializer::from_reader(reader);
        json.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;

        let dafsa = from_json_value(&value);
        dismantle(value);
        let dafsa = dafsa?;
        debug!(
            "read DAFSA with {} words into {} states from JSON tree",
            dafsa.len(),
            dafsa.state_count()
        );
        Ok(dafsa)
    }
}

/// Writes the JSON tree form to a new file at `path`.
///
/// An existing file is never overwritten; it is reported as an
/// [`io::ErrorKind::AlreadyExists`] error.
pub fn store_json(dafsa: &Dafsa<char>, path: impl AsRef<Path>) -> Result<(), SerializationError> {
    let path = path.as_ref();
    check_labels(dafsa)?;
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    JsonSerializer::serialize(dafsa, file)?;
    debug!("stored JSON tree at {}", path.display());
    Ok(())
}

/// An object under construction in [`to_json_value`].
struct PendingObject {
    id: StateId,
    next: usize,
    label: char,
    object: Map<String, Value>,
}

impl PendingObject {
    fn new(dafsa: &Dafsa<char>, label: char, id: StateId) -> Self {
        let mut object = Map::new();
        if dafsa.state(id).is_terminal() {
            object.insert(TERMINAL_KEY.to_string(), Value::from(1));
        }
        PendingObject {
            id,
            next: 0,
            label,
            object,
        }
    }
}

/// Converts an automaton into its JSON tree form.
///
/// The value is assembled bottom-up without recursion. Dropping a [`Value`]
/// still recurses once per nesting level, so very long words are better
/// written straight to a writer with [`JsonSerializer`].
pub fn to_json_value(dafsa: &Dafsa<char>) -> Result<Value, SerializationError> {
    check_labels(dafsa)?;

    let mut stack = vec![PendingObject::new(dafsa, char::default(), dafsa.root())];
    let mut root = None;
    while let Some(top) = stack.last_mut() {
        if let Some((label, target)) = dafsa.state(top.id).transition(top.next) {
            top.next += 1;
            stack.push(PendingObject::new(dafsa, label, target));
            continue;
        }
        if let Some(done) = stack.pop() {
            let value = Value::Object(done.object);
            match stack.last_mut() {
                Some(parent) => {
                    parent.object.insert(done.label.to_string(), value);
                }
                None => root = Some(value),
            }
        }
    }
    Ok(root.unwrap_or_else(|| Value::Object(Map::new())))
}

fn check_labels(dafsa: &Dafsa<char>) -> Result<(), SerializationError> {
    let reserved = TERMINAL_KEY.chars().next();
    match dafsa
        .states()
        .flat_map(|(_, state)| state.transitions())
        .find(|&(label, _)| Some(label) == reserved)
    {
        Some((label, _)) => Err(SerializationError::ReservedLabel(label)),
        None => Ok(()),
    }
}

/// Emits the tree depth-first. A shared state is written again for every path
/// leading to it; the automaton is acyclic, so this always terminates.
fn write_tree<W: Write>(
    dafsa: &Dafsa<char>,
    mut out: BufWriter<W>,
) -> Result<(), SerializationError> {
    let mut key = [0u8; 4];
    // (state, next transition to write)
    let mut stack = vec![(dafsa.root(), 0usize)];
    open_object(&mut out, dafsa.root_state())?;

    while let Some(&(id, next)) = stack.last() {
        let state = dafsa.state(id);
        let Some((label, target)) = state.transition(next) else {
            out.write_all(b"}")?;
            stack.pop();
            continue;
        };
        let top = stack.len() - 1;
        stack[top].1 += 1;

        if next > 0 || state.is_terminal() {
            out.write_all(b",")?;
        }
        serde_json::to_writer(&mut out, &*label.encode_utf8(&mut key))?;
        out.write_all(b":")?;
        open_object(&mut out, dafsa.state(target))?;
        stack.push((target, 0));
    }
    out.flush()?;
    Ok(())
}

fn open_object(out: &mut impl Write, state: &State<char>) -> io::Result<()> {
    out.write_all(b"{")?;
    if state.is_terminal() {
        write!(out, "\"{TERMINAL_KEY}\":1")?;
    }
    Ok(())
}

/// Tears a value down level by level; its own `Drop` would recurse.
fn dismantle(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Object(object) => pending.extend(object.into_iter().map(|(_, child)| child)),
            Value::Array(items) => pending.extend(items),
            _ => {}
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A JSON object being turned into a state. Its children are converted first.
struct Frame<'v> {
    label: char,
    state: State<char>,
    children: std::vec::IntoIter<(char, &'v Value)>,
}

impl<'v> Frame<'v> {
    fn open(label: char, value: &'v Value) -> Result<Self, SerializationError> {
        let object = value.as_object().ok_or_else(|| {
            SerializationError::malformed(format!(
                "expected an object for the state behind {label:?}, found {}",
                kind(value)
            ))
        })?;
        let terminal = terminal_marker(object)?;
        let mut children = object
            .iter()
            .filter(|(key, _)| key.as_str() != TERMINAL_KEY)
            .map(|(key, child)| Ok((parse_label(key)?, child)))
            .collect::<Result<Vec<_>, SerializationError>>()?;
        // Key order depends on serde_json's map implementation.
        children.sort_unstable_by_key(|&(label, _)| label);
        Ok(Frame {
            label,
            state: State::new(terminal),
            children: children.into_iter(),
        })
    }
}

fn terminal_marker(object: &Map<String, Value>) -> Result<bool, SerializationError> {
    match object.get(TERMINAL_KEY) {
        None => Ok(false),
        Some(Value::Bool(true)) => Ok(true),
        Some(Value::Number(n)) if n.as_u64() == Some(1) => Ok(true),
        Some(other) => Err(SerializationError::malformed(format!(
            "terminal marker must be 1 or true, found {other}"
        ))),
    }
}

fn parse_label(key: &str) -> Result<char, SerializationError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(label), None) => Ok(label),
        _ => Err(SerializationError::malformed(format!(
            "transition key {key:?} is not a single character"
        ))),
    }
}

/// Rebuilds a minimal automaton from its JSON tree form.
///
/// States are canonicalized bottom-up with an explicit stack, the same way the
/// builder freezes its open branch.
pub fn from_json_value(value: &Value) -> Result<Dafsa<char>, SerializationError> {
    let mut states = Vec::new();
    let mut register = Register::new();
    let mut stack = vec![Frame::open(char::default(), value)?];
    let mut root = None;

    while let Some(mut frame) = stack.pop() {
        if let Some((label, child)) = frame.children.next() {
            let child = Frame::open(label, child)?;
            stack.push(frame);
            stack.push(child);
            continue;
        }

        let Frame { label, state, .. } = frame;
        let is_root = stack.is_empty();
        if !is_root && state.transition_count() == 0 && !state.is_terminal() {
            return Err(SerializationError::malformed(format!(
                "state behind {label:?} has no transitions and no terminal marker"
            )));
        }
        if states.len() == MAX_STATES {
            return Err(SerializationError::malformed(format!(
                "tree has more than {MAX_STATES} distinct states"
            )));
        }
        let id = register.replace_or_register(&mut states, state);
        match stack.last_mut() {
            Some(parent) => parent.state.push(label, id),
            None => root = Some(id),
        }
    }

    let root = root.ok_or_else(|| SerializationError::malformed("no root state"))?;
    Ok(Dafsa::from_states(states, root))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::dafsa::builder::build;

    fn written(dafsa: &Dafsa<char>) -> String {
        let mut buffer = Vec::new();
        JsonSerializer::serialize(dafsa, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn terminal_marker_is_reserved_key() {
        let dafsa = build(["a", "ab"]).unwrap();
        let value = to_json_value(&dafsa).unwrap();
        assert_eq!(value, json!({"a": {"$": 1, "b": {"$": 1}}}));
    }

    #[test]
    fn writer_matches_value_form() {
        let words = ["call", "cap", "car", "carrot", "cat", "tap", "taps", "top", "tops"];
        let dafsa = build(words).unwrap();
        let text = written(&dafsa);
        assert_eq!(text, to_json_value(&dafsa).unwrap().to_string());
        assert!(text.starts_with(r#"{"c":{"a":{"l":{"l":{"$":1}},"p":{"$":1},"r":{"$":1,"r""#));
    }

    #[test]
    fn special_labels_are_escaped() {
        let dafsa = build(["\u{1}", "\"", "\\"]).unwrap();
        let text = written(&dafsa);
        let loaded = JsonSerializer::deserialize(text.as_bytes()).unwrap();
        assert_eq!(loaded, dafsa);
        assert!(loaded.contains("\""));
        assert!(loaded.contains("\\"));
    }

    #[test]
    fn shared_states_are_expanded_per_path() {
        let dafsa = build(["ball", "bap", "call", "cap"]).unwrap();
        let branch = json!({"a": {"l": {"l": {"$": 1}}, "p": {"$": 1}}});
        assert_eq!(
            to_json_value(&dafsa).unwrap(),
            json!({"b": branch.clone(), "c": branch})
        );
    }

    #[test]
    fn empty_automaton_is_empty_object() {
        let dafsa = build::<char, &str>([]).unwrap();
        assert_eq!(to_json_value(&dafsa).unwrap(), json!({}));
        assert_eq!(written(&dafsa), "{}");
        let loaded = from_json_value(&json!({})).unwrap();
        assert!(loaded.is_empty());
        assert!(!loaded.contains(""));
    }

    #[test]
    fn only_the_empty_word() {
        let dafsa = build([""]).unwrap();
        assert_eq!(written(&dafsa), r#"{"$":1}"#);
    }

    #[test]
    fn reserved_label_is_rejected() {
        let dafsa = build(["a$", "b"]).unwrap();
        assert!(matches!(
            to_json_value(&dafsa),
            Err(SerializationError::ReservedLabel('$'))
        ));
        let mut buffer = Vec::new();
        assert!(JsonSerializer::serialize(&dafsa, &mut buffer).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn loading_minimizes_shared_subtrees() {
        let value = json!({
            "b": {"a": {"l": {"l": {"$": 1}}, "p": {"$": true}}},
            "c": {"a": {"l": {"l": {"$": 1}}, "p": {"$": 1}}}
        });
        let dafsa = from_json_value(&value).unwrap();
        assert_eq!(dafsa.strings().collect::<Vec<_>>(), ["ball", "bap", "call", "cap"]);
        assert_eq!(dafsa.state_count(), 5);
        assert_eq!(dafsa, build(["ball", "bap", "call", "cap"]).unwrap());
    }

    #[test]
    fn malformed_values() {
        let cases = [
            json!([]),
            json!({"a": 3}),
            json!({"ab": {"$": 1}}),
            json!({"": {"$": 1}}),
            json!({"a": {"$": 0}}),
            json!({"a": {"$": "yes"}}),
            json!({"a": {}}),
            json!({"a": {"b": {}}, "c": {"$": 1}}),
        ];
        for value in cases {
            assert!(
                matches!(from_json_value(&value), Err(SerializationError::Malformed(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let err = JsonSerializer::deserialize(&b"{\"a\": "[..]).unwrap_err();
        assert!(matches!(err, SerializationError::Json(_)));

        let err = JsonSerializer::deserialize(&b"{} {}"[..]).unwrap_err();
        assert!(matches!(err, SerializationError::Json(_)));
    }

    #[test]
    fn words_deeper_than_the_default_recursion_limit() {
        let word = "a".repeat(200);
        let dafsa = build([&word]).unwrap();
        let loaded = JsonSerializer::deserialize(written(&dafsa).as_bytes()).unwrap();
        assert_eq!(loaded, dafsa);
        assert!(loaded.contains(&word));
        assert!(!loaded.contains(&word[1..]));
    }

    #[test]
    fn store_json_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        let first = build(["cap", "car"]).unwrap();

        store_json(&first, &path).unwrap();
        let loaded = JsonSerializer::deserialize(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded, first);

        let second = build(["dog"]).unwrap();
        match store_json(&second, &path) {
            Err(SerializationError::Io(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::AlreadyExists)
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
        // The first file is untouched.
        let reloaded = JsonSerializer::deserialize(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(reloaded, first);
    }

    #[test]
    fn store_json_into_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("words.json");
        let dafsa = build(["cap"]).unwrap();
        assert!(matches!(
            store_json(&dafsa, path),
            Err(SerializationError::Io(_))
        ));
    }
}
