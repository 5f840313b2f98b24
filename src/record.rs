//! Random record construction.
//!
//! A record is an ordered map of random lowercase keys to random lowercase
//! values, plus a mandatory `"type"` entry drawn from [`VOCABULARY`].

use rand::Rng;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The values a record's `"type"` field is drawn from.
pub const VOCABULARY: [&str; 15] = [
    "abc",
    "bcd",
    "csdfsdf",
    "d",
    "edasjdflj",
    "fiwer",
    "gjasfdll",
    "hjlkjasdf",
    "ijlsdfj",
    "jsdflkjlk",
    "kR123",
    "fkjWER",
    "mdsfjh",
    "n",
    "o",
];

/// Name of the mandatory field.
pub const TYPE_KEY: &str = "type";

/// Shortest auxiliary key or value.
pub const MIN_STRING_LEN: usize = 1;
/// Longest auxiliary key or value.
pub const MAX_STRING_LEN: usize = 10;

/// Random string of `len` characters from `a..=z`.
pub fn random_lowercase<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}

fn random_field<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(MIN_STRING_LEN..=MAX_STRING_LEN);
    random_lowercase(rng, len)
}

/// One generated line, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
    kind: &'static str,
}

impl Record {
    /// Draw a record with up to `max_keys` auxiliary entries.
    ///
    /// The auxiliary count is uniform in `[0, max_keys]`; colliding keys
    /// overwrite each other, so the record may end up with fewer.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_keys: usize) -> Self {
        let count = rng.random_range(0..=max_keys);
        let mut fields = Map::new();
        for _ in 0..count {
            let key = random_field(rng);
            let value = random_field(rng);
            fields.insert(key, Value::String(value));
        }
        let kind = VOCABULARY[rng.random_range(0..VOCABULARY.len())];
        Self::with_kind(fields, kind)
    }

    /// Build a record from auxiliary pairs in draw order, then set `"type"`.
    ///
    /// Later duplicates replace earlier values in place. A `"type"` pair among
    /// the auxiliaries keeps its slot but takes `kind` as its value.
    pub fn assemble<I>(pairs: I, kind: &'static str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        Self::with_kind(fields, kind)
    }

    fn with_kind(mut fields: Map<String, Value>, kind: &'static str) -> Self {
        fields.insert(TYPE_KEY.to_string(), Value::String(kind.to_string()));
        Self { fields, kind }
    }

    /// The vocabulary entry stored under `"type"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Number of entries other than `"type"`.
    pub fn auxiliary_len(&self) -> usize {
        self.fields.len() - 1
    }

    /// Keys in serialization order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn vocabulary_has_fifteen_distinct_entries() {
        let mut sorted = VOCABULARY.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 15);
    }

    #[test]
    fn random_lowercase_respects_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 0..=12 {
            let s = random_lowercase(&mut rng, len);
            assert_eq!(s.len(), len);
            assert!(s.bytes().all(|b| b.is_ascii_lowercase()));
        }
    }

    #[test]
    fn zero_max_keys_yields_only_type() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let record = Record::random(&mut rng, 0);
            assert_eq!(record.keys().collect::<Vec<_>>(), vec![TYPE_KEY]);
            assert!(VOCABULARY.contains(&record.kind()));
            assert_eq!(record.get(TYPE_KEY), Some(record.kind()));
        }
    }

    #[test]
    fn auxiliary_entries_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..500 {
            let record = Record::random(&mut rng, 10);
            assert!(record.auxiliary_len() <= 10);
            for key in record.keys().filter(|k| *k != TYPE_KEY) {
                assert!((MIN_STRING_LEN..=MAX_STRING_LEN).contains(&key.len()));
                assert!(key.bytes().all(|b| b.is_ascii_lowercase()));
                let value = record.get(key).unwrap();
                assert!((MIN_STRING_LEN..=MAX_STRING_LEN).contains(&value.len()));
                assert!(value.bytes().all(|b| b.is_ascii_lowercase()));
            }
        }
    }

    #[test]
    fn every_kind_is_eventually_drawn() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(Record::random(&mut rng, 0).kind());
        }
        assert_eq!(seen.len(), VOCABULARY.len());
    }

    /// Emits one chosen word, then zeros, and refuses to run past a small
    /// budget so an unbounded draw loop fails instead of hanging.
    struct ScriptedRng {
        first: Option<u64>,
        calls: usize,
    }

    impl rand::RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.calls += 1;
            assert!(self.calls < 1_000, "rng budget exhausted");
            self.first.take().unwrap_or(0)
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for b in dst {
                *b = self.next_u64() as u8;
            }
        }
    }

    #[test]
    fn huge_max_keys_builds_pairs_incrementally() {
        // Full-range draw returns the raw word, so the record asks for 3
        // pairs out of a usize::MAX bound. All-zero draws then yield the
        // key "a" each time, collapsing to a single auxiliary entry.
        let mut rng = ScriptedRng {
            first: Some(3),
            calls: 0,
        };
        let record = Record::random(&mut rng, usize::MAX);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "type"]);
        assert_eq!(record.get("a"), Some("a"));
        assert_eq!(record.kind(), VOCABULARY[0]);
    }

    #[test]
    fn type_is_appended_last() {
        let record = Record::assemble([pair("xy", "z"), pair("q", "rst")], "kR123");
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["xy", "q", "type"]);
        assert_eq!(record.auxiliary_len(), 2);
    }

    #[test]
    fn duplicate_key_overwrites_in_place() {
        let record = Record::assemble(
            [pair("a", "first"), pair("b", "x"), pair("a", "second")],
            "d",
        );
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b", "type"]);
        assert_eq!(record.get("a"), Some("second"));
        assert_eq!(record.auxiliary_len(), 2);
    }

    #[test]
    fn colliding_type_keeps_its_slot() {
        let record = Record::assemble([pair("type", "abcd"), pair("k", "v")], "fiwer");
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["type", "k"]);
        assert_eq!(record.get("type"), Some("fiwer"));
        assert_eq!(record.keys().count(), 2);
        assert_eq!(record.auxiliary_len(), 1);
    }
}
