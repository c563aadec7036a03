use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Latest price and daily move for a single commodity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CommodityQuote {
    /// Currency per unit mass.
    pub price: f64,
    /// Signed percentage.
    pub change: f64,
}

/// One decoded response of the market-data endpoint.
///
/// Entries keep the order of the JSON object so the rendered blocks come out
/// in the order the endpoint lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketDataSnapshot {
    entries: Vec<(String, CommodityQuote)>,
}

impl MarketDataSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a quote. A replaced key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, quote: CommodityQuote) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = quote,
            None => self.entries.push((name, quote)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommodityQuote> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, q)| q)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommodityQuote)> {
        self.entries.iter().map(|(k, q)| (k.as_str(), q))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CommodityQuote)> for MarketDataSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, CommodityQuote)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, quote) in iter {
            snapshot.insert(name, quote);
        }
        snapshot
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = MarketDataSnapshot;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of commodity name to {price, change}")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut snapshot = MarketDataSnapshot {
            entries: Vec::with_capacity(map.size_hint().unwrap_or(0)),
        };
        while let Some((name, quote)) = map.next_entry::<String, CommodityQuote>()? {
            snapshot.insert(name, quote);
        }
        Ok(snapshot)
    }
}

impl<'de> Deserialize<'de> for MarketDataSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}
