use core::fmt;
use core::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::backing::Backing;
use crate::compare::Compare;
use crate::map::{FlatMap, KeyValue};

impl<K, V, S, C> Serialize for FlatMap<K, V, S, C>
where
    K: Serialize,
    V: Serialize,
    S: Backing<KeyValue<K, V>>,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut ser_map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            ser_map.serialize_entry(k, v)?;
        }
        ser_map.end()
    }
}

// Input order is irrelevant; a repeated key keeps the last value. A full
// fixed-capacity store fails the deserialization.
impl<'de, K, V, S, C> Deserialize<'de> for FlatMap<K, V, S, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    S: Backing<KeyValue<K, V>> + Default,
    C: Compare<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlatMapVisitor<K, V, S, C>(PhantomData<fn() -> FlatMap<K, V, S, C>>);

        impl<'de, K, V, S, C> Visitor<'de> for FlatMapVisitor<K, V, S, C>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
            S: Backing<KeyValue<K, V>> + Default,
            C: Compare<K> + Default,
        {
            type Value = FlatMap<K, V, S, C>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = FlatMap::default();
                while let Some((k, v)) = access.next_entry::<K, V>()? {
                    map.try_set(k, v).map_err(de::Error::custom)?;
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FlatMapVisitor(PhantomData))
    }
}
