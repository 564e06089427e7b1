use crate::Callsign;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Tags travel in their canonical rendered form ("AB123"), not as the packed
// index, so serialized data stays readable and survives layout changes.

impl Serialize for Callsign {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Callsign {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CallsignVisitor;

        impl serde::de::Visitor<'_> for CallsignVisitor {
            type Value = Callsign;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a tag like \"AB123\"")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(CallsignVisitor)
    }
}
