use serde::de::{Deserialize, Deserializer, Error};

/// Accept only `true`. Used on the `ok` field of successful responses so that
/// an `"ok": false` body can never be mistaken for a payload.
pub fn only_true<'a, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'a>,
{
    bool::deserialize(deserializer).and_then(|b| {
        if b {
            Ok(b)
        } else {
            Err(Error::custom("expected `ok` to be true"))
        }
    })
}

/// Accept only `false`, the mirror of [only_true] for error responses.
pub fn only_false<'a, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'a>,
{
    bool::deserialize(deserializer).and_then(|b| {
        if b {
            Err(Error::custom("expected `ok` to be false"))
        } else {
            Ok(b)
        }
    })
}
