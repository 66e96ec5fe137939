use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use std::collections::HashMap;

/// One syllable decomposition as produced by the romanization service.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub initial: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub nucleus: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub coda: String,

    #[serde(default, deserialize_with = "tone_from_str_or_int")]
    pub tone: i32,
}

impl Syllable {
    /// Non-empty parts in initial, nucleus, coda order, whitespace trimmed.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        [&self.initial, &self.nucleus, &self.coda]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct CharRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub char: String,

    #[serde(default)]
    pub pinyin: Option<String>,

    #[serde(default)]
    pub initial_list: Vec<Syllable>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct RomanizeResponse {
    pub segments: HashMap<String, Vec<CharRecord>>,
}

impl RomanizeResponse {
    pub fn from_json_str(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&[CharRecord]> {
        self.segments.get(key).map(Vec::as_slice)
    }

    /// Removes the records of one requested segment. A key the service left out is
    /// treated as a malformed response, never as an empty segment.
    pub fn take(&mut self, key: &str) -> Result<Vec<CharRecord>> {
        self.segments.remove(key).ok_or_else(|| {
            Error::MalformedResponse(format!("segment {key:?} missing from response"))
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTone {
    Int(i64),
    Str(String),
}

fn tone_from_str_or_int<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTone>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawTone::Int(v)) => i32::try_from(v).map_err(D::Error::custom),
        Some(RawTone::Str(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(0)
            } else {
                s.parse::<i32>()
                    .map_err(|_| D::Error::custom(format!("invalid tone {s:?}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "0": [
            {"char": "廣東話", "pinyin": "gwong2dung1waa2", "initial_list": [
                {"initial": "gw", "nucleus": "o", "coda": "ng", "tone": "2"},
                {"initial": "d", "nucleus": "u", "coda": "ng", "tone": "1"},
                {"initial": "w", "nucleus": "aa", "coda": "", "tone": 2}
            ]}
        ],
        "3": [
            {"char": "啊", "pinyin": "aa3", "initial_list": [
                {"initial": null, "nucleus": "aa", "coda": " ", "tone": "3"}
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_typed_response() {
        let resp = RomanizeResponse::from_json_str(BODY).unwrap();
        let seg0 = resp.get("0").unwrap();
        assert_eq!(seg0.len(), 1);
        assert_eq!(seg0[0].initial_list.len(), 3);
        assert_eq!(seg0[0].initial_list[0].tone, 2);
        assert_eq!(seg0[0].initial_list[2].tone, 2);

        let seg3 = resp.get("3").unwrap();
        assert_eq!(seg3[0].initial_list[0].initial, "");
        assert_eq!(seg3[0].initial_list[0].parts().collect::<Vec<_>>(), ["aa"]);
    }

    #[test]
    fn test_take_missing_segment() {
        let mut resp = RomanizeResponse::from_json_str(BODY).unwrap();
        assert!(resp.take("0").is_ok());
        assert!(matches!(resp.take("0"), Err(Error::MalformedResponse(_))));
        assert!(matches!(resp.take("7"), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_bad_tone_is_malformed() {
        let body = r#"{"0": [{"char": "a", "initial_list": [{"nucleus": "aa", "tone": "high"}]}]}"#;
        assert!(matches!(
            RomanizeResponse::from_json_str(body),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_not_an_object() {
        assert!(RomanizeResponse::from_json_str("[1, 2]").is_err());
        assert!(RomanizeResponse::from_json_str("").is_err());
    }
}
