// API client module: a small blocking HTTP client that talks to JokeAPI.
// Every call reads the whole body before returning, so the response is
// released on every exit path.

use crate::error::JokeError;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Public JokeAPI v2 endpoint used by the binary.
pub const DEFAULT_BASE_URL: &str = "https://v2.jokeapi.dev";

/// Category accepted even when the server list does not contain it.
pub const ANY_CATEGORY: &str = "Any";

/// Blocking API client holding a reqwest client and the base URL every
/// endpoint is resolved against.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Response of `GET /categories`. Every field defaults when absent, the
/// server only has to send well-formed JSON.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryResponse {
    pub error: bool,
    pub categories: Vec<String>,
    pub category_aliases: Vec<CategoryAlias>,
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct CategoryAlias {
    pub alias: String,
    pub resolved: String,
}

/// Content warnings attached to a joke. Informational only.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ContentFlags {
    pub nsfw: bool,
    pub religious: bool,
    pub political: bool,
    pub racist: bool,
    pub sexist: bool,
    pub explicit: bool,
}

impl ContentFlags {
    /// Names of the flags that are set, in wire order.
    pub fn active(&self) -> Vec<&'static str> {
        [
            ("nsfw", self.nsfw),
            ("religious", self.religious),
            ("political", self.political),
            ("racist", self.racist),
            ("sexist", self.sexist),
            ("explicit", self.explicit),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct SingleJoke {
    pub error: bool,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub joke: String,
    pub flags: ContentFlags,
    pub id: i64,
    pub safe: bool,
    pub lang: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct TwoPartJoke {
    pub error: bool,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub setup: String,
    pub delivery: String,
    pub flags: ContentFlags,
    pub id: i64,
    pub safe: bool,
    pub lang: String,
}

/// A decoded joke; the variant follows the requested `JokeType`.
#[derive(Debug, Clone, PartialEq)]
pub enum Joke {
    Single(SingleJoke),
    TwoPart(TwoPartJoke),
}

impl Joke {
    pub fn flags(&self) -> ContentFlags {
        match self {
            Joke::Single(j) => j.flags,
            Joke::TwoPart(j) => j.flags,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Joke::Single(j) => j.id,
            Joke::TwoPart(j) => j.id,
        }
    }
}

/// Joke shape requested with `?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokeType {
    Single,
    TwoPart,
}

impl JokeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JokeType::Single => "single",
            JokeType::TwoPart => "twopart",
        }
    }
}

impl fmt::Display for JokeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JokeType {
    type Err = JokeError;

    /// Exact literal match, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(JokeType::Single),
            "twopart" => Ok(JokeType::TwoPart),
            other => Err(JokeError::InvalidType(other.to_string())),
        }
    }
}

/// Validated request parameters. Only `validate_params` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeRequestParams {
    category: String,
    joke_type: JokeType,
}

impl JokeRequestParams {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn joke_type(&self) -> JokeType {
        self.joke_type
    }
}

/// Check the user's category and type against the fetched category list.
///
/// The category must equal one of `categories` or `"Any"` exactly; the type
/// must be the literal `single` or `twopart`.
pub fn validate_params(
    category: &str,
    joke_type: &str,
    categories: &[String],
) -> Result<JokeRequestParams, JokeError> {
    let known = category == ANY_CATEGORY || categories.iter().any(|c| c == category);
    if !known {
        return Err(JokeError::InvalidCategory(category.to_string()));
    }
    let joke_type = joke_type.parse::<JokeType>()?;
    Ok(JokeRequestParams {
        category: category.to_string(),
        joke_type,
    })
}

impl ApiClient {
    /// Create an ApiClient resolving endpoints against `base_url`
    /// (a trailing slash is ignored).
    pub fn new(base_url: impl Into<String>) -> Result<Self, JokeError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().build().map_err(JokeError::Client)?;
        Ok(ApiClient { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{endpoint}` and return the body. Anything but 200 OK is
    /// reported as `Unreachable`.
    fn get(&self, endpoint: &str) -> Result<String, JokeError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Sending request to {}", url);
        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|source| JokeError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let status = res.status();
        if status != StatusCode::OK {
            return Err(JokeError::Unreachable {
                endpoint: endpoint.to_string(),
                status,
            });
        }
        res.text().map_err(|source| JokeError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, JokeError> {
        let body = self.get(endpoint)?;
        decode(endpoint, &body)
    }

    /// Ping the server. Must succeed before any other call is made.
    pub fn check_availability(&self) -> Result<(), JokeError> {
        self.get("ping").map(|_| ())
    }

    /// Fetch the category list. An empty list is returned as-is, and the
    /// payload `error` flag is only logged: callers see it on the response.
    pub fn fetch_categories(&self) -> Result<CategoryResponse, JokeError> {
        let resp: CategoryResponse = self.get_json("categories")?;
        if resp.error {
            warn!(
                "categories endpoint reported an error; using the {} categories it returned",
                resp.categories.len()
            );
        }
        Ok(resp)
    }

    /// Fetch one joke of the requested shape.
    pub fn fetch_joke(&self, params: &JokeRequestParams) -> Result<Joke, JokeError> {
        let endpoint = format!("joke/{}?type={}", params.category, params.joke_type);
        match params.joke_type {
            JokeType::Single => {
                let joke: SingleJoke = self.get_json(&endpoint)?;
                check_payload(&endpoint, joke.error, &joke.joke)?;
                Ok(Joke::Single(joke))
            }
            JokeType::TwoPart => {
                let joke: TwoPartJoke = self.get_json(&endpoint)?;
                check_payload(&endpoint, joke.error, &joke.setup)?;
                Ok(Joke::TwoPart(joke))
            }
        }
    }
}

/// Decode a response body. The top level must be a JSON object: with every
/// field defaulted, serde would otherwise accept an array positionally.
fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, JokeError> {
    serde_json::from_str::<Map<String, Value>>(body)
        .and_then(|object| T::deserialize(Value::Object(object)))
        .map_err(|source| JokeError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
}

/// Reject payloads flagged as errors or carrying no primary text.
fn check_payload(endpoint: &str, error: bool, primary: &str) -> Result<(), JokeError> {
    if error {
        return Err(JokeError::Api {
            endpoint: endpoint.to_string(),
        });
    }
    if primary.is_empty() {
        return Err(JokeError::EmptyContent {
            endpoint: endpoint.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_listed_category_validates() {
        let list = cats(&["Any", "Misc", "Programming", "Dark", "Pun", "Spooky", "Christmas"]);
        for c in &list {
            let params = validate_params(c, "single", &list).unwrap();
            assert_eq!(params.category(), c);
            assert_eq!(params.joke_type(), JokeType::Single);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let list = cats(&["Misc", "Programming"]);
        for bad in ["Puns", "programming", "", " Misc"] {
            match validate_params(bad, "single", &list) {
                Err(JokeError::InvalidCategory(c)) => assert_eq!(c, bad),
                other => panic!("expected InvalidCategory for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn any_validates_against_any_list() {
        assert!(validate_params("Any", "single", &[]).is_ok());
        assert!(validate_params("Any", "twopart", &cats(&["Pun"])).is_ok());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let list = cats(&["Pun"]);
        match validate_params("Pun", "TwoPart", &list) {
            Err(JokeError::InvalidType(t)) => assert_eq!(t, "TwoPart"),
            other => panic!("expected InvalidType, got {:?}", other),
        }
        assert_eq!(
            validate_params("Pun", "twopart", &list).unwrap().joke_type(),
            JokeType::TwoPart
        );
    }

    #[test]
    fn category_is_checked_before_type() {
        let err = validate_params("Nope", "bogus", &[]).unwrap_err();
        assert!(matches!(err, JokeError::InvalidCategory(_)));
    }

    #[test]
    fn categories_decode_with_aliases() {
        let body = r#"{
            "error": false,
            "categories": ["Any", "Misc", "Programming"],
            "categoryAliases": [{"alias": "Miscellaneous", "resolved": "Misc"}],
            "timestamp": 1700000000000
        }"#;
        let resp: CategoryResponse = decode("categories", body).unwrap();
        assert_eq!(resp.categories, cats(&["Any", "Misc", "Programming"]));
        assert_eq!(resp.category_aliases[0].alias, "Miscellaneous");
        assert_eq!(resp.category_aliases[0].resolved, "Misc");
        assert_eq!(resp.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn categories_error_flag_is_visible() {
        let resp: CategoryResponse =
            decode("categories", r#"{"error": true, "categories": []}"#).unwrap();
        assert!(resp.error);
        assert!(resp.categories.is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode::<CategoryResponse>("categories", "<html>").unwrap_err();
        assert!(matches!(err, JokeError::Decode { ref endpoint, .. } if endpoint == "categories"));
    }

    #[test]
    fn array_body_is_a_decode_error() {
        assert!(matches!(
            decode::<CategoryResponse>("categories", "[]"),
            Err(JokeError::Decode { .. })
        ));
        assert!(matches!(
            decode::<SingleJoke>("joke/Any?type=single", r#"[false,"Any","single","text"]"#),
            Err(JokeError::Decode { .. })
        ));
    }

    #[test]
    fn single_joke_decodes_full_payload() {
        let body = r#"{
            "error": false,
            "category": "Programming",
            "type": "single",
            "joke": "There are 10 kinds of people.",
            "flags": {"nsfw": false, "religious": false, "political": true,
                      "racist": false, "sexist": false, "explicit": true},
            "id": 42,
            "safe": false,
            "lang": "en"
        }"#;
        let joke: SingleJoke = decode("joke/Programming?type=single", body).unwrap();
        assert_eq!(joke.kind, "single");
        assert_eq!(joke.id, 42);
        assert_eq!(joke.flags.active(), vec!["political", "explicit"]);
        assert_eq!(joke.lang, "en");
    }

    #[test]
    fn payload_checks() {
        assert!(matches!(
            check_payload("e", true, "text"),
            Err(JokeError::Api { .. })
        ));
        assert!(matches!(
            check_payload("e", false, ""),
            Err(JokeError::EmptyContent { .. })
        ));
        assert!(check_payload("e", false, "text").is_ok());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("https://v2.jokeapi.dev/").unwrap();
        assert_eq!(api.base_url(), DEFAULT_BASE_URL);
    }
}
