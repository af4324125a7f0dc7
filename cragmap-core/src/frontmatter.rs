use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A Markdown document split into its YAML header and body.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub frontmatter: Option<Value>,
    pub body: String,
}

#[derive(Debug)]
pub enum FrontmatterError {
    Missing,
    Yaml(serde_yaml::Error),
    Shape(serde_json::Error),
}

impl From<serde_yaml::Error> for FrontmatterError {
    fn from(err: serde_yaml::Error) -> Self {
        FrontmatterError::Yaml(err)
    }
}

impl From<serde_json::Error> for FrontmatterError {
    fn from(err: serde_json::Error) -> Self {
        FrontmatterError::Shape(err)
    }
}

impl std::fmt::Display for FrontmatterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontmatterError::Missing => write!(f, "no front matter block"),
            FrontmatterError::Yaml(e) => write!(f, "invalid YAML: {}", e),
            FrontmatterError::Shape(e) => write!(f, "unexpected front matter: {}", e),
        }
    }
}

impl std::error::Error for FrontmatterError {}

/// Split `text` into front matter and body.
///
/// The header must open on the first line with `---`. Text without one is
/// all body. A leading byte order mark is ignored.
pub fn split_document(text: &str) -> Result<Document, FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut in_frontmatter = false;
    let mut yaml = String::new();
    let mut header: Option<(String, usize)> = None;

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_frontmatter = true;
            }
            Event::Text(chunk) if in_frontmatter => yaml.push_str(&chunk),
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                header = Some((std::mem::take(&mut yaml), range.end));
                break;
            }
            // The metadata block is always the first event when present.
            _ if !in_frontmatter => break,
            _ => {}
        }
    }

    let Some((yaml, body_start)) = header else {
        return Ok(Document {
            frontmatter: None,
            body: text.to_string(),
        });
    };

    let frontmatter = match serde_yaml::from_str::<Value>(&yaml)? {
        Value::Null => Value::Object(Default::default()),
        value => value,
    };

    Ok(Document {
        frontmatter: Some(frontmatter),
        body: text[body_start..].trim_start_matches(['\r', '\n']).to_string(),
    })
}

impl Document {
    /// Deserialize the header into one of the typed front matter shapes.
    pub fn typed<T: for<'de> Deserialize<'de>>(&self) -> Result<T, FrontmatterError> {
        let value = self.frontmatter.clone().ok_or(FrontmatterError::Missing)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaFrontmatter {
    pub area_name: String,
    #[serde(default)]
    pub metadata: Option<AreaMetadata>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AreaMetadata {
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub area_id: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub mp_id: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub left_right_index: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimbFrontmatter {
    pub route_name: String,
    /// Always a string, whatever scalar the author wrote. A YAML float such
    /// as `5.10` reads back as `"5.1"`; quote grades to keep them exact.
    #[serde(default, deserialize_with = "scalar_string")]
    pub yds: String,
    #[serde(rename = "type", default)]
    pub route_type: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub safety: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub fa: Option<String>,
    #[serde(default)]
    pub metadata: Option<ClimbMetadata>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ClimbFrontmatter {
    /// Disciplines flagged `true` under `type`, in key order.
    pub fn disciplines(&self) -> Vec<&str> {
        self.route_type
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClimbMetadata {
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub climb_id: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub mp_id: Option<String>,
    #[serde(default)]
    pub left_right_index: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageFrontmatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_document() {
        let doc = split_document("---\narea_name: Oregon\n---\n\n# Oregon\n\nRain.").unwrap();
        assert_eq!(doc.frontmatter.unwrap()["area_name"], "Oregon");
        assert_eq!(doc.body, "# Oregon\n\nRain.");
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let doc = split_document("\u{feff}---\narea_name: Oregon\n---\nBody").unwrap();
        assert_eq!(doc.frontmatter.unwrap()["area_name"], "Oregon");
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_document_without_frontmatter() {
        let doc = split_document("# Just a page\n").unwrap();
        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.body, "# Just a page\n");
        assert!(matches!(
            doc.typed::<PageFrontmatter>(),
            Err(FrontmatterError::Missing)
        ));
    }

    #[test]
    fn test_area_frontmatter() {
        let doc = split_document(
            "---\narea_name: '(6) Red Wall'\nmetadata:\n  area_id: 1234\n  lat: 45.5\n  lng: -122.4\nshading: morning\n---\n",
        )
        .unwrap();
        let area: AreaFrontmatter = doc.typed().unwrap();
        assert_eq!(area.area_name, "(6) Red Wall");
        let metadata = area.metadata.unwrap();
        assert_eq!(metadata.area_id.as_deref(), Some("1234"));
        assert_eq!(metadata.lat, Some(45.5));
        assert_eq!(area.extra["shading"], "morning");
    }

    #[test]
    fn test_missing_area_name_is_a_shape_error() {
        let doc = split_document("---\ntitle: nope\n---\n").unwrap();
        let err = doc.typed::<AreaFrontmatter>().unwrap_err();
        assert!(matches!(err, FrontmatterError::Shape(_)));
        assert!(err.to_string().contains("area_name"));
    }

    #[test]
    fn test_climb_grade_is_coerced_to_string() {
        let quoted: ClimbFrontmatter =
            split_document("---\nroute_name: A\nyds: '5.10'\n---\n").unwrap().typed().unwrap();
        assert_eq!(quoted.yds, "5.10");

        let bare: ClimbFrontmatter =
            split_document("---\nroute_name: A\nyds: 5.10\n---\n").unwrap().typed().unwrap();
        assert_eq!(bare.yds, "5.1");

        let missing: ClimbFrontmatter =
            split_document("---\nroute_name: A\n---\n").unwrap().typed().unwrap();
        assert_eq!(missing.yds, "");
    }

    #[test]
    fn test_climb_disciplines() {
        let climb: ClimbFrontmatter = split_document(
            "---\nroute_name: Giants Staircase\nyds: 5.7\ntype:\n  trad: true\n  sport: false\n  tr: true\nfa: 1969\n---\n",
        )
        .unwrap()
        .typed()
        .unwrap();
        assert_eq!(climb.disciplines(), vec!["tr", "trad"]);
        assert_eq!(climb.fa.as_deref(), Some("1969"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = split_document("---\narea_name: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml(_)));
    }
}
