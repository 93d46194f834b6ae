use serde::{Deserialize, Deserializer, Serialize};

/// A note as stored by the backend.
///
/// The store assigns ids and may encode them as JSON strings or numbers
/// depending on the backing service; we normalize to `String` at the wire
/// boundary. Title and content are optional on the wire and default to empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Create/update payload: `{title, content}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// The only client-side validation: title whitespace is trimmed before
    /// submission. Content is sent as typed.
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "note id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_deserializes_string_id() {
        let n: Note =
            serde_json::from_str(r#"{"id":"abc","title":"A","content":"B"}"#).expect("should parse");
        assert_eq!(n.id, "abc");
        assert_eq!(n.title, "A");
        assert_eq!(n.content, "B");
    }

    #[test]
    fn note_deserializes_numeric_id() {
        // json-server style backends assign numeric ids.
        let n: Note = serde_json::from_str(r#"{"id":7,"title":"t"}"#).expect("should parse");
        assert_eq!(n.id, "7");
    }

    #[test]
    fn note_title_and_content_default_to_empty() {
        let n: Note = serde_json::from_str(r#"{"id":"x"}"#).expect("should parse");
        assert_eq!(n.title, "");
        assert_eq!(n.content, "");
    }

    #[test]
    fn note_rejects_missing_id() {
        assert!(serde_json::from_str::<Note>(r#"{"title":"t"}"#).is_err());
        assert!(serde_json::from_str::<Note>(r#"{"id":null,"title":"t"}"#).is_err());
    }

    #[test]
    fn draft_trimmed_strips_title_whitespace_only() {
        let d = NoteDraft {
            title: "  A title \n".to_string(),
            content: "  keep my indentation".to_string(),
        }
        .trimmed();
        assert_eq!(d.title, "A title");
        assert_eq!(d.content, "  keep my indentation");
    }

    #[test]
    fn draft_wire_shape() {
        let d = NoteDraft {
            title: "A".to_string(),
            content: "B".to_string(),
        };
        let v = serde_json::to_value(&d).expect("should serialize");
        assert_eq!(v, serde_json::json!({"title": "A", "content": "B"}));
    }
}
