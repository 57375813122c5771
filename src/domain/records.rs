use crate::domain::model::{Collection, Document, FieldValue, Fields, RecordDate};
use crate::utils::error::Result;
use crate::utils::validation::require_field;
use serde::Serialize;
use std::fmt;

/// A record type read back from one collection.
pub trait Entity: Sized + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn from_document(doc: &Document) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub image_url: String,
    #[serde(serialize_with = "display_date")]
    pub created_at: RecordDate,
}

impl Entity for BlogPost {
    const COLLECTION: Collection = Collection::Blogs;

    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.text("title"),
            subtitle: doc.text("subtitle"),
            content: doc.text("content"),
            hashtags: doc.text_list("hashtags"),
            image_url: doc.text("imageUrl"),
            created_at: doc.date("createdAt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum HighlightCategory {
    Workshop,
    Event,
    Research,
    Travel,
    /// Written by another client; kept as-is.
    Other(String),
}

impl HighlightCategory {
    pub const KNOWN: [HighlightCategory; 4] = [
        HighlightCategory::Workshop,
        HighlightCategory::Event,
        HighlightCategory::Research,
        HighlightCategory::Travel,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            HighlightCategory::Workshop => "workshop",
            HighlightCategory::Event => "event",
            HighlightCategory::Research => "research",
            HighlightCategory::Travel => "travel",
            HighlightCategory::Other(raw) => raw,
        }
    }
}

impl From<&str> for HighlightCategory {
    fn from(s: &str) -> Self {
        match s {
            "workshop" => HighlightCategory::Workshop,
            "event" => HighlightCategory::Event,
            "research" => HighlightCategory::Research,
            "travel" => HighlightCategory::Travel,
            other => HighlightCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HighlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HighlightCategory> for String {
    fn from(category: HighlightCategory) -> Self {
        category.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year: String,
    pub location: String,
    pub category: HighlightCategory,
    pub hashtags: Vec<String>,
    pub image_url: String,
    #[serde(serialize_with = "display_date")]
    pub created_at: RecordDate,
}

impl Entity for Highlight {
    const COLLECTION: Collection = Collection::Highlights;

    fn from_document(doc: &Document) -> Self {
        let category = HighlightCategory::from(doc.text("category").as_str());
        Self {
            id: doc.id.clone(),
            title: doc.text("title"),
            description: doc.text("description"),
            year: doc.text("year"),
            location: doc.text("location"),
            category,
            hashtags: doc.text_list("hashtags"),
            image_url: doc.text("imageUrl"),
            created_at: doc.date("createdAt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyMaterial {
    pub id: String,
    pub name: String,
    pub file_type: String,
    pub url: String,
    #[serde(serialize_with = "display_date")]
    pub uploaded_at: RecordDate,
}

impl Entity for StudyMaterial {
    const COLLECTION: Collection = Collection::StudyMaterials;

    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.text("name"),
            file_type: doc.text("fileType"),
            url: doc.text("url"),
            uploaded_at: doc.date("uploadedAt"),
        }
    }
}

/// Contact-form submission. Created by the public site, only read and deleted here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub content: String,
    #[serde(serialize_with = "display_date")]
    pub created_at: RecordDate,
}

impl Entity for Message {
    const COLLECTION: Collection = Collection::Messages;

    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.text("name"),
            email: doc.text("email"),
            subject: doc.text("subject"),
            content: doc.text("content"),
            created_at: doc.date("createdAt"),
        }
    }
}

fn display_date<S: serde::Serializer>(
    date: &RecordDate,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(date)
}

/// Adds a hashtag as typed unless it is blank or already present. Order is kept.
fn push_hashtag(hashtags: &mut Vec<String>, tag: &str) {
    if !tag.trim().is_empty() && !hashtags.iter().any(|existing| existing == tag) {
        hashtags.push(tag.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogDraft {
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub hashtags: Vec<String>,
}

impl BlogDraft {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            content: content.into(),
            hashtags: Vec::new(),
        }
    }

    pub fn add_hashtag(&mut self, tag: &str) {
        push_hashtag(&mut self.hashtags, tag);
    }

    pub fn remove_hashtag(&mut self, tag: &str) {
        self.hashtags.retain(|existing| existing != tag);
    }

    pub fn validate(&self) -> Result<()> {
        require_field("Title", &self.title)?;
        require_field("Subtitle", &self.subtitle)?;
        require_field("Content", &self.content)
    }

    pub fn into_fields(self, image_url: String) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), self.title.into());
        fields.insert("subtitle".to_string(), self.subtitle.into());
        fields.insert("content".to_string(), self.content.into());
        fields.insert("hashtags".to_string(), self.hashtags.into());
        fields.insert("imageUrl".to_string(), image_url.into());
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightDraft {
    pub title: String,
    pub description: String,
    pub year: String,
    pub location: String,
    pub category: HighlightCategory,
    pub hashtags: Vec<String>,
}

impl HighlightDraft {
    pub fn add_hashtag(&mut self, tag: &str) {
        push_hashtag(&mut self.hashtags, tag);
    }

    pub fn remove_hashtag(&mut self, tag: &str) {
        self.hashtags.retain(|existing| existing != tag);
    }

    pub fn validate(&self) -> Result<()> {
        require_field("Title", &self.title)?;
        require_field("Description", &self.description)?;
        require_field("Year", &self.year)?;
        require_field("Location", &self.location)
    }

    pub fn into_fields(self, image_url: String) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), self.title.into());
        fields.insert("description".to_string(), self.description.into());
        fields.insert("year".to_string(), self.year.into());
        fields.insert("location".to_string(), self.location.into());
        fields.insert("category".to_string(), String::from(self.category).into());
        fields.insert("hashtags".to_string(), self.hashtags.into());
        fields.insert("imageUrl".to_string(), image_url.into());
        fields
    }
}

pub(crate) fn study_material_fields(name: String, file_type: String, url: String) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), FieldValue::String(name));
    fields.insert("fileType".to_string(), FieldValue::String(file_type));
    fields.insert("url".to_string(), FieldValue::String(url));
    fields
}
